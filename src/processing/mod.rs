//! In-memory dataset cleaning.
//!
//! The processing layer turns an untyped [`crate::types::RawDataset`] into a
//! typed, fully-populated [`crate::types::DataSet`] in two passes:
//!
//! - [`normalize()`]: commits one [`crate::types::DataType`] per column
//!   (integer → float → date → text priority) and coerces every cell
//! - [`resolve_nulls()`]: replaces missing values per the committed column
//!   type (`"UNKNOWN"` / `0` / mode date)
//!
//! Both passes are pure and deterministic: the same input dataset produces
//! the same output on repeated runs.
//!
//! ## Example
//!
//! ```rust
//! use listing_sync::processing::{normalize, resolve_nulls};
//! use listing_sync::types::{DataType, RawDataset, Value};
//!
//! let raw = RawDataset::new(
//!     vec!["id".into(), "name".into()],
//!     vec![
//!         vec![Some("1".into()), Some("Ada".into())],
//!         vec![Some("2".into()), None],
//!     ],
//! );
//!
//! let ds = resolve_nulls(normalize(raw));
//! assert_eq!(ds.schema.fields[0].data_type, DataType::Int64);
//! assert_eq!(ds.rows[1][1], Value::Utf8("UNKNOWN".to_string()));
//! ```

pub mod normalize;
pub mod nulls;

pub use normalize::normalize;
pub use nulls::resolve_nulls;
