//! External collaborators the pipeline consumes as injected interfaces.
//!
//! The core never talks to a secret store or an object store directly; it is
//! handed a [`CredentialProvider`] and an [`ObjectStoreReader`] at
//! construction time so runs are testable without live network calls.

pub mod credentials;
pub mod object_store;

pub use credentials::{
    CredentialKind, CredentialProvider, Credentials, EnvCredentialProvider,
    StaticCredentialProvider,
};
pub use object_store::{FsObjectStore, ObjectStoreReader};
