//! Credential pair, credential storage and the login/logout service.

pub mod credentials;
pub mod error;
pub mod service;
pub mod store;

pub use credentials::CredentialPair;
pub use error::AuthError;
pub use service::AuthService;
pub use store::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
