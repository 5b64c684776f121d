// Configuration loading and credential persistence

pub mod credentials;
pub mod settings;

pub use credentials::{
    CredentialStore, FileStore, MemoryStore, StoreError, CREDENTIAL_KEY,
};
#[cfg(feature = "keychain")]
pub use credentials::KeychainStore;
pub use settings::{ClientConfig, UploadLimits, DEFAULT_API_BASE};
