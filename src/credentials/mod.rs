mod store;

pub use store::{CredentialStore, FileCredentialStore, MemoryCredentialStore, StorageError};
