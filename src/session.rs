use std::sync::Arc;

use crate::credentials::{CredentialStore, StorageError};
use crate::gateway::{Gateway, GatewayError};
use crate::notify::{Notice, NotificationSink, Severity};

/// Whether the remote service currently accepts the credential. Moves only
/// through [`AuthSession::validate`], never inferred from other responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Unknown,
    Validating,
    Valid,
    Invalid,
}

/// Credential lifecycle: persisting a key, attaching it to the gateway,
/// and confirming the service accepts it.
///
/// "Saved" and "valid" are tracked independently: [`AuthSession::persisted`]
/// says whether the key survived to durable storage, [`AuthSession::state`]
/// what the service last said about it.
pub struct AuthSession {
    store: Arc<dyn CredentialStore>,
    gateway: Arc<dyn Gateway>,
    sink: Arc<dyn NotificationSink>,
    state: AuthState,
    persisted: bool,
}

impl AuthSession {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        gateway: Arc<dyn Gateway>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            store,
            gateway,
            sink,
            state: AuthState::Unknown,
            persisted: false,
        }
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    pub fn persisted(&self) -> bool {
        self.persisted
    }

    /// Makes `credential` the active key and persists it. When durable
    /// storage is unavailable the key stays attached for the rest of the
    /// session and the degradation is reported, not swallowed. Returns
    /// whether the key reached durable storage.
    pub fn save_credential(&mut self, credential: &str) -> bool {
        self.gateway.attach(credential);

        match self.store.set(credential) {
            Ok(()) => {
                self.persisted = true;
                self.sink.notify(Notice::new(
                    Severity::Success,
                    "Settings saved",
                    "API key saved",
                ));
            }
            Err(StorageError::Unavailable(reason)) => {
                self.persisted = false;
                self.sink.notify(Notice::new(
                    Severity::Warn,
                    "Settings not persisted",
                    format!("API key kept for this session only: {}", reason),
                ));
            }
        }

        self.persisted
    }

    /// Asks the service for a verdict on the current credential. A
    /// rejected key is a `false` result; only transport trouble is an
    /// error, and it leaves the state `Unknown`. Every attempt emits
    /// exactly one notice.
    pub async fn validate(&mut self) -> Result<bool, GatewayError> {
        self.state = AuthState::Validating;

        match self.gateway.validate().await {
            Ok(true) => {
                self.state = AuthState::Valid;
                self.sink
                    .notify(Notice::new(Severity::Success, "API key", "API key is valid"));
                Ok(true)
            }
            Ok(false) => {
                self.state = AuthState::Invalid;
                self.sink
                    .notify(Notice::new(Severity::Error, "API key", "API key is invalid"));
                Ok(false)
            }
            Err(err) => {
                // The verdict is unknowable, which is not the same as a
                // rejected key.
                self.state = AuthState::Unknown;
                self.sink.notify(Notice::new(
                    Severity::Error,
                    "API key check failed",
                    err.to_string(),
                ));
                Err(err)
            }
        }
    }

    /// The settings-page flow: persist, then confirm with the service.
    /// Save and validation outcomes are surfaced as separate notices.
    pub async fn save_and_validate(&mut self, credential: &str) -> Result<bool, GatewayError> {
        self.save_credential(credential);
        self.validate().await
    }

    /// Removes the credential from storage and from the gateway.
    /// Idempotent.
    pub fn clear_credential(&mut self) -> Result<(), StorageError> {
        self.store.clear()?;
        self.gateway.detach();
        self.state = AuthState::Unknown;
        self.persisted = false;
        Ok(())
    }
}
