#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use spend_client::{
    CredentialStore, FileHandle, Gateway, GatewayError, Notice, NotificationSink, StorageError,
    UploadReceipt, ACCEPTED_MEDIA_TYPE,
};

/// How the scripted gateway answers validation calls.
#[derive(Debug, Clone, Copy, Default)]
pub enum ValidateScript {
    #[default]
    Accept,
    Reject,
    Outage,
}

/// Gateway double that answers from a script instead of the network.
#[derive(Default)]
pub struct ScriptedGateway {
    /// Filenames whose submission the service rejects.
    pub fail_files: Vec<String>,
    pub validate_script: Mutex<ValidateScript>,
    pub resource: Mutex<serde_json::Value>,
    pub submit_calls: AtomicUsize,
    pub validate_calls: AtomicUsize,
    pub attached: Mutex<Option<String>>,
}

impl ScriptedGateway {
    pub fn rejecting(fail_files: &[&str]) -> Self {
        Self {
            fail_files: fail_files.iter().map(|name| name.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn attached_credential(&self) -> Option<String> {
        self.attached.lock().unwrap().clone()
    }
}

#[async_trait]
impl Gateway for ScriptedGateway {
    fn attach(&self, credential: &str) {
        *self.attached.lock().unwrap() = Some(credential.to_string());
    }

    fn detach(&self) {
        *self.attached.lock().unwrap() = None;
    }

    async fn validate(&self) -> Result<bool, GatewayError> {
        self.validate_calls.fetch_add(1, Ordering::SeqCst);
        match *self.validate_script.lock().unwrap() {
            ValidateScript::Accept => Ok(true),
            ValidateScript::Reject => Ok(false),
            ValidateScript::Outage => {
                Err(GatewayError::Transport("network unreachable".to_string()))
            }
        }
    }

    async fn fetch_resource(&self, _path: &str) -> Result<serde_json::Value, GatewayError> {
        Ok(self.resource.lock().unwrap().clone())
    }

    async fn submit_file(
        &self,
        _path: &str,
        file: &FileHandle,
    ) -> Result<UploadReceipt, GatewayError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_files.iter().any(|name| name == &file.name) {
            return Err(GatewayError::RemoteRejected {
                status: 422,
                message: format!("Could not process file: {}", file.name),
            });
        }

        Ok(UploadReceipt {
            message: "Processed and saved 12 transactions.".to_string(),
            filename: Some(file.name.clone()),
        })
    }
}

/// Sink that records every notice for later assertions.
#[derive(Default, Clone)]
pub struct CollectingSink {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl CollectingSink {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl NotificationSink for CollectingSink {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

/// Store whose backing is unavailable, for degradation tests.
pub struct FailingStore;

impl CredentialStore for FailingStore {
    fn set(&self, _credential: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("storage disabled".to_string()))
    }

    fn get(&self) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("storage disabled".to_string()))
    }

    fn clear(&self) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("storage disabled".to_string()))
    }
}

/// In-memory PDF candidate.
pub fn pdf(name: &str) -> FileHandle {
    FileHandle::from_bytes(name, ACCEPTED_MEDIA_TYPE, b"%PDF-1.4 stub".to_vec())
}

/// In-memory candidate of a type the service does not ingest.
pub fn text_file(name: &str) -> FileHandle {
    FileHandle::from_bytes(name, "text/plain", b"hello".to_vec())
}
