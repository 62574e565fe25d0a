use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use thiserror::Error;

use crate::credentials::CredentialStore;
use crate::gateway::types::{DashboardData, UploadReceipt, ValidationVerdict};
use crate::upload::FileHandle;

/// Header carrying the opaque token on every authenticated call.
pub const CREDENTIAL_HEADER: &str = "X-API-Key";

pub const KEY_CHECK_PATH: &str = "/api-key-check";
pub const UPLOAD_PATH: &str = "/upload";
pub const DASHBOARD_PATH: &str = "/dashboard";

#[derive(Debug, Error)]
pub enum GatewayError {
    /// An authenticated call was attempted with no credential anywhere.
    /// Raised before any network round trip.
    #[error("no API key configured; set one in settings first")]
    CredentialMissing,
    /// The service refused the request (4xx). Distinct from an outage.
    #[error("service rejected the request (HTTP {status}): {message}")]
    RemoteRejected { status: u16, message: String },
    /// Network unreachable, timeout, server failure, or a malformed
    /// response body.
    #[error("transport failure: {0}")]
    Transport(String),
    /// The service reported the submitted file as too large.
    #[error("file too large for the service: {0}")]
    PayloadTooLarge(String),
    /// The service reported the submitted media type as unsupported.
    #[error("unsupported media type: {0}")]
    UnsupportedMedia(String),
}

/// The sole seam through which authenticated calls leave the client.
///
/// A rejected credential is a `false` verdict from [`Gateway::validate`],
/// never an error; errors are reserved for the taxonomy on
/// [`GatewayError`].
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Sets the working-copy credential used on subsequent calls. May be
    /// called any number of times; last call wins.
    fn attach(&self, credential: &str);

    /// Drops the working-copy credential.
    fn detach(&self);

    /// Asks the service whether the current credential is accepted.
    async fn validate(&self) -> Result<bool, GatewayError>;

    /// Authenticated GET returning the raw payload for `path`.
    async fn fetch_resource(&self, path: &str) -> Result<serde_json::Value, GatewayError>;

    /// Authenticated multipart submission of one file to `path`.
    async fn submit_file(&self, path: &str, file: &FileHandle)
        -> Result<UploadReceipt, GatewayError>;

    /// Typed view of the dashboard payload. Markup fragments pass through
    /// undecoded.
    async fn fetch_dashboard(&self) -> Result<DashboardData, GatewayError> {
        let payload = self.fetch_resource(DASHBOARD_PATH).await?;
        serde_json::from_value(payload)
            .map_err(|e| GatewayError::Transport(format!("malformed dashboard payload: {}", e)))
    }
}

/// Gateway over HTTP. Reads the credential store fresh on every call so an
/// externally updated credential takes effect on the next request; the
/// attached working copy covers sessions whose storage is unavailable.
pub struct HttpGateway {
    http: reqwest::Client,
    base_url: String,
    store: Arc<dyn CredentialStore>,
    working_copy: RwLock<Option<String>>,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>, store: Arc<dyn CredentialStore>) -> Self {
        // Seed the working copy once so a previously saved key works
        // without a fresh attach.
        let initial = store.get().unwrap_or(None);

        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            store,
            working_copy: RwLock::new(initial),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn resolve_credential(&self) -> Result<String, GatewayError> {
        if let Ok(Some(credential)) = self.store.get() {
            return Ok(credential);
        }

        self.working_copy
            .read()
            .unwrap_or_else(|poison| poison.into_inner())
            .clone()
            .ok_or(GatewayError::CredentialMissing)
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    fn attach(&self, credential: &str) {
        let mut working_copy = self
            .working_copy
            .write()
            .unwrap_or_else(|poison| poison.into_inner());
        *working_copy = Some(credential.to_string());
    }

    fn detach(&self) {
        let mut working_copy = self
            .working_copy
            .write()
            .unwrap_or_else(|poison| poison.into_inner());
        *working_copy = None;
    }

    async fn validate(&self) -> Result<bool, GatewayError> {
        let credential = self.resolve_credential()?;

        let response = self
            .http
            .get(self.url(KEY_CHECK_PATH))
            .header(CREDENTIAL_HEADER, credential)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(format!("failed to send request: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            let verdict: ValidationVerdict = response.json().await.map_err(|e| {
                GatewayError::Transport(format!("malformed validation response: {}", e))
            })?;
            return Ok(verdict.valid);
        }

        // The service answers an auth failure here with a verdict, not an
        // outage.
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Ok(false);
        }

        Err(GatewayError::Transport(format!(
            "key check failed with status: {}",
            status
        )))
    }

    async fn fetch_resource(&self, path: &str) -> Result<serde_json::Value, GatewayError> {
        let credential = self.resolve_credential()?;

        let response = self
            .http
            .get(self.url(path))
            .header(CREDENTIAL_HEADER, credential)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(format!("failed to send request: {}", e)))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_rejection(status, &body));
        }

        response
            .json()
            .await
            .map_err(|e| GatewayError::Transport(format!("malformed response payload: {}", e)))
    }

    async fn submit_file(
        &self,
        path: &str,
        file: &FileHandle,
    ) -> Result<UploadReceipt, GatewayError> {
        let credential = self.resolve_credential()?;

        let bytes = file
            .read_bytes()
            .map_err(|e| GatewayError::Transport(format!("failed to read {}: {}", file.name, e)))?;

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file.name.clone())
            .mime_str(&file.media_type)
            .map_err(|e| GatewayError::UnsupportedMedia(format!("{}: {}", file.media_type, e)))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(self.url(path))
            .header(CREDENTIAL_HEADER, credential)
            .multipart(form)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(format!("failed to send request: {}", e)))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_rejection(status, &body));
        }

        response
            .json()
            .await
            .map_err(|e| GatewayError::Transport(format!("malformed upload response: {}", e)))
    }
}

/// Maps a non-success status onto the error taxonomy.
fn classify_rejection(status: u16, body: &str) -> GatewayError {
    let message = error_message(status, body);
    match status {
        413 => GatewayError::PayloadTooLarge(message),
        415 => GatewayError::UnsupportedMedia(message),
        400..=499 => GatewayError::RemoteRejected { status, message },
        _ => GatewayError::Transport(format!("request failed with status {}: {}", status, message)),
    }
}

/// The service reports errors as `{"error": "..."}`; fall back to the raw
/// body, or the bare status when the body is empty.
fn error_message(status: u16, body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .and_then(|message| message.as_str())
                .map(str::to_string)
        });

    match from_json {
        Some(message) => message,
        None if body.trim().is_empty() => format!("HTTP {}", status),
        None => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_and_media_rejections_have_their_own_kinds() {
        assert!(matches!(
            classify_rejection(413, ""),
            GatewayError::PayloadTooLarge(_)
        ));
        assert!(matches!(
            classify_rejection(415, ""),
            GatewayError::UnsupportedMedia(_)
        ));
    }

    #[test]
    fn auth_failures_map_to_remote_rejected_with_the_server_message() {
        let err = classify_rejection(401, r#"{"error": "Invalid API key"}"#);
        match err {
            GatewayError::RemoteRejected { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid API key");
            }
            other => panic!("unexpected classification: {:?}", other),
        }
    }

    #[test]
    fn server_failures_map_to_transport() {
        assert!(matches!(
            classify_rejection(500, "boom"),
            GatewayError::Transport(_)
        ));
        assert!(matches!(
            classify_rejection(503, ""),
            GatewayError::Transport(_)
        ));
    }

    #[test]
    fn error_message_prefers_the_json_error_field() {
        assert_eq!(
            error_message(422, r#"{"error": "Could not process file"}"#),
            "Could not process file"
        );
        assert_eq!(error_message(400, "plain text"), "plain text");
        assert_eq!(error_message(404, ""), "HTTP 404");
    }
}
