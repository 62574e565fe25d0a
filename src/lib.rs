//! Client core for a remote spend-analysis service: credential lifecycle,
//! the authenticated request gateway, and the sequential statement-upload
//! orchestrator. The presentation layer is an external collaborator; this
//! crate only emits notification events and passes dashboard markup
//! through untouched.

pub mod credentials;
pub mod gateway;
pub mod notify;
pub mod session;
pub mod upload;
pub mod utils;

pub use credentials::{CredentialStore, FileCredentialStore, MemoryCredentialStore, StorageError};
pub use gateway::{
    service_base_url, DashboardData, Gateway, GatewayError, HttpGateway, MarkupFragment,
    SummaryStats, UploadReceipt, CREDENTIAL_HEADER, DASHBOARD_PATH, DEFAULT_BASE_URL,
    KEY_CHECK_PATH, UPLOAD_PATH,
};
pub use notify::{ChannelSink, Notice, NotificationSink, ProgressObserver, Severity};
pub use session::{AuthSession, AuthState};
pub use upload::{
    collect_candidates, BatchState, FileHandle, FileSource, TaskStatus, UploadOrchestrator,
    UploadOutcome, UploadReport, UploadTask, ACCEPTED_MEDIA_TYPE,
};
