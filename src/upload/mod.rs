mod candidates;
mod orchestrator;
mod types;

pub use candidates::collect_candidates;
pub use orchestrator::UploadOrchestrator;
pub use types::{
    media_type_for, BatchState, FileHandle, FileSource, TaskStatus, UploadOutcome, UploadReport,
    UploadTask, ACCEPTED_MEDIA_TYPE,
};
