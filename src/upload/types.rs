use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::utils::format_size;

/// The only media type the analysis service ingests.
pub const ACCEPTED_MEDIA_TYPE: &str = "application/pdf";

/// Where a candidate file's bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    Path(PathBuf),
    Memory(Vec<u8>),
}

/// A candidate file: name, declared media type, byte size, and an opaque
/// reference to its contents. Bytes are materialized at submit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub name: String,
    pub media_type: String,
    pub size: u64,
    pub source: FileSource,
}

impl FileHandle {
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "invalid filename"))?
            .to_string();
        let size = fs::metadata(path)?.len();

        Ok(Self {
            name,
            media_type: media_type_for(path).to_string(),
            size,
            source: FileSource::Path(path.to_path_buf()),
        })
    }

    pub fn from_bytes(
        name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            size: bytes.len() as u64,
            source: FileSource::Memory(bytes),
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.media_type == ACCEPTED_MEDIA_TYPE
    }

    pub fn read_bytes(&self) -> io::Result<Vec<u8>> {
        match &self.source {
            FileSource::Path(path) => fs::read(path),
            FileSource::Memory(bytes) => Ok(bytes.clone()),
        }
    }

    /// `statement.pdf (1.20 MB)`, for user-facing detail text.
    pub fn describe(&self) -> String {
        format!("{} ({})", self.name, format_size(self.size))
    }
}

/// Declared media type from the filename extension. The service only
/// distinguishes PDFs from everything else.
pub fn media_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => ACCEPTED_MEDIA_TYPE,
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    InFlight,
    Succeeded,
    Failed,
}

/// One file's upload attempt. Mutated only by the orchestrator, discarded
/// with the batch once the run completes.
#[derive(Debug, Clone)]
pub struct UploadTask {
    pub file: FileHandle,
    pub status: TaskStatus,
    pub result_message: String,
}

impl UploadTask {
    pub fn pending(file: FileHandle) -> Self {
        Self {
            file,
            status: TaskStatus::Pending,
            result_message: String::new(),
        }
    }
}

/// Batch lifecycle: `Idle` until a non-empty batch starts, `Uploading`
/// while tasks run, `Completed` exactly once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchState {
    #[default]
    Idle,
    Uploading,
    Completed,
}

/// Terminal outcome of one task, as exposed in the batch report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub filename: String,
    pub succeeded: bool,
    pub message: String,
}

/// Ordered per-file outcomes of one batch run. Always one entry per
/// submitted task, in submission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReport {
    pub outcomes: Vec<UploadOutcome>,
}

impl UploadReport {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn successful(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.succeeded).count()
    }
}
