use std::sync::Arc;

use crate::gateway::{Gateway, UPLOAD_PATH};
use crate::notify::{Notice, NotificationSink, ProgressObserver, Severity};
use crate::upload::types::{
    BatchState, FileHandle, TaskStatus, UploadOutcome, UploadReport, UploadTask,
};

/// Drives a batch of independently fallible uploads through the gateway,
/// one file at a time, in submission order.
pub struct UploadOrchestrator {
    gateway: Arc<dyn Gateway>,
    sink: Arc<dyn NotificationSink>,
    state: BatchState,
    tasks: Vec<UploadTask>,
}

impl UploadOrchestrator {
    pub fn new(gateway: Arc<dyn Gateway>, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            gateway,
            sink,
            state: BatchState::Idle,
            tasks: Vec::new(),
        }
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    /// Tasks of the current batch, in submission order. Empty outside a
    /// run.
    pub fn tasks(&self) -> &[UploadTask] {
        &self.tasks
    }

    /// Returns to `Idle`, ready for the next batch.
    pub fn reset(&mut self) {
        self.tasks.clear();
        self.state = BatchState::Idle;
    }

    /// Runs one batch to completion.
    ///
    /// Candidates outside the accepted media type are excluded up front,
    /// silently. An empty filtered batch emits a warning and issues no
    /// network call. A failing task never halts the batch; the report has
    /// exactly one entry per submitted task, in submission order, and the
    /// progress stream is non-decreasing, reaching 100 only after the
    /// final task resolves.
    pub async fn run(
        &mut self,
        candidates: Vec<FileHandle>,
        progress: &dyn ProgressObserver,
    ) -> UploadReport {
        let accepted: Vec<FileHandle> = candidates
            .into_iter()
            .filter(FileHandle::is_accepted)
            .collect();

        if accepted.is_empty() {
            self.sink.notify(Notice::new(
                Severity::Warn,
                "Nothing to upload",
                "Please add some PDF files to upload",
            ));
            return UploadReport::default();
        }

        self.state = BatchState::Uploading;
        self.tasks = accepted.into_iter().map(UploadTask::pending).collect();

        // Batch size is fixed from here on; the loop only flips task
        // states in place.
        let total = self.tasks.len();
        for index in 0..total {
            progress.on_progress(percent(index, total));
            self.tasks[index].status = TaskStatus::InFlight;

            let file = self.tasks[index].file.clone();
            match self.gateway.submit_file(UPLOAD_PATH, &file).await {
                Ok(receipt) => {
                    self.tasks[index].status = TaskStatus::Succeeded;
                    self.tasks[index].result_message = receipt.message;
                    self.sink.notify(Notice::new(
                        Severity::Success,
                        "Success",
                        format!("Successfully processed {}", file.describe()),
                    ));
                }
                Err(err) => {
                    // One bad statement must not sink the rest of the
                    // batch.
                    self.tasks[index].status = TaskStatus::Failed;
                    self.tasks[index].result_message = err.to_string();
                    self.sink.notify(Notice::new(
                        Severity::Error,
                        "Error",
                        format!("Failed to process {}: {}", file.describe(), err),
                    ));
                }
            }
        }
        progress.on_progress(100);

        self.state = BatchState::Completed;
        let report = UploadReport {
            outcomes: self
                .tasks
                .iter()
                .map(|task| UploadOutcome {
                    filename: task.file.name.clone(),
                    succeeded: task.status == TaskStatus::Succeeded,
                    message: task.result_message.clone(),
                })
                .collect(),
        };

        // No cross-batch history: the working batch is dropped once the
        // report is out.
        self.tasks.clear();
        report
    }
}

/// Whole progress points, floored, so the sequence is reproducible.
fn percent(completed: usize, total: usize) -> u8 {
    ((completed * 100) / total) as u8
}
