use tokio::sync::mpsc::UnboundedSender;

/// Severity of a user-facing notification event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warn,
    Error,
}

/// One discrete notification event. The core only emits these; rendering
/// them is the presentation layer's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
}

impl Notice {
    pub fn new(severity: Severity, summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity,
            summary: summary.into(),
            detail: detail.into(),
        }
    }
}

/// Receiver of notification events, injected into the session and the
/// upload orchestrator so callers decide where feedback goes.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Forwards notices to a channel, typically drained by a UI task.
pub struct ChannelSink {
    sender: UnboundedSender<Notice>,
}

impl ChannelSink {
    pub fn new(sender: UnboundedSender<Notice>) -> Self {
        Self { sender }
    }
}

impl NotificationSink for ChannelSink {
    fn notify(&self, notice: Notice) {
        // The receiving side may already be gone during shutdown.
        self.sender.send(notice).unwrap_or_default();
    }
}

/// Observer of the upload progress stream. Implemented for any closure so
/// callers can record or forward percentages without a dedicated type.
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, percent: u8);
}

impl<F> ProgressObserver for F
where
    F: Fn(u8) + Send + Sync,
{
    fn on_progress(&self, percent: u8) {
        self(percent)
    }
}
