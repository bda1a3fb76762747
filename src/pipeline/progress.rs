use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// Advisory signal emitted while a crawl runs
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    PageStarted { page: u32, total: u32 },
    PageCompleted { page: u32, total: u32, records: usize },
    PageFailed { page: u32, total: u32, error: String },
    Notice(String),
    Finished { records: usize },
}

/// Best-effort sender side of the progress channel
///
/// Never blocks the producer; events sent after the receiver is dropped are
/// discarded.
#[derive(Debug, Clone, Default)]
pub struct ProgressReporter {
    tx: Option<UnboundedSender<ProgressEvent>>,
}

impl ProgressReporter {
    pub fn silent() -> Self {
        Self { tx: None }
    }

    pub fn channel() -> (Self, UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    pub fn emit(&self, event: ProgressEvent) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }

    pub fn notice(&self, message: impl Into<String>) {
        self.emit(ProgressEvent::Notice(message.into()));
    }
}
