use thiserror::Error;

/// Error type a work function may return for a single item.
///
/// Failed items are logged and counted, never retried; any error that can
/// cross a thread boundary fits here.
pub type WorkError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum ParallelError {
    #[error("invalid worker count: {0}, at least one worker is required")]
    InvalidWorkerCount(usize),

    #[error("progress stream error: {0}")]
    Io(#[from] std::io::Error),

    #[error("worker {index} panicked while processing an item")]
    WorkerPanicked { index: usize },
}
