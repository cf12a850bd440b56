use std::sync::atomic::{AtomicUsize, Ordering};

use log::{debug, error, warn};

use crate::error::WorkError;
use crate::progress::ProgressMeter;
use crate::queue::WorkQueue;

/// Identity of one worker for the lifetime of a run.
///
/// The index is stable and unique in `[0, worker_count)`, so per-worker side
/// effects (a per-worker output file, a per-worker connection) can be keyed
/// on it without colliding with the other workers.
#[derive(Debug)]
pub struct WorkerContext {
    index: usize,
}

impl WorkerContext {
    pub(crate) fn new(index: usize) -> Self {
        Self { index }
    }

    /// This worker's index.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Claims items until the queue is drained, advancing the meter once per
/// completed item. Failed items are logged and counted, never retried.
pub(crate) fn run_worker<T, F>(
    ctx: WorkerContext,
    queue: &WorkQueue<T>,
    meter: &ProgressMeter,
    work: &F,
    failed: &AtomicUsize,
) where
    F: Fn(&WorkerContext, T) -> Result<(), WorkError>,
{
    debug!("worker {} started", ctx.index());
    while let Some(item) = queue.dequeue() {
        match work(&ctx, item) {
            Ok(()) => {
                if let Err(e) = meter.advance_and_render() {
                    warn!("worker {}: progress write failed: {}", ctx.index(), e);
                }
            }
            Err(e) => {
                error!("worker {}: {}", ctx.index(), e);
                failed.fetch_add(1, Ordering::SeqCst);
            }
        }
    }
    debug!("worker {} drained the queue", ctx.index());
}
