mod worker;

pub use worker::WorkerContext;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use log::info;

use crate::config::RunOptions;
use crate::error::{ParallelError, WorkError};
use crate::progress::{self, ProgressMeter};
use crate::queue::WorkQueue;
use worker::run_worker;

/// Coordinates one batch run: seeds the queue, spawns the workers, waits for
/// all of them, and finalizes the progress display.
pub struct Dispatcher {
    failed: AtomicUsize,
}

/// Statistics from one batch run
#[derive(Debug)]
pub struct RunStats {
    /// Items the work function completed successfully
    pub completed: usize,
    /// Items the work function returned an error for
    pub failed: usize,
}

impl Dispatcher {
    /// Creates a new Dispatcher instance
    pub fn new() -> Self {
        Self {
            failed: AtomicUsize::new(0),
        }
    }

    /// Runs `work` over `items` on `worker_count` threads, rendering a
    /// progress line on standard error.
    ///
    /// Items whose work function returns `Err` are logged, counted in
    /// [`RunStats::failed`], and skipped; the run continues and the meter
    /// ends short of 100% by the number of failures.
    pub fn run<T, F>(
        &self,
        work: F,
        items: Vec<T>,
        worker_count: usize,
        options: &RunOptions,
    ) -> Result<RunStats, ParallelError>
    where
        T: Send,
        F: Fn(&WorkerContext, T) -> Result<(), WorkError> + Sync,
    {
        let total = items.len() as u64;
        let meter = if options.silent {
            ProgressMeter::silent(total)
        } else {
            let width = options.width.unwrap_or_else(progress::detect_width);
            ProgressMeter::stderr(total, width)
        };
        self.run_with_meter(work, items, worker_count, &meter)
    }

    /// Like [`run`](Dispatcher::run), but renders through a caller-built
    /// meter, e.g. one with a custom formatter or sink.
    pub fn run_with_meter<T, F>(
        &self,
        work: F,
        items: Vec<T>,
        worker_count: usize,
        meter: &ProgressMeter,
    ) -> Result<RunStats, ParallelError>
    where
        T: Send,
        F: Fn(&WorkerContext, T) -> Result<(), WorkError> + Sync,
    {
        if worker_count == 0 {
            return Err(ParallelError::InvalidWorkerCount(worker_count));
        }
        self.failed.store(0, Ordering::SeqCst);

        meter.render_initial()?;
        if items.is_empty() {
            // Nothing to dispatch; the initial line already reads complete.
            meter.finish()?;
            return Ok(RunStats {
                completed: 0,
                failed: 0,
            });
        }

        let queue = WorkQueue::new(items);
        info!(
            "dispatching {} items across {} workers",
            queue.total(),
            worker_count
        );

        let mut panicked = None;
        thread::scope(|s| {
            let handles: Vec<_> = (0..worker_count)
                .map(|index| {
                    let queue = &queue;
                    let work = &work;
                    let failed = &self.failed;
                    s.spawn(move || run_worker(WorkerContext::new(index), queue, meter, work, failed))
                })
                .collect();

            for (index, handle) in handles.into_iter().enumerate() {
                if handle.join().is_err() && panicked.is_none() {
                    panicked = Some(index);
                }
            }
        });

        meter.finish()?;

        if let Some(index) = panicked {
            return Err(ParallelError::WorkerPanicked { index });
        }
        Ok(RunStats {
            completed: meter.completed() as usize,
            failed: self.failed.load(Ordering::SeqCst),
        })
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
