// Re-export the primary types and functions
pub mod config;
pub mod error;
pub mod pool;
pub mod progress;
pub mod queue;

pub use config::{RunOptions, RunOptionsBuilder};
pub use error::{ParallelError, WorkError};
pub use pool::{Dispatcher, RunStats, WorkerContext};
pub use progress::ProgressMeter;
pub use queue::WorkQueue;

/// Runs `work` over every item in `items` on `worker_count` parallel
/// workers, maintaining a single progress line on standard error.
///
/// The work function receives a [`WorkerContext`] carrying the worker's
/// stable index, so per-worker side effects can be partitioned without
/// collisions. Blocks until every item has been processed; items whose work
/// function returns `Err` are logged, counted in [`RunStats::failed`], and
/// skipped.
///
/// # Examples
///
/// Each worker appends the items it claims to its own file, so concurrent
/// writers never touch the same path:
///
/// ```no_run
/// use std::fs::OpenOptions;
/// use std::io::Write;
/// use parbar::{parallel, WorkError, WorkerContext};
///
/// let stats = parallel(
///     |ctx: &WorkerContext, x: u32| -> Result<(), WorkError> {
///         let mut file = OpenOptions::new()
///             .create(true)
///             .append(true)
///             .open(format!("{}.txt", ctx.index()))?;
///         writeln!(file, "{x}")?;
///         Ok(())
///     },
///     (0..30).collect(),
///     4,
/// )?;
/// assert_eq!(stats.completed, 30);
/// # Ok::<(), parbar::ParallelError>(())
/// ```
pub fn parallel<T, F>(work: F, items: Vec<T>, worker_count: usize) -> Result<RunStats, ParallelError>
where
    T: Send,
    F: Fn(&WorkerContext, T) -> Result<(), WorkError> + Sync,
{
    parallel_with_options(work, items, worker_count, &RunOptions::default())
}

/// Like [`parallel`], with explicit [`RunOptions`].
pub fn parallel_with_options<T, F>(
    work: F,
    items: Vec<T>,
    worker_count: usize,
    options: &RunOptions,
) -> Result<RunStats, ParallelError>
where
    T: Send,
    F: Fn(&WorkerContext, T) -> Result<(), WorkError> + Sync,
{
    Dispatcher::new().run(work, items, worker_count, options)
}
