mod format;

pub use format::{detect_width, format_meter, Formatter, DEFAULT_WIDTH};

use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Shared progress state for one run: a completion count and the gate that
/// serializes every update-and-render against the shared output stream.
///
/// The count lives inside the mutex, so "increment, format, write" is a
/// single critical section and two workers can never interleave their lines.
/// One render happens per completed item, each ending in a carriage return
/// so the line is overwritten in place; [`finish`](ProgressMeter::finish)
/// drops the final newline.
pub struct ProgressMeter {
    state: Mutex<MeterState>,
    total: u64,
    start: Instant,
    width: u16,
    format: Formatter,
    silent: bool,
}

struct MeterState {
    done: u64,
    out: Box<dyn Write + Send>,
}

impl ProgressMeter {
    /// Meter with the default formatter, writing to standard error.
    pub fn stderr(total: u64, width: u16) -> Self {
        Self::with_sink(total, width, Box::new(format_meter), Box::new(io::stderr()))
    }

    /// Meter with a caller-supplied formatter and sink.
    pub fn with_sink(total: u64, width: u16, format: Formatter, out: Box<dyn Write + Send>) -> Self {
        Self {
            state: Mutex::new(MeterState { done: 0, out }),
            total,
            start: Instant::now(),
            width,
            format,
            silent: false,
        }
    }

    /// Meter that counts completions but never writes.
    pub fn silent(total: u64) -> Self {
        let mut meter = Self::with_sink(total, DEFAULT_WIDTH, Box::new(format_meter), Box::new(io::sink()));
        meter.silent = true;
        meter
    }

    fn lock_state(&self) -> MutexGuard<'_, MeterState> {
        // A formatter that panicked in another worker must not wedge the gate.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Writes the line for the current count without advancing it.
    ///
    /// Called once before workers start; for an empty batch this single
    /// line already reads 100%.
    pub fn render_initial(&self) -> io::Result<()> {
        let mut state = self.lock_state();
        let done = state.done;
        self.write_line(&mut state, done)
    }

    /// Advances the count by one and renders the updated line.
    ///
    /// The whole sequence runs under the gate: no other worker's output can
    /// appear between the increment and the write. Returns the new count.
    pub fn advance_and_render(&self) -> io::Result<u64> {
        let mut state = self.lock_state();
        state.done += 1;
        let done = state.done;
        self.write_line(&mut state, done)?;
        Ok(done)
    }

    /// Terminates the progress display with a newline.
    pub fn finish(&self) -> io::Result<()> {
        if self.silent {
            return Ok(());
        }
        let mut state = self.lock_state();
        writeln!(state.out)?;
        state.out.flush()
    }

    fn write_line(&self, state: &mut MeterState, done: u64) -> io::Result<()> {
        if self.silent {
            return Ok(());
        }
        let line = (self.format)(done, self.total, self.start.elapsed().as_secs_f64(), self.width);
        write!(state.out, "{line}\r")?;
        state.out.flush()
    }

    /// Items completed so far.
    pub fn completed(&self) -> u64 {
        self.lock_state().done
    }

    /// Total items in the batch.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Time since the meter was created.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[derive(Clone)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn new() -> Self {
            Self(Arc::new(Mutex::new(Vec::new())))
        }

        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn recording_formatter(record: Arc<Mutex<Vec<u64>>>) -> Formatter {
        Box::new(move |done, total, _elapsed, _width| {
            record.lock().unwrap().push(done);
            format!("[{done:>6}/{total}]")
        })
    }

    #[test]
    fn advance_returns_the_new_count() {
        let meter = ProgressMeter::silent(3);
        assert_eq!(meter.advance_and_render().unwrap(), 1);
        assert_eq!(meter.advance_and_render().unwrap(), 2);
        assert_eq!(meter.completed(), 2);
        assert_eq!(meter.total(), 3);
    }

    #[test]
    fn initial_render_writes_the_zero_line() {
        let buf = SharedBuf::new();
        let meter = ProgressMeter::with_sink(5, 40, Box::new(format_meter), Box::new(buf.clone()));
        meter.render_initial().unwrap();

        let out = buf.contents();
        assert!(out.starts_with("  0%|"), "got: {out}");
        assert!(out.ends_with('\r'));
    }

    #[test]
    fn render_counts_increase_by_one_under_concurrency() {
        let record = Arc::new(Mutex::new(Vec::new()));
        let buf = SharedBuf::new();
        let meter =
            ProgressMeter::with_sink(200, 40, recording_formatter(record.clone()), Box::new(buf.clone()));

        thread::scope(|s| {
            for worker in 0..4 {
                let meter = &meter;
                s.spawn(move || {
                    for i in 0..50 {
                        // Deterministic jitter so workers land on the gate out of phase.
                        thread::sleep(Duration::from_micros(((worker + i) % 5) as u64 * 40));
                        meter.advance_and_render().unwrap();
                    }
                });
            }
        });

        let counts = record.lock().unwrap().clone();
        assert_eq!(counts, (1..=200).collect::<Vec<u64>>());
        assert_eq!(meter.completed(), 200);
    }

    #[test]
    fn concurrent_renders_never_interleave_bytes() {
        let buf = SharedBuf::new();
        let meter = ProgressMeter::with_sink(
            120,
            40,
            Box::new(|done, total, _, _| format!("[{done:>6}/{total}]")),
            Box::new(buf.clone()),
        );

        thread::scope(|s| {
            for worker in 0..6 {
                let meter = &meter;
                s.spawn(move || {
                    for i in 0..20 {
                        thread::sleep(Duration::from_micros(((worker * 7 + i) % 9) as u64 * 30));
                        meter.advance_and_render().unwrap();
                    }
                });
            }
        });

        let out = buf.contents();
        let chunks: Vec<&str> = out.split('\r').filter(|c| !c.is_empty()).collect();
        assert_eq!(chunks.len(), 120);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(*chunk, format!("[{:>6}/120]", i + 1), "corrupted render at {i}");
        }
    }

    #[test]
    fn silent_meter_counts_without_writing() {
        let meter = ProgressMeter::silent(2);
        meter.render_initial().unwrap();
        meter.advance_and_render().unwrap();
        meter.advance_and_render().unwrap();
        meter.finish().unwrap();
        assert_eq!(meter.completed(), 2);
    }
}
