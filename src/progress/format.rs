use std::time::Duration;

use console::Term;
use indicatif::FormattedDuration;

/// Line width used when the terminal cannot report one.
pub const DEFAULT_WIDTH: u16 = 10;

/// Renders one progress line from `(done, total, elapsed_seconds, width)`.
pub type Formatter = Box<dyn Fn(u64, u64, f64, u16) -> String + Send + Sync>;

/// Half the terminal width as reported by the standard error stream,
/// falling back to [`DEFAULT_WIDTH`] when there is no terminal to ask.
pub fn detect_width() -> u16 {
    match Term::stderr().size_checked() {
        Some((_rows, cols)) if cols > 1 => cols / 2,
        _ => DEFAULT_WIDTH,
    }
}

/// Default meter line, e.g. ` 46%|#######--------| 14/30 [00:00:02<00:00:03, 5.12it/s]`.
///
/// `width` is the target width of the whole line; the bar absorbs whatever
/// space the fixed text leaves over, and never drops below one cell even
/// when the fixed text alone overflows `width`.
pub fn format_meter(done: u64, total: u64, elapsed: f64, width: u16) -> String {
    // An empty batch is complete by definition.
    let percent = if total == 0 { 100 } else { done * 100 / total };

    let elapsed_text = FormattedDuration(Duration::from_secs(elapsed as u64));
    let (eta_text, rate_text) = if done > 0 && elapsed > 0.0 {
        let rate = done as f64 / elapsed;
        let remaining = total.saturating_sub(done) as f64 / rate;
        (
            FormattedDuration(Duration::from_secs(remaining as u64)).to_string(),
            format!("{rate:.2}it/s"),
        )
    } else {
        ("?".to_string(), "?it/s".to_string())
    };

    let prefix = format!("{percent:>3}%|");
    let suffix = format!("| {done}/{total} [{elapsed_text}<{eta_text}, {rate_text}]");

    let bar_width = (width as usize)
        .saturating_sub(prefix.len() + suffix.len())
        .max(1);
    let filled = if total == 0 {
        bar_width
    } else {
        bar_width * done as usize / total as usize
    };
    let bar = "#".repeat(filled) + &"-".repeat(bar_width - filled);

    format!("{prefix}{bar}{suffix}")
}
