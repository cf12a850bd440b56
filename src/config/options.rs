use serde::{Deserialize, Serialize};

/// Options for controlling a parallel run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOptions {
    /// Fixed width for the progress line; `None` means detect from the
    /// terminal at run start
    pub width: Option<u16>,

    /// Whether to suppress progress output (items are still counted)
    pub silent: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            width: None,
            silent: false,
        }
    }
}

/// Builder pattern for RunOptions
pub struct RunOptionsBuilder {
    options: RunOptions,
}

impl RunOptionsBuilder {
    /// Creates a new RunOptionsBuilder with default values
    pub fn new() -> Self {
        Self {
            options: RunOptions::default(),
        }
    }

    /// Sets a fixed progress-line width
    pub fn width(mut self, width: Option<u16>) -> Self {
        self.options.width = width;
        self
    }

    /// Sets whether to suppress progress output
    pub fn silent(mut self, silent: bool) -> Self {
        self.options.silent = silent;
        self
    }

    /// Builds the RunOptions
    pub fn build(self) -> RunOptions {
        self.options
    }
}

impl Default for RunOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
