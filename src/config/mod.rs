mod options;

pub use options::{RunOptions, RunOptionsBuilder};
