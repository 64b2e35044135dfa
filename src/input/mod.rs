mod editor;
mod stdin;

pub use editor::EditorSource;
pub use stdin::StdinSource;

use crate::error::ShellError;

/// Result of asking for one more command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Line(Vec<u8>),
    EndOfInput,
}

/// Where the shell reads its command lines from.
pub trait LineSource {
    /// Shows `prompt` and blocks until a full line or the end of input.
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome, ShellError>;
}
