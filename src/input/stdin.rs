use std::io::{self, BufRead, Write};

use super::{LineSource, ReadOutcome};
use crate::error::ShellError;

/// Reads lines from any buffered reader and writes the prompt to `output`.
///
/// Used for piped input and scripts, where no line editing is wanted.
pub struct StdinSource<R, W> {
    reader: R,
    output: W,
    buffer: Vec<u8>,
}

impl StdinSource<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> StdinSource<R, W> {
    pub fn new(reader: R, output: W) -> Self {
        Self {
            reader,
            output,
            buffer: Vec::new(),
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> LineSource for StdinSource<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome, ShellError> {
        self.output.write_all(prompt.as_bytes())?;
        self.output.flush()?;

        self.buffer.clear();
        loop {
            match self.reader.read_until(b'\n', &mut self.buffer) {
                Ok(0) if self.buffer.is_empty() => return Ok(ReadOutcome::EndOfInput),
                Ok(_) => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(ShellError::Input(e)),
            }
        }

        // Lines are passed on byte for byte, never rejected for their content.
        Ok(ReadOutcome::Line(self.buffer.clone()))
    }
}
