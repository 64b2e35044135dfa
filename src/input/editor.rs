use log::debug;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use super::{LineSource, ReadOutcome};
use crate::error::ShellError;

/// Line editing for interactive terminals. Nothing is recorded in history.
pub struct EditorSource {
    editor: DefaultEditor,
}

impl EditorSource {
    pub fn new() -> Result<Self, ShellError> {
        let editor = DefaultEditor::new()?;
        Ok(Self { editor })
    }
}

impl LineSource for EditorSource {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome, ShellError> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(ReadOutcome::Line(line.into_bytes())),
            Err(ReadlineError::Eof) => Ok(ReadOutcome::EndOfInput),
            Err(ReadlineError::Interrupted) => {
                debug!("line discarded by the editor");
                Ok(ReadOutcome::Line(Vec::new()))
            }
            Err(e) => Err(ShellError::Readline(e)),
        }
    }
}
