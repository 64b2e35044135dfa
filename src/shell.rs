use std::io::IsTerminal;

use log::debug;

use crate::core::commands::CommandExecutor;
use crate::core::Control;
use crate::error::ShellError;
use crate::flags::Flags;
use crate::input::{EditorSource, LineSource, ReadOutcome, StdinSource};
use crate::parse::tokenize;

pub const PROMPT: &str = "> ";

/// Why the read loop ended without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The `exit` builtin was run.
    Exit,
    /// Standard input was exhausted.
    EndOfInput,
}

pub struct Shell {
    source: Box<dyn LineSource>,
    executor: CommandExecutor,
}

impl Shell {
    pub fn new(flags: &Flags) -> Result<Self, ShellError> {
        let source: Box<dyn LineSource> =
            if !flags.is_set("plain") && std::io::stdin().is_terminal() {
                debug!("reading from the line editor");
                Box::new(EditorSource::new()?)
            } else {
                debug!("reading from plain standard input");
                Box::new(StdinSource::stdio())
            };

        Ok(Self::with_source(source, CommandExecutor::new(flags)))
    }

    pub fn with_source(source: Box<dyn LineSource>, executor: CommandExecutor) -> Self {
        Shell { source, executor }
    }

    /// Prompts, reads, tokenizes and dispatches until `exit` or end of input.
    ///
    /// Input errors and allocation failures end the loop with an error.
    pub fn run(&mut self) -> Result<Termination, ShellError> {
        loop {
            let line = match self.source.read_line(PROMPT)? {
                ReadOutcome::Line(line) => line,
                ReadOutcome::EndOfInput => {
                    debug!("end of input");
                    return Ok(Termination::EndOfInput);
                }
            };

            let args = tokenize(&line)?;
            if self.executor.dispatch(&args) == Control::Stop {
                debug!("exit requested");
                return Ok(Termination::Exit);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::Highlighter;
    use std::cell::RefCell;
    use std::io::{self, Cursor};
    use std::rc::Rc;

    type Prompts = Rc<RefCell<Vec<String>>>;

    /// Replays canned outcomes and records the prompts it was shown.
    struct ScriptedSource {
        outcomes: Vec<Result<ReadOutcome, ShellError>>,
        prompts: Prompts,
    }

    impl LineSource for ScriptedSource {
        fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome, ShellError> {
            self.prompts.borrow_mut().push(prompt.to_string());
            if self.outcomes.is_empty() {
                return Ok(ReadOutcome::EndOfInput);
            }
            self.outcomes.remove(0)
        }
    }

    fn shell(outcomes: Vec<Result<ReadOutcome, ShellError>>) -> (Shell, Prompts) {
        let prompts = Rc::new(RefCell::new(Vec::new()));
        let source = ScriptedSource {
            outcomes,
            prompts: Rc::clone(&prompts),
        };
        let executor = CommandExecutor::with_highlighter(Highlighter::new(false));
        (Shell::with_source(Box::new(source), executor), prompts)
    }

    fn line(s: &str) -> Result<ReadOutcome, ShellError> {
        Ok(ReadOutcome::Line(s.as_bytes().to_vec()))
    }

    #[test]
    fn test_exit_stops_loop() {
        let (mut shell, prompts) = shell(vec![line("exit\n"), line("true\n")]);
        assert_eq!(shell.run().expect("run"), Termination::Exit);
        assert_eq!(prompts.borrow().len(), 1);
    }

    #[test]
    fn test_exit_with_arguments() {
        let (mut shell, _) = shell(vec![line("  exit now \n")]);
        assert_eq!(shell.run().expect("run"), Termination::Exit);
    }

    #[test]
    fn test_end_of_input_terminates() {
        let (mut shell, prompts) = shell(vec![]);
        assert_eq!(shell.run().expect("run"), Termination::EndOfInput);
        assert_eq!(*prompts.borrow(), vec![PROMPT.to_string()]);
    }

    #[test]
    fn test_blank_lines_keep_prompting() {
        let (mut shell, prompts) = shell(vec![
            line("\n"),
            line(" \t \r\n"),
            line(""),
            line("exit\n"),
        ]);
        assert_eq!(shell.run().expect("run"), Termination::Exit);
        assert_eq!(prompts.borrow().len(), 4);
    }

    #[test]
    fn test_text_after_nul_is_ignored() {
        let (mut shell, prompts) = shell(vec![line("\0exit\n"), line("exit\0 now\n")]);
        assert_eq!(shell.run().expect("run"), Termination::Exit);
        assert_eq!(prompts.borrow().len(), 2);
    }

    #[test]
    fn test_external_commands_do_not_stop() {
        let (mut shell, prompts) = shell(vec![
            line("false\n"),
            line("minish-test-no-such-program-xyz\n"),
        ]);
        assert_eq!(shell.run().expect("run"), Termination::EndOfInput);
        assert_eq!(prompts.borrow().len(), 3);
    }

    #[test]
    fn test_input_error_is_fatal() {
        let (mut shell, _) = shell(vec![
            line("true\n"),
            Err(ShellError::Input(io::Error::new(io::ErrorKind::Other, "boom"))),
            line("exit\n"),
        ]);
        assert!(matches!(shell.run(), Err(ShellError::Input(_))));
    }

    #[test]
    fn test_with_stdin_source() {
        let source = StdinSource::new(Cursor::new(b"\n\nexit\n".to_vec()), Vec::new());
        let executor = CommandExecutor::with_highlighter(Highlighter::new(false));
        let mut shell = Shell::with_source(Box::new(source), executor);
        assert_eq!(shell.run().expect("run"), Termination::Exit);
    }
}
