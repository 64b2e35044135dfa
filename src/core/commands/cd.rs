use std::env;
use std::ffi::OsString;
use std::io::Write;

use super::{Command, CommandError};
use crate::core::Control;

/// Changes the working directory of the shell, and so of every program it
/// launches afterwards.
#[derive(Debug, Clone, Copy)]
pub struct CdCommand;

impl Command for CdCommand {
    fn execute(&self, args: &[OsString], _out: &mut dyn Write) -> Result<Control, CommandError> {
        let path = args
            .get(1)
            .ok_or(CommandError::MissingArgument("cd", "a directory"))?;

        env::set_current_dir(path)
            .map_err(|e| CommandError::ChangeDirectory(path.clone(), e))?;

        Ok(Control::Continue)
    }
}
