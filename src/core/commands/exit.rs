use std::ffi::OsString;
use std::io::Write;

use super::{Command, CommandError};
use crate::core::Control;

#[derive(Debug, Clone, Copy)]
pub struct ExitCommand;

impl Command for ExitCommand {
    fn execute(&self, _args: &[OsString], _out: &mut dyn Write) -> Result<Control, CommandError> {
        Ok(Control::Stop)
    }
}
