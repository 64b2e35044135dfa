use std::ffi::OsString;
use std::io::Write;

use super::{builtin_names, Command, CommandError};
use crate::core::Control;

/// Lists the builtin commands, one per line.
#[derive(Debug, Clone, Copy)]
pub struct HelpCommand;

impl Command for HelpCommand {
    fn execute(&self, _args: &[OsString], out: &mut dyn Write) -> Result<Control, CommandError> {
        for name in builtin_names() {
            writeln!(out, "{}", name)?;
        }
        out.flush()?;
        Ok(Control::Continue)
    }
}
