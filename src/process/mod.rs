use std::fmt;

use nix::errno::Errno;

pub mod launcher;

pub use launcher::{ExitState, ProcessLauncher};

#[derive(Debug)]
pub enum ProcessError {
    EmptyCommand,
    NulByte(String),
    Fork(Errno),
    Wait(Errno),
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::EmptyCommand => write!(f, "no program to run"),
            ProcessError::NulByte(program) => {
                write!(f, "{}: argument contains a NUL byte", program)
            }
            ProcessError::Fork(e) => write!(f, "failed to create process: {}", e.desc()),
            ProcessError::Wait(e) => write!(f, "failed to wait for process: {}", e.desc()),
        }
    }
}

impl std::error::Error for ProcessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProcessError::Fork(e) | ProcessError::Wait(e) => Some(e),
            ProcessError::EmptyCommand | ProcessError::NulByte(_) => None,
        }
    }
}
