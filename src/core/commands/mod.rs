use std::ffi::{OsStr, OsString};
use std::io::{self, Write};

mod cd;
mod exit;
mod help;

pub use cd::CdCommand;
pub use exit::ExitCommand;
pub use help::HelpCommand;

use log::debug;

use crate::core::Control;
use crate::flags::Flags;
use crate::highlight::Highlighter;
use crate::process::ProcessLauncher;

#[derive(Debug)]
pub enum CommandError {
    MissingArgument(&'static str, &'static str),
    ChangeDirectory(OsString, io::Error),
    IoError(io::Error),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::MissingArgument(cmd, what) => {
                write!(f, "{}: expected {} argument", cmd, what)
            }
            CommandError::ChangeDirectory(path, err) => {
                write!(
                    f,
                    "cd: failed to change directory to {}: {}",
                    path.to_string_lossy(),
                    err
                )
            }
            CommandError::IoError(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<io::Error> for CommandError {
    fn from(err: io::Error) -> Self {
        CommandError::IoError(err)
    }
}

/// A command run inside the shell process.
///
/// `args` is the whole argument vector, so `args[0]` is the command name.
pub trait Command {
    fn execute(&self, args: &[OsString], out: &mut dyn Write) -> Result<Control, CommandError>;
}

#[derive(Debug, Clone, Copy)]
pub enum Builtin {
    Cd(CdCommand),
    Help(HelpCommand),
    Exit(ExitCommand),
}

impl Command for Builtin {
    fn execute(&self, args: &[OsString], out: &mut dyn Write) -> Result<Control, CommandError> {
        match self {
            Builtin::Cd(cmd) => cmd.execute(args, out),
            Builtin::Help(cmd) => cmd.execute(args, out),
            Builtin::Exit(cmd) => cmd.execute(args, out),
        }
    }
}

static BUILTINS: [(&str, Builtin); 3] = [
    ("cd", Builtin::Cd(CdCommand)),
    ("help", Builtin::Help(HelpCommand)),
    ("exit", Builtin::Exit(ExitCommand)),
];

/// Finds the builtin named exactly `name`.
pub fn lookup(name: impl AsRef<OsStr>) -> Option<Builtin> {
    let name = name.as_ref();
    BUILTINS
        .iter()
        .find(|(builtin, _)| OsStr::new(builtin) == name)
        .map(|(_, cmd)| *cmd)
}

pub fn builtin_names() -> impl Iterator<Item = &'static str> {
    BUILTINS.iter().map(|(name, _)| *name)
}

/// Routes an argument vector to a builtin or to an external program.
#[derive(Debug, Clone, Copy)]
pub struct CommandExecutor {
    launcher: ProcessLauncher,
    highlighter: Highlighter,
}

impl CommandExecutor {
    pub fn new(flags: &Flags) -> Self {
        let highlighter = Highlighter::new(!flags.is_set("no-color"));
        Self {
            launcher: ProcessLauncher::new(highlighter),
            highlighter,
        }
    }

    pub fn with_highlighter(highlighter: Highlighter) -> Self {
        Self {
            launcher: ProcessLauncher::new(highlighter),
            highlighter,
        }
    }

    /// Runs `args` with the shell's standard output and error.
    pub fn dispatch(&self, args: &[OsString]) -> Control {
        self.dispatch_to(args, &mut io::stdout(), &mut io::stderr())
    }

    /// Runs `args`, sending builtin output to `out` and diagnostics to `err`.
    ///
    /// Builtin failures are reported and the shell keeps going.
    pub fn dispatch_to(
        &self,
        args: &[OsString],
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Control {
        let Some(name) = args.first() else {
            return Control::Continue;
        };

        match lookup(name) {
            Some(builtin) => {
                debug!("running builtin {}", name.to_string_lossy());
                match builtin.execute(args, out) {
                    Ok(control) => control,
                    Err(e) => {
                        self.highlighter.report(err, &e.to_string());
                        Control::Continue
                    }
                }
            }
            None => {
                debug!("launching {}", name.to_string_lossy());
                self.launcher.launch(args, err)
            }
        }
    }

    pub fn is_builtin(&self, command: impl AsRef<OsStr>) -> bool {
        lookup(command).is_some()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::env;
    use std::os::unix::ffi::OsStrExt;
    use std::sync::{Mutex, MutexGuard, OnceLock};

    /// Serialises tests that touch the process-wide working directory.
    pub(crate) fn lock_current_dir() -> MutexGuard<'static, ()> {
        static MUTEX: OnceLock<Mutex<()>> = OnceLock::new();
        MUTEX
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn setup() -> CommandExecutor {
        CommandExecutor::with_highlighter(Highlighter::new(false))
    }

    fn argv(args: &[&str]) -> Vec<OsString> {
        args.iter().map(|s| OsString::from(*s)).collect()
    }

    fn dispatch(executor: &CommandExecutor, args: &[&str]) -> (Control, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let control = executor.dispatch_to(&argv(args), &mut out, &mut err);
        (
            control,
            String::from_utf8(out).expect("utf8"),
            String::from_utf8(err).expect("utf8"),
        )
    }

    #[test]
    fn test_empty_command_is_noop() {
        let executor = setup();
        assert_eq!(
            dispatch(&executor, &[]),
            (Control::Continue, String::new(), String::new())
        );
    }

    #[test]
    fn test_execute_exit() {
        let executor = setup();
        assert_eq!(dispatch(&executor, &["exit"]).0, Control::Stop);
        assert_eq!(dispatch(&executor, &["exit", "now"]).0, Control::Stop);
    }

    #[test]
    fn test_execute_help() {
        let executor = setup();
        let (control, out, err) = dispatch(&executor, &["help"]);
        assert_eq!(control, Control::Continue);
        assert_eq!(out, "cd\nhelp\nexit\n");
        assert_eq!(err, "");
    }

    #[test]
    fn test_execute_cd_without_argument() {
        let _lock = lock_current_dir();
        let executor = setup();
        let before = env::current_dir().expect("cwd");

        let (control, out, err) = dispatch(&executor, &["cd"]);

        assert_eq!(control, Control::Continue);
        assert_eq!(out, "");
        assert_eq!(err, "minish: cd: expected a directory argument\n");
        assert_eq!(env::current_dir().expect("cwd"), before);
    }

    #[test]
    fn test_execute_cd_nonexistent() {
        let _lock = lock_current_dir();
        let executor = setup();
        let before = env::current_dir().expect("cwd");

        let (control, _, err) = dispatch(&executor, &["cd", "/nonexistent-xyz"]);

        assert_eq!(control, Control::Continue);
        assert!(err.starts_with("minish: cd: failed to change directory to /nonexistent-xyz: "));
        assert_eq!(env::current_dir().expect("cwd"), before);
    }

    #[test]
    fn test_external_command_continues() {
        let executor = setup();
        let (control, out, err) = dispatch(&executor, &["true"]);
        assert_eq!(control, Control::Continue);
        assert_eq!(out, "");
        assert_eq!(err, "");

        assert_eq!(dispatch(&executor, &["false"]).0, Control::Continue);
        assert_eq!(
            dispatch(&executor, &["minish-test-no-such-program-xyz"]).0,
            Control::Continue
        );
    }

    #[test]
    fn test_lookup_is_exact() {
        assert!(matches!(lookup("cd"), Some(Builtin::Cd(_))));
        assert!(matches!(lookup("help"), Some(Builtin::Help(_))));
        assert!(matches!(lookup("exit"), Some(Builtin::Exit(_))));
        assert!(lookup("CD").is_none());
        assert!(lookup("exit ").is_none());
        assert!(lookup("").is_none());
        assert!(lookup(OsStr::from_bytes(b"cd\xe9")).is_none());
    }

    #[test]
    fn test_builtin_command_detection() {
        let executor = setup();

        assert!(executor.is_builtin("cd"));
        assert!(executor.is_builtin("help"));
        assert!(executor.is_builtin("exit"));
        assert!(!executor.is_builtin("ls"));
        assert!(!executor.is_builtin("Exit"));
    }

    #[test]
    fn test_builtin_names_order() {
        assert_eq!(builtin_names().collect::<Vec<_>>(), vec!["cd", "help", "exit"]);
    }

    #[test]
    fn test_command_error_display() {
        let errors = vec![
            CommandError::MissingArgument("cd", "a directory"),
            CommandError::ChangeDirectory(
                OsString::from("/x"),
                io::Error::new(io::ErrorKind::NotFound, "missing"),
            ),
            CommandError::IoError(io::Error::new(io::ErrorKind::Other, "io error")),
        ];

        for error in errors {
            assert!(!error.to_string().is_empty());
        }
    }
}
