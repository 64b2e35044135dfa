use std::ffi::{CString, OsString};
use std::io::{self, Write};
use std::os::unix::ffi::OsStrExt;
use std::ptr;

use log::{debug, warn};
use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::{fork, ForkResult, Pid};

use super::ProcessError;
use crate::core::Control;
use crate::highlight::Highlighter;

/// Exit status reported by `execvp` failures in the child.
const EXEC_FAILURE: libc::c_int = 127;

/// How a child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitState {
    Exited(i32),
    Signaled(i32),
}

/// A forked child that has not been reaped yet.
///
/// Consumed by [`Child::wait`], so a handle can only be waited on once.
#[derive(Debug)]
pub struct Child {
    pid: Pid,
}

impl Child {
    pub fn id(&self) -> Pid {
        self.pid
    }

    /// Blocks until the child exits or is killed by a signal.
    ///
    /// Stopped children are not finished: the wait continues until the child
    /// is resumed and terminates.
    pub fn wait(self) -> Result<ExitState, ProcessError> {
        loop {
            match waitpid(self.pid, Some(WaitPidFlag::WUNTRACED)) {
                Ok(WaitStatus::Exited(_, code)) => return Ok(ExitState::Exited(code)),
                Ok(WaitStatus::Signaled(_, signal, _)) => {
                    return Ok(ExitState::Signaled(signal as i32))
                }
                Ok(status) => debug!("process {} not finished: {:?}", self.pid, status),
                Err(Errno::EINTR) => continue,
                Err(e) => return Err(ProcessError::Wait(e)),
            }
        }
    }
}

/// Argument vector in the shape `execvp` expects, built before forking so the
/// child never allocates.
struct ExecArgs {
    args: Vec<CString>,
    argv: Vec<*const libc::c_char>,
    failure_prefix: Vec<u8>,
}

impl ExecArgs {
    fn new(args: &[OsString]) -> Result<Self, ProcessError> {
        let program = args.first().ok_or(ProcessError::EmptyCommand)?;
        let args = args
            .iter()
            .map(|arg| {
                CString::new(arg.as_bytes())
                    .map_err(|_| ProcessError::NulByte(program.to_string_lossy().into_owned()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut argv: Vec<*const libc::c_char> = args.iter().map(|arg| arg.as_ptr()).collect();
        argv.push(ptr::null());

        let mut failure_prefix = b"minish: ".to_vec();
        failure_prefix.extend_from_slice(program.as_bytes());
        failure_prefix.extend_from_slice(b": ");

        Ok(Self {
            args,
            argv,
            failure_prefix,
        })
    }

    /// Replaces the current process image. Only ever called in a forked child,
    /// so everything after `fork` is async-signal-safe: `nix::unistd::execvp`
    /// is avoided because it allocates the pointer array, and the error text
    /// comes from the static table behind `Errno::desc`.
    fn exec(&self) -> ! {
        unsafe {
            libc::execvp(self.args[0].as_ptr(), self.argv.as_ptr());
        }

        let errno = Errno::last();
        write_all(&self.failure_prefix);
        write_all(errno.desc().as_bytes());
        write_all(b"\n");

        unsafe { libc::_exit(EXEC_FAILURE) }
    }
}

fn write_all(mut buf: &[u8]) {
    while !buf.is_empty() {
        match nix::unistd::write(io::stderr(), buf) {
            Ok(0) => return,
            Ok(n) => buf = &buf[n..],
            Err(Errno::EINTR) => continue,
            Err(_) => return,
        }
    }
}

/// Flushes the shell's buffered output so it is not written by both processes.
fn flush_before_fork() {
    flush_stream(&mut io::stdout(), "standard output");
    flush_stream(&mut io::stderr(), "standard error");
}

fn flush_stream(stream: &mut dyn Write, name: &str) -> bool {
    match stream.flush() {
        Ok(()) => true,
        Err(e) => {
            warn!("failed to flush {} before starting a process: {}", name, e);
            false
        }
    }
}

/// Forks a child running `args[0]` (resolved through `PATH`) with `args`.
///
/// If the program cannot be executed the child reports it on standard error
/// and exits with status 127.
pub fn spawn(args: &[OsString]) -> Result<Child, ProcessError> {
    let exec_args = ExecArgs::new(args)?;

    flush_before_fork();

    match unsafe { fork() } {
        Err(e) => Err(ProcessError::Fork(e)),
        Ok(ForkResult::Child) => exec_args.exec(),
        Ok(ForkResult::Parent { child }) => {
            debug!("spawned {} as process {}", args[0].to_string_lossy(), child);
            Ok(Child { pid: child })
        }
    }
}

/// Runs a program to completion.
pub fn run(args: &[OsString]) -> Result<ExitState, ProcessError> {
    spawn(args)?.wait()
}

/// Runs external programs on behalf of the dispatcher.
#[derive(Debug, Clone, Copy)]
pub struct ProcessLauncher {
    highlighter: Highlighter,
}

impl ProcessLauncher {
    pub fn new(highlighter: Highlighter) -> Self {
        Self { highlighter }
    }

    /// Runs `args` and blocks until it finishes.
    ///
    /// External programs never stop the shell, so this always continues;
    /// failures to create or wait for the child are reported to `err`.
    pub fn launch(&self, args: &[OsString], err: &mut dyn Write) -> Control {
        match run(args) {
            Ok(state) => debug!("{} finished: {:?}", args[0].to_string_lossy(), state),
            Err(e) => self.highlighter.report(err, &e.to_string()),
        }
        Control::Continue
    }
}
