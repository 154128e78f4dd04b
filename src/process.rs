//! Process primitives: fork, exec-replace, pipes, and child reaping.
//!
//! The interceptor is single-threaded, so forking is safe and the child
//! branch is free to allocate on its way to exec. Pipe ends are [`OwnedFd`]
//! and close on drop; a forked child closes the ends it does not need by raw
//! descriptor so the parent's owned handles stay intact.

use std::ffi::CString;
use std::os::fd::{AsRawFd, OwnedFd};

use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{self, ForkResult, Pid};
use thiserror::Error;

/// Failures at the OS boundary. All of them are invocation-time
/// infrastructure problems with no useful recovery; the binary logs them and
/// exits with a fixed failure status.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("fork failed: {0}")]
    Fork(#[source] Errno),
    #[error("pipe failed: {0}")]
    Pipe(#[source] Errno),
    #[error("exec of '{program}' failed: {errno}")]
    Exec { program: String, errno: Errno },
    #[error("wait for pid {pid} failed: {errno}")]
    Wait {
        pid: i32,
        #[source]
        errno: Errno,
    },
    #[error("stream redirect failed: {0}")]
    Redirect(#[source] Errno),
    #[error("argument contains a NUL byte")]
    NulArgument,
}

/// Terminal state of a reaped child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitOutcome {
    code: i32,
}

impl ExitOutcome {
    /// An outcome with a known exit code.
    pub fn from_code(code: i32) -> Self {
        Self { code }
    }

    /// Reconstruct an outcome from a wait status: the child's own code when
    /// it exited, 128 plus the signal number when it was killed. Non-terminal
    /// statuses have no outcome.
    fn from_wait_status(status: WaitStatus) -> Option<Self> {
        match status {
            WaitStatus::Exited(_, code) => Some(Self { code }),
            WaitStatus::Signaled(_, signal, _) => Some(Self {
                code: 128 + signal as i32,
            }),
            _ => None,
        }
    }

    pub fn success(self) -> bool {
        self.code == 0
    }

    /// The status as the operating system hands it to a waiting parent: only
    /// the low 8 bits survive `exit`.
    pub fn propagated_code(self) -> i32 {
        self.code & 0xFF
    }
}

/// Role a forked child plays in a strategy, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildRole {
    /// The wrapped build tool.
    Tool,
    /// The output formatter.
    Formatter,
    /// The rest of this program, re-run under the notification timer.
    Orchestrator,
    /// The external notification agent.
    Notifier,
}

/// Handle on a forked child. Waiting consumes the handle; an unreaped child
/// outliving its handle is a bug in the calling strategy.
#[derive(Debug)]
pub struct ChildProcess {
    pid: Pid,
    role: ChildRole,
}

impl ChildProcess {
    /// Block until the child terminates and return its outcome, retrying the
    /// wait when a signal interrupts it.
    pub fn wait(self) -> Result<ExitOutcome, ProcessError> {
        loop {
            let status = match waitpid(self.pid, None) {
                Ok(status) => status,
                Err(Errno::EINTR) => continue,
                Err(errno) => {
                    return Err(ProcessError::Wait {
                        pid: self.pid.as_raw(),
                        errno,
                    })
                }
            };
            if let Some(outcome) = ExitOutcome::from_wait_status(status) {
                tracing::debug!(
                    role = ?self.role,
                    pid = self.pid.as_raw(),
                    code = outcome.propagated_code(),
                    "child exited"
                );
                return Ok(outcome);
            }
        }
    }
}

/// Fork and report which side of the fork we are on: `Some(handle)` in the
/// parent, `None` in the child. The child carries on with the caller's
/// control flow.
pub fn fork_split(role: ChildRole) -> Result<Option<ChildProcess>, ProcessError> {
    // SAFETY: the process is single-threaded; the child may allocate freely.
    match unsafe { unistd::fork() }.map_err(ProcessError::Fork)? {
        ForkResult::Child => Ok(None),
        ForkResult::Parent { child } => {
            tracing::debug!(?role, pid = child.as_raw(), "forked child");
            Ok(Some(ChildProcess { pid: child, role }))
        }
    }
}

/// Fork and run `child_body` in the child. The body's terminal action is an
/// exec-replace, so it only returns on failure; the child then logs the
/// error and exits with a failure status without unwinding into the parent's
/// logic. The parent gets the child's handle.
pub fn fork_with<F>(role: ChildRole, child_body: F) -> Result<ChildProcess, ProcessError>
where
    F: FnOnce() -> ProcessError,
{
    match fork_split(role)? {
        Some(child) => Ok(child),
        None => {
            let err = child_body();
            eprintln!("{}: {err}", env!("CARGO_PKG_NAME"));
            unsafe { libc::_exit(libc::EXIT_FAILURE) }
        }
    }
}

/// Replace the current process image with `args[0]`, resolved through the
/// search path. Only returns on failure.
pub fn exec_replace(args: &[String]) -> ProcessError {
    tracing::debug!(argv = ?args, "execvp");
    let c_args: Vec<CString> = match args
        .iter()
        .map(|arg| CString::new(arg.as_str()))
        .collect::<Result<_, _>>()
    {
        Ok(c_args) => c_args,
        Err(_) => return ProcessError::NulArgument,
    };
    let Some(program) = c_args.first() else {
        return ProcessError::Exec {
            program: String::new(),
            errno: Errno::ENOENT,
        };
    };
    let errno = match unistd::execvp(program, &c_args) {
        Err(errno) => errno,
        Ok(never) => match never {},
    };
    ProcessError::Exec {
        program: args[0].clone(),
        errno,
    }
}

/// Allocate an anonymous unidirectional pipe as `(read end, write end)`.
pub fn make_pipe() -> Result<(OwnedFd, OwnedFd), ProcessError> {
    unistd::pipe().map_err(ProcessError::Pipe)
}

/// Point the standard error stream at `fd`.
pub fn redirect_stderr(fd: &OwnedFd) -> Result<(), ProcessError> {
    unistd::dup2(fd.as_raw_fd(), libc::STDERR_FILENO).map_err(ProcessError::Redirect)?;
    Ok(())
}

/// Point the standard input stream at `fd`.
pub fn redirect_stdin(fd: &OwnedFd) -> Result<(), ProcessError> {
    unistd::dup2(fd.as_raw_fd(), libc::STDIN_FILENO).map_err(ProcessError::Redirect)?;
    Ok(())
}

/// Close a descriptor the current process has no use for. Meant for forked
/// children, which exec or `_exit` before the parent's owned handle for the
/// same descriptor could ever drop.
pub fn close_unused(fd: &OwnedFd) {
    let _ = unistd::close(fd.as_raw_fd());
}
