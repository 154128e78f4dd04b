//! Strategy selection and orchestration.
//!
//! One strategy is selected per invocation and driven to its terminal
//! action: either an exec-replace (never returns) or an [`ExitOutcome`] the
//! caller adopts as the process exit status.

use crate::args::{self, Invocation};
use crate::process::{self, ChildRole, ExitOutcome, ProcessError};

/// Command names that are launchers for plain builds.
const BUILD_ALIASES: &[&str] = &["nix-build", "nix-shell"];

/// Verbs the formatter front end handles directly.
const TRIVIAL_VERBS: &[&str] = &["build", "shell", "develop", "--version"];

/// The four mutually exclusive ways an invocation can be executed. Selection
/// happens once; the variants are matched exhaustively, so a fifth case
/// cannot appear without the compiler noticing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// Hand the whole invocation to the formatter front end.
    DirectReplace,
    /// Build through the formatter first, then run the original command.
    BuildThenRun,
    /// Stream the tool's structured diagnostics through the formatter.
    PipedReformat,
    /// Execute the invocation untouched.
    Passthrough,
}

impl ExecutionStrategy {
    /// Pick the strategy for an invocation. Checks run in a fixed priority
    /// order; the first match wins and later conditions are not examined.
    pub fn select(invocation: &Invocation) -> Self {
        let verb = invocation.verb();
        if BUILD_ALIASES.contains(&invocation.command())
            || verb.is_some_and(|verb| TRIVIAL_VERBS.contains(&verb))
        {
            return Self::DirectReplace;
        }
        match verb {
            Some("run") => Self::BuildThenRun,
            Some("print-dev-env") => Self::PipedReformat,
            _ => Self::Passthrough,
        }
    }
}

/// Drive the selected strategy.
///
/// Returns only when a child's status should become this process' own exit
/// status. Exec-replacing paths never return on success, and infrastructure
/// failures come back as errors.
pub fn run(
    strategy: ExecutionStrategy,
    invocation: &Invocation,
) -> Result<ExitOutcome, ProcessError> {
    tracing::debug!(
        ?strategy,
        command = invocation.command(),
        verb = invocation.verb(),
        "dispatching"
    );
    match strategy {
        ExecutionStrategy::DirectReplace => {
            Err(process::exec_replace(&args::direct_replace_args(invocation)))
        }
        ExecutionStrategy::BuildThenRun => build_then_run(invocation),
        ExecutionStrategy::PipedReformat => piped_reformat(invocation),
        ExecutionStrategy::Passthrough => Err(process::exec_replace(invocation.args())),
    }
}

/// `nix run` conflates building and running. Build through the formatter
/// first so it can summarize the build phase, then exec the untouched
/// invocation, which finds everything already built.
fn build_then_run(invocation: &Invocation) -> Result<ExitOutcome, ProcessError> {
    let build_args = args::build_phase_args(invocation);
    let build = process::fork_with(ChildRole::Formatter, || {
        process::exec_replace(&build_args)
    })?;

    let outcome = build.wait()?;
    if !outcome.success() {
        // Do not run what was not built.
        return Ok(outcome);
    }
    Err(process::exec_replace(invocation.args()))
}

/// The tool's diagnostics go to its stderr; the formatter reads stdin. Both
/// run concurrently, connected only by the pipe's buffering and EOF
/// semantics, so every descriptor a process does not need must be closed
/// right after forking or the formatter never sees end-of-stream.
fn piped_reformat(invocation: &Invocation) -> Result<ExitOutcome, ProcessError> {
    let (read_end, write_end) = process::make_pipe()?;
    let tool_args = args::structured_log_args(invocation);
    let formatter_args = args::formatter_args();

    let tool = process::fork_with(ChildRole::Tool, || {
        process::close_unused(&read_end);
        if let Err(err) = process::redirect_stderr(&write_end) {
            return err;
        }
        process::close_unused(&write_end);
        process::exec_replace(&tool_args)
    })?;

    let formatter = process::fork_with(ChildRole::Formatter, || {
        process::close_unused(&write_end);
        if let Err(err) = process::redirect_stdin(&read_end) {
            return err;
        }
        process::close_unused(&read_end);
        process::exec_replace(&formatter_args)
    })?;

    // Both ends must close here, or the formatter waits forever for a write
    // end this process still holds.
    drop(read_end);
    drop(write_end);

    let tool_outcome = tool.wait()?;
    if !tool_outcome.success() {
        return Ok(tool_outcome);
    }
    formatter.wait()
}
