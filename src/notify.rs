//! Elapsed-time-gated desktop notification around the dispatcher.
//!
//! The wrapper forks: the child returns to the caller and continues into the
//! dispatcher as if this module did not exist, while the parent times the
//! wait and notifies when the command ran long enough that the user has
//! probably looked away. The child's exit status is propagated untouched
//! whether or not a notification went out.

use std::time::{Duration, Instant};

use crate::args::{shell_join, Invocation};
use crate::config::{Config, NOTIFY_ICON};
use crate::process::{self, ChildRole, ExitOutcome, ProcessError};

/// External notification agent, resolved through the search path.
const NOTIFY_AGENT: &str = "notify-send";

/// Fork a timed wrapper around the rest of the program.
///
/// Returns `Ok(())` in the child so the caller continues into the
/// dispatcher. The parent waits for the child without treating failure as
/// fatal, sends a notification when warranted, and exits with the child's
/// propagated status.
pub fn wrap(config: &Config, invocation: &Invocation) -> Result<(), ProcessError> {
    let Some(timeout) = config.notify_timeout else {
        return Ok(());
    };
    let Some(child) = process::fork_split(ChildRole::Orchestrator)? else {
        return Ok(());
    };

    tracing::debug!("notification timer started");
    let start = Instant::now();
    let outcome = child.wait()?;
    let elapsed = start.elapsed();
    tracing::debug!(
        elapsed_ms = elapsed.as_millis() as u64,
        code = outcome.propagated_code(),
        "notification timer stopped"
    );

    if should_notify(elapsed, timeout) {
        if let Err(err) = send(invocation, outcome) {
            // A lost notification must not disturb the exit status.
            tracing::warn!("notification failed: {err}");
        }
    }
    std::process::exit(outcome.propagated_code());
}

/// Only slow commands notify; fast ones finished while the user was still
/// looking.
fn should_notify(elapsed: Duration, timeout: Duration) -> bool {
    elapsed > timeout
}

/// Urgency hint for the notification agent.
fn urgency(success: bool) -> &'static str {
    if success {
        "low"
    } else {
        "critical"
    }
}

/// Fire-and-forget invocation of the notification agent. The agent's own
/// failure is reported to the caller, never adopted as an exit status.
fn send(invocation: &Invocation, outcome: ExitOutcome) -> Result<(), ProcessError> {
    let success = outcome.success();
    let title = format!(
        "Nix command {}",
        if success { "succeeded" } else { "failed" }
    );
    let body = format!(
        "<span font='monospace'>{}</span>",
        shell_join(invocation.args())
    );
    let agent_args = vec![
        NOTIFY_AGENT.to_string(),
        "--app-name".to_string(),
        "Nix".to_string(),
        "--icon".to_string(),
        NOTIFY_ICON.to_string(),
        "--urgency".to_string(),
        urgency(success).to_string(),
        title,
        body,
    ];

    let agent = process::fork_with(ChildRole::Notifier, || process::exec_replace(&agent_args))?;
    let agent_outcome = agent.wait()?;
    if !agent_outcome.success() {
        tracing::warn!(
            code = agent_outcome.propagated_code(),
            "notification agent reported failure"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fast_commands_do_not_notify() {
        assert!(!should_notify(
            Duration::from_millis(100),
            Duration::from_secs(2)
        ));
        assert!(!should_notify(Duration::from_secs(2), Duration::from_secs(2)));
    }

    #[test]
    fn slow_commands_notify() {
        assert!(should_notify(
            Duration::from_millis(2001),
            Duration::from_secs(2)
        ));
        // Zero threshold: everything measurable counts as slow.
        assert!(should_notify(Duration::from_millis(1), Duration::ZERO));
    }

    #[test]
    fn urgency_tracks_success() {
        assert_eq!(urgency(true), "low");
        assert_eq!(urgency(false), "critical");
    }
}
