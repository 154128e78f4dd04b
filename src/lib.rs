//! Transparent interceptor for Nix command invocations.
//!
//! Installed under the names of the Nix entry points (`nix`, `nix-build`,
//! `nix-shell`), this crate inspects the argument vector, classifies the
//! semantic verb, and picks an execution strategy: exec-replace itself with
//! the `nom` formatter front end, build through `nom` before running, pipe
//! the tool's structured diagnostics into `nom`, or pass the invocation
//! through untouched.
//!
//! Failure codes are transparent: whatever status the decisive child exits
//! with is the status of this process.

pub mod args;
pub mod config;
pub mod dispatch;
#[cfg(feature = "notify")]
pub mod notify;
pub mod process;
