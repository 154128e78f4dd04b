//! Argument handling for intercepted invocations.
//!
//! Raw argv → [`Invocation`] → verb classification → per-strategy argument
//! assembly. Each stage is a pure function that can be unit-tested
//! independently; strategies always build fresh owned vectors and never
//! mutate the incoming invocation.

mod assembler;
mod classifier;

pub use assembler::{
    build_phase_args, direct_replace_args, formatter_args, shell_join, structured_log_args,
};

/// An intercepted command line: argument 0 (the name the program was invoked
/// under, reduced to its basename) plus everything after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    args: Vec<String>,
}

impl Invocation {
    /// Build from a raw argument vector.
    ///
    /// Argument 0 is reduced to its basename: resolution must go through the
    /// search path, not through whatever path the caller spelled out.
    pub fn new(mut args: Vec<String>) -> Self {
        if let Some(head) = args.first_mut() {
            if let Some(idx) = head.rfind('/') {
                *head = head[idx + 1..].to_string();
            }
        }
        Self { args }
    }

    /// Capture the current process' own argument vector.
    pub fn from_env() -> Self {
        Self::new(std::env::args().collect())
    }

    /// The name this program was invoked under.
    pub fn command(&self) -> &str {
        self.args.first().map(String::as_str).unwrap_or("")
    }

    /// The full argument vector, argument 0 included.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The classified verb, borrowed from the argument data.
    pub fn verb(&self) -> Option<&str> {
        classifier::classify_verb(self.tail())
    }

    /// Index of the classified verb within the full argument vector.
    pub fn verb_position(&self) -> Option<usize> {
        classifier::verb_position(self.tail()).map(|idx| idx + 1)
    }

    fn tail(&self) -> &[String] {
        self.args.get(1..).unwrap_or(&[])
    }
}
