//! Per-strategy argument assembly.
//!
//! Every strategy gets a freshly built owned vector; the incoming invocation
//! is never mutated.

use crate::args::Invocation;

/// Name of the output-formatting front end.
pub const FORMATTER: &str = "nom";

/// Tokens after which `nix run` arguments belong to the launched program,
/// not to the build.
const RUN_ARG_TERMINATORS: &[&str] = &["--", "--command"];

/// Map the invoked command name onto the formatter's equivalent entry point.
fn formatter_alias(command: &str) -> &'static str {
    match command {
        "nix-build" => "nom-build",
        "nix-shell" => "nom-shell",
        _ => FORMATTER,
    }
}

/// Arguments for the DirectReplace strategy: the formatter alias in position
/// 0 and the verb, when there is one, moved up to position 1 so the
/// formatter always sees `nom <verb> <args>`. Without a verb the argument
/// order is left untouched. The argument count always matches the input.
pub fn direct_replace_args(invocation: &Invocation) -> Vec<String> {
    let mut out = Vec::with_capacity(invocation.args().len().max(1));
    out.push(formatter_alias(invocation.command()).to_string());
    match invocation.verb_position() {
        Some(pos) => {
            out.push(invocation.args()[pos].clone());
            out.extend(
                invocation
                    .args()
                    .iter()
                    .enumerate()
                    .skip(1)
                    .filter(|(idx, _)| *idx != pos)
                    .map(|(_, arg)| arg.clone()),
            );
        }
        None => out.extend(invocation.args().iter().skip(1).cloned()),
    }
    out
}

/// Build-phase arguments for the BuildThenRun strategy: `nom build --no-link`
/// plus everything after the verb, stopping before the arguments meant for
/// the launched program.
pub fn build_phase_args(invocation: &Invocation) -> Vec<String> {
    let mut out = vec![
        FORMATTER.to_string(),
        "build".to_string(),
        "--no-link".to_string(),
    ];
    for arg in invocation.args().iter().skip(2) {
        if RUN_ARG_TERMINATORS.contains(&arg.as_str()) {
            break;
        }
        out.push(arg.clone());
    }
    out
}

/// The original invocation with the structured-log flag injected right after
/// the command name, so diagnostics come out machine-readable.
pub fn structured_log_args(invocation: &Invocation) -> Vec<String> {
    let mut out = Vec::with_capacity(invocation.args().len() + 2);
    out.push(invocation.command().to_string());
    out.push("--log-format".to_string());
    out.push("internal-json".to_string());
    out.extend(invocation.args().iter().skip(1).cloned());
    out
}

/// Formatter invocation consuming a structured stream on stdin.
pub fn formatter_args() -> Vec<String> {
    vec![FORMATTER.to_string(), "--json".to_string()]
}

/// Render an argument vector the way a shell would accept it back;
/// arguments containing whitespace are single-quoted.
pub fn shell_join(args: &[String]) -> String {
    let mut out = String::new();
    for (idx, arg) in args.iter().enumerate() {
        if idx > 0 {
            out.push(' ');
        }
        if arg.contains(char::is_whitespace) {
            out.push('\'');
            out.push_str(arg);
            out.push('\'');
        } else {
            out.push_str(arg);
        }
    }
    out
}
