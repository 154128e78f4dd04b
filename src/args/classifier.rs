//! Verb classification — find the semantic subcommand in a raw argument
//! list, skipping option flags and their values.

/// Flags that consume the following argument as their value. Skipping the
/// value keeps it from being misread as the verb.
const VALUE_FLAGS: &[&str] = &["--experimental-features", "--extra-experimental-features"];

/// Flag-shaped, but classified as a verb in its own right so version
/// requests can be routed to the formatter front end.
const VERSION_FLAG: &str = "--version";

/// Position of the verb within `args` (the arguments after argument 0).
///
/// The scan walks left to right: known value-taking flags are skipped
/// together with their value, `--version` is returned immediately, any other
/// option is skipped, and the first bare argument wins. No flag validation
/// happens here; the scan only skips enough to avoid misidentifying the
/// verb.
pub(crate) fn verb_position(args: &[String]) -> Option<usize> {
    let mut idx = 0;
    while idx < args.len() {
        let arg = args[idx].as_str();
        if VALUE_FLAGS.contains(&arg) {
            idx += 2;
            continue;
        }
        if arg == VERSION_FLAG {
            return Some(idx);
        }
        if arg.starts_with('-') {
            idx += 1;
            continue;
        }
        return Some(idx);
    }
    None
}

/// The classified verb, borrowed from the argument data; `None` when the
/// arguments contain nothing but options.
pub fn classify_verb(args: &[String]) -> Option<&str> {
    verb_position(args).map(|idx| args[idx].as_str())
}
