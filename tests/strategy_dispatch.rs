//! Integration tests for verb classification, strategy selection, and
//! per-strategy argument assembly.

use nix_monitored::args::{
    build_phase_args, direct_replace_args, formatter_args, shell_join, structured_log_args,
    Invocation,
};
use nix_monitored::dispatch::ExecutionStrategy;

fn invocation(args: Vec<&str>) -> Invocation {
    Invocation::new(args.into_iter().map(String::from).collect())
}

// =============================================================================
// STRATEGY SELECTION
// =============================================================================

#[test]
fn build_launcher_aliases_select_direct_replace() {
    for alias in ["nix-build", "nix-shell"] {
        let inv = invocation(vec![alias, "-A", "hello"]);
        assert_eq!(ExecutionStrategy::select(&inv), ExecutionStrategy::DirectReplace);
    }
}

#[test]
fn trivial_verbs_select_direct_replace() {
    for verb in ["build", "shell", "develop", "--version"] {
        let inv = invocation(vec!["nix", verb]);
        assert_eq!(ExecutionStrategy::select(&inv), ExecutionStrategy::DirectReplace);
    }
}

#[test]
fn run_selects_build_then_run() {
    let inv = invocation(vec!["nix", "run", "nixpkgs#hello"]);
    assert_eq!(ExecutionStrategy::select(&inv), ExecutionStrategy::BuildThenRun);
}

#[test]
fn print_dev_env_selects_piped_reformat() {
    let inv = invocation(vec!["nix", "print-dev-env"]);
    assert_eq!(ExecutionStrategy::select(&inv), ExecutionStrategy::PipedReformat);
}

#[test]
fn unknown_verbs_fall_through_to_passthrough() {
    for argv in [
        vec!["nix", "repl"],
        vec!["nix", "flake", "show"],
        vec!["nix", "--help"],
        vec!["nix"],
    ] {
        let inv = invocation(argv);
        assert_eq!(ExecutionStrategy::select(&inv), ExecutionStrategy::Passthrough);
    }
}

#[test]
fn launcher_alias_wins_over_run_verb() {
    // Priority order: an alias match is checked before the verb.
    let inv = invocation(vec!["nix-shell", "run"]);
    assert_eq!(ExecutionStrategy::select(&inv), ExecutionStrategy::DirectReplace);
}

#[test]
fn flags_before_the_verb_do_not_confuse_selection() {
    let inv = invocation(vec![
        "nix",
        "--extra-experimental-features",
        "flakes",
        "build",
        "foo",
    ]);
    assert_eq!(inv.verb(), Some("build"));
    assert_eq!(ExecutionStrategy::select(&inv), ExecutionStrategy::DirectReplace);
}

// =============================================================================
// DIRECT REPLACE ASSEMBLY
// =============================================================================

#[test]
fn direct_replace_substitutes_the_formatter_alias() {
    let inv = invocation(vec!["nix-build", "-A", "hello", "default.nix"]);
    let args = direct_replace_args(&inv);
    assert_eq!(args[0], "nom-build");

    let inv = invocation(vec!["nix", "build", "nixpkgs#hello"]);
    assert_eq!(direct_replace_args(&inv)[0], "nom");
}

#[test]
fn direct_replace_keeps_the_argument_count() {
    for argv in [
        vec!["nix", "build", "nixpkgs#hello"],
        vec!["nix", "--quiet", "develop", "--impure"],
        vec!["nix-build", "-A", "hello"],
        vec!["nix-shell"],
        vec!["nix", "--version"],
    ] {
        let inv = invocation(argv);
        let before = inv.args().len();
        assert_eq!(direct_replace_args(&inv).len(), before);
    }
}

#[test]
fn direct_replace_fronts_the_verb() {
    let inv = invocation(vec!["nix", "--quiet", "develop", "--impure"]);
    assert_eq!(
        direct_replace_args(&inv),
        vec!["nom", "develop", "--quiet", "--impure"]
    );
}

#[test]
fn direct_replace_without_a_verb_keeps_all_arguments() {
    // All flags, no bare verb: nothing to front, nothing to lose.
    let inv = invocation(vec!["nix-build", "-A", "-j4"]);
    assert_eq!(direct_replace_args(&inv), vec!["nom-build", "-A", "-j4"]);
}

#[test]
fn direct_replace_moves_only_the_classified_occurrence() {
    // The installable happens to spell the verb; it must stay in place.
    let inv = invocation(vec!["nix", "build", "build"]);
    assert_eq!(direct_replace_args(&inv), vec!["nom", "build", "build"]);
}

// =============================================================================
// BUILD-THEN-RUN ASSEMBLY
// =============================================================================

#[test]
fn build_phase_synthesizes_a_no_link_build() {
    let inv = invocation(vec!["nix", "run", "nixpkgs#hello", "--impure"]);
    assert_eq!(
        build_phase_args(&inv),
        vec!["nom", "build", "--no-link", "nixpkgs#hello", "--impure"]
    );
}

#[test]
fn build_phase_stops_at_the_double_dash() {
    let inv = invocation(vec!["nix", "run", "nixpkgs#hello", "--", "--arg-for-hello"]);
    assert_eq!(
        build_phase_args(&inv),
        vec!["nom", "build", "--no-link", "nixpkgs#hello"]
    );
}

#[test]
fn build_phase_stops_at_command_token() {
    let inv = invocation(vec!["nix", "run", ".#app", "--command", "ls", "-l"]);
    assert_eq!(
        build_phase_args(&inv),
        vec!["nom", "build", "--no-link", ".#app"]
    );
}

// =============================================================================
// PIPED REFORMAT ASSEMBLY
// =============================================================================

#[test]
fn piped_reformat_injects_the_structured_log_flag() {
    let inv = invocation(vec!["nix", "print-dev-env", "--impure"]);
    assert_eq!(
        structured_log_args(&inv),
        vec![
            "nix",
            "--log-format",
            "internal-json",
            "print-dev-env",
            "--impure"
        ]
    );
}

#[test]
fn formatter_reads_the_structured_stream() {
    assert_eq!(formatter_args(), vec!["nom", "--json"]);
}

// =============================================================================
// NOTIFICATION BODY RENDERING
// =============================================================================

#[test]
fn shell_join_round_trips_plain_arguments() {
    let inv = invocation(vec!["nix", "build", "nixpkgs#hello"]);
    assert_eq!(shell_join(inv.args()), "nix build nixpkgs#hello");
}

#[test]
fn shell_join_quotes_arguments_with_whitespace() {
    let inv = invocation(vec!["nix-shell", "-p", "hello world"]);
    assert_eq!(shell_join(inv.args()), "nix-shell -p 'hello world'");
}
