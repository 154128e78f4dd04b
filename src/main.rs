//! Entry point: configuration snapshot, search-path setup, gating, dispatch.

use std::process::exit;

use nix_monitored::args::{shell_join, Invocation};
use nix_monitored::config::{self, Config, MonitorMode};
use nix_monitored::dispatch::{self, ExecutionStrategy};
use nix_monitored::process::{self, ProcessError};

fn main() {
    let config = Config::from_env();
    config::init_tracing(config.debug);

    // Child invocations of the tool's own name must resolve to the real
    // tool, not back into this interceptor.
    let path = config::search_path(&std::env::var("PATH").unwrap_or_default());
    tracing::debug!(%path, "search path");
    std::env::set_var("PATH", &path);

    let invocation = Invocation::from_env();
    tracing::debug!(argv = %shell_join(invocation.args()), "invocation");

    // Defer to the tool untouched when monitoring is switched off or there
    // is nothing to classify.
    if (config.monitor == MonitorMode::Disable || invocation.args().len() < 2)
        && config.monitor != MonitorMode::Force
    {
        fail(process::exec_replace(invocation.args()));
    }

    // In an interactive session the user watches the output live; only
    // detached invocations get the notification timer.
    #[cfg(feature = "notify")]
    if config.notify && !std::io::IsTerminal::is_terminal(&std::io::stderr()) {
        if let Err(err) = nix_monitored::notify::wrap(&config, &invocation) {
            fail(err);
        }
    }

    let strategy = ExecutionStrategy::select(&invocation);
    match dispatch::run(strategy, &invocation) {
        Ok(outcome) => exit(outcome.propagated_code()),
        Err(err) => fail(err),
    }
}

/// Terminal path for infrastructure failures: log, exit with the fixed
/// failure status.
fn fail(err: ProcessError) -> ! {
    tracing::error!("{err}");
    exit(1);
}
