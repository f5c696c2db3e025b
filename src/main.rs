// Entrypoint for the `memo` binary.
// - Loads config, parses flags, builds the real collaborators and hands
//   them to `app::run`.
// - Every failure ends here as one line on stderr and an exit code.

use memos_cli::api::ApiClient;
use memos_cli::app;
use memos_cli::cli::Cli;
use memos_cli::clipboard::SystemClipboard;
use memos_cli::config::Config;
use memos_cli::error::{ConfigError, MemoError};
use memos_cli::input::ProcessStdin;
use memos_cli::ui::{self, Hints};
use std::process::ExitCode;
use tracing::warn;
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter, Registry};

fn main() -> ExitCode {
    let log_filter = init_logging();

    // Loaded before parsing so `--help` can list the advanced flags when
    // they are enabled; a config error is only reported after parsing.
    let config = Config::load();
    let advanced = config.as_ref().is_ok_and(|c| c.advanced_enabled);

    let cli = match Cli::try_parse_with(advanced) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if cli.verbose && std::env::var_os("RUST_LOG").is_none() {
        let verbose = EnvFilter::new("warn,memos_cli=debug,memo=debug");
        let _ = log_filter.modify(|filter| *filter = verbose);
    }

    match invoke(&cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ui::print_error(&e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn invoke(cli: &Cli, config: Result<Config, ConfigError>) -> Result<(), MemoError> {
    let config = config?;
    let api = ApiClient::from_config(&config)?;
    let clipboard = SystemClipboard::new();

    let outcome = app::run(cli, &config, &mut ProcessStdin, &api, &clipboard)?;
    if let Err(e) = ui::print_outcome(&outcome, Hints::from(cli)) {
        warn!("could not write output: {e}");
    }
    Ok(())
}

/// Logs go to stderr at `warn` unless `RUST_LOG` says otherwise; the
/// returned handle lets `--verbose` raise the level after parsing.
fn init_logging() -> reload::Handle<EnvFilter, Registry> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let (filter, handle) = reload::Layer::new(filter);
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_target(false),
        )
        .init();
    handle
}
