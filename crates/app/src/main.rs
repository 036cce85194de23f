//! `run-suite` binary.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use echoline::{Cli, EXIT_CONFIG_ERROR, exit_code, render, run, save_report};
use echoline_application::CancellationToken;
use echoline_infrastructure::ReqwestHttpClient;
use tracing::warn;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let client = match ReqwestHttpClient::new() {
        Ok(client) => Arc::new(client),
        Err(error) => {
            eprintln!("error: cannot create HTTP client: {error}");
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, skipping remaining cases");
            on_interrupt.cancel();
        }
    });

    let result = run(&cli, client, &cancel).await;
    let report = match &result {
        Ok(report) => report,
        Err(error) => {
            eprintln!("error: {error}");
            return ExitCode::from(exit_code(&result));
        }
    };

    match render(report, cli.format) {
        Ok(output) => print!("{output}"),
        Err(error) => {
            eprintln!("error: {error}");
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    }

    if let Err(error) = save_report(&cli, report).await {
        eprintln!("error: {error}");
        return ExitCode::from(EXIT_CONFIG_ERROR);
    }
    ExitCode::from(exit_code(&result))
}
