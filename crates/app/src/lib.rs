//! Echoline - HTTP contract tests against an httpbin-compatible echo service.
//!
//! The `run-suite` binary is a thin wrapper around [`run`]: it parses the
//! [`Cli`], wires the reqwest client and Ctrl-C handling, prints the report,
//! then stores it with [`save_report`] and maps the outcome to an exit code
//! with [`exit_code`].

pub mod cli;

use std::sync::Arc;

use echoline_application::{
    ApplicationError, ApplicationResult, CancellationToken, ConfigError, HttpClient, RunSuite,
};
use echoline_domain::{SuiteReport, TestSuite};
use echoline_infrastructure::{SuiteLoader, SystemClock, render_json, render_text, write_report};
use tracing::info;

pub use cli::{Cli, OutputFormat};

/// Exit code when every case passed.
pub const EXIT_SUCCESS: u8 = 0;

/// Exit code when a case failed, errored or was skipped.
pub const EXIT_FAILURE: u8 = 1;

/// Exit code for configuration and load errors.
pub const EXIT_CONFIG_ERROR: u8 = 2;

/// Loads the suite named by the CLI and applies the name filter.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the suite cannot be loaded or the filter
/// matches nothing.
pub async fn load_suite(cli: &Cli) -> Result<TestSuite, ConfigError> {
    let suite = match &cli.suite {
        Some(path) => SuiteLoader::from_path(path).await?,
        None => SuiteLoader::builtin()?,
    };

    match &cli.filter {
        Some(needle) => {
            let filtered = suite.filter(needle);
            if filtered.is_empty() {
                return Err(ConfigError::NoMatchingCases(needle.clone()));
            }
            Ok(filtered)
        }
        None => Ok(suite),
    }
}

/// Runs the suite described by `cli` through `client`.
///
/// # Errors
///
/// Returns [`ApplicationError`] for configuration problems. Failing cases are
/// not errors; they are in the report.
pub async fn run<C: HttpClient + 'static>(
    cli: &Cli,
    client: Arc<C>,
    cancel: &CancellationToken,
) -> ApplicationResult<SuiteReport> {
    let settings = cli.settings()?;
    let suite = load_suite(cli).await?;

    let runner = RunSuite::new(client, Arc::new(SystemClock::new()), settings);
    Ok(runner.run_all(&suite, cancel).await)
}

/// Writes the JSON report to `--report`, if set.
///
/// Kept apart from [`run`] so a write failure never discards a finished report.
///
/// # Errors
///
/// Returns [`ApplicationError`] when the file cannot be written.
pub async fn save_report(cli: &Cli, report: &SuiteReport) -> ApplicationResult<()> {
    if let Some(path) = &cli.report {
        write_report(path, report).await?;
        info!(path = %path.display(), "report saved");
    }
    Ok(())
}

/// Renders the report in the requested format.
///
/// # Errors
///
/// Returns [`ApplicationError::Serialization`] if JSON rendering fails.
pub fn render(report: &SuiteReport, format: OutputFormat) -> ApplicationResult<String> {
    match format {
        OutputFormat::Text => Ok(render_text(report)),
        OutputFormat::Json => {
            render_json(report).map_err(|e| ApplicationError::Serialization(e.to_string()))
        }
    }
}

/// Maps a run result to the process exit code.
#[must_use]
pub const fn exit_code(result: &ApplicationResult<SuiteReport>) -> u8 {
    match result {
        Ok(report) => report.exit_code(),
        Err(_) => EXIT_CONFIG_ERROR,
    }
}
