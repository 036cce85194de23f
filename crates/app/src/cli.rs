//! Command-line interface.
//!
//! Every flag can also be set through an environment variable:
//!
//! | Flag | Variable | Default |
//! |------|----------|---------|
//! | `--base-url` | `ECHOLINE_BASE_URL` | `https://httpbin.org` |
//! | `--timeout` | `ECHOLINE_TIMEOUT_MS` | 10000 |
//! | `--parallel` | `ECHOLINE_PARALLEL` | 1 |
//! | `--filter` | `ECHOLINE_FILTER` | none |
//! | `--suite` | `ECHOLINE_SUITE` | built-in httpbin suite |
//! | `--retries` | `ECHOLINE_RETRIES` | 0 |
//! | `--retry-delay` | `ECHOLINE_RETRY_DELAY_MS` | 250 |
//! | `--format` | `ECHOLINE_FORMAT` | text |
//! | `--report` | `ECHOLINE_REPORT` | none |

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use echoline_application::settings::DEFAULT_BASE_URL;
use echoline_application::{ConfigError, RetryPolicy, RunSettings};

/// Report format printed on stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per case plus a summary.
    #[default]
    Text,
    /// The full report as JSON.
    Json,
}

/// Runs the HTTP contract suite against an echo service.
#[derive(Debug, Clone, Parser)]
#[command(name = "run-suite", version)]
#[command(about = "Run HTTP contract tests against an httpbin-compatible echo service")]
pub struct Cli {
    /// Base URL of the echo service.
    #[arg(long, env = "ECHOLINE_BASE_URL", default_value = DEFAULT_BASE_URL, value_name = "URL")]
    pub base_url: String,

    /// Default per-request timeout in milliseconds.
    #[arg(long = "timeout", env = "ECHOLINE_TIMEOUT_MS", default_value_t = 10_000, value_name = "MS")]
    pub timeout_ms: u64,

    /// Maximum number of cases in flight.
    #[arg(long, env = "ECHOLINE_PARALLEL", default_value_t = 1, value_name = "N")]
    pub parallel: usize,

    /// Only run cases whose name contains this text (case-insensitive).
    #[arg(long, env = "ECHOLINE_FILTER", value_name = "NAME_SUBSTRING")]
    pub filter: Option<String>,

    /// Suite file (.yaml, .yml or .json) instead of the built-in suite.
    #[arg(long, env = "ECHOLINE_SUITE", value_name = "PATH")]
    pub suite: Option<PathBuf>,

    /// Retries for transient network errors.
    #[arg(long, env = "ECHOLINE_RETRIES", default_value_t = 0, value_name = "N")]
    pub retries: u32,

    /// Pause between retries in milliseconds.
    #[arg(long = "retry-delay", env = "ECHOLINE_RETRY_DELAY_MS", default_value_t = 250, value_name = "MS")]
    pub retry_delay_ms: u64,

    /// Report format on stdout.
    #[arg(long, env = "ECHOLINE_FORMAT", value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also write the JSON report to this file.
    #[arg(long, env = "ECHOLINE_REPORT", value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Log request details to stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Builds validated run settings from the flags.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSetting`] for out-of-range values.
    pub fn settings(&self) -> Result<RunSettings, ConfigError> {
        let settings = RunSettings::new(self.base_url.clone())
            .with_timeout(Duration::from_millis(self.timeout_ms))
            .with_parallel(self.parallel)
            .with_retry(RetryPolicy::new(
                self.retries,
                Duration::from_millis(self.retry_delay_ms),
            ));
        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["run-suite"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(cli.filter.is_none());
        assert!(!cli.verbose);

        let settings = cli.settings().unwrap();
        assert_eq!(settings, RunSettings::default());
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "run-suite",
            "--base-url",
            "http://localhost:8080",
            "--timeout",
            "2500",
            "--parallel",
            "4",
            "--filter",
            "post",
            "--retries",
            "2",
            "--retry-delay",
            "100",
            "--format",
            "json",
            "--report",
            "out/report.json",
            "-v",
        ])
        .unwrap();

        assert_eq!(cli.filter.as_deref(), Some("post"));
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.report, Some(PathBuf::from("out/report.json")));
        assert!(cli.verbose);

        let settings = cli.settings().unwrap();
        assert_eq!(settings.base_url, "http://localhost:8080");
        assert_eq!(settings.timeout, Duration::from_millis(2500));
        assert_eq!(settings.parallel, 4);
        assert_eq!(
            settings.retry,
            RetryPolicy::new(2, Duration::from_millis(100))
        );
    }

    #[test]
    fn test_out_of_range_values_are_config_errors() {
        let zero_parallel = Cli::try_parse_from(["run-suite", "--parallel", "0"]).unwrap();
        assert!(matches!(
            zero_parallel.settings(),
            Err(ConfigError::InvalidSetting(_))
        ));

        let bad_url = Cli::try_parse_from(["run-suite", "--base-url", "httpbin.org"]).unwrap();
        assert!(matches!(bad_url.settings(), Err(ConfigError::InvalidSetting(_))));
    }

    #[test]
    fn test_non_numeric_timeout_is_rejected_by_parser() {
        assert!(Cli::try_parse_from(["run-suite", "--timeout", "soon"]).is_err());
    }
}
