//! Suite loading from the embedded httpbin document or from disk.

use std::path::Path;

use echoline_application::ConfigError;
use echoline_domain::TestSuite;
use tracing::debug;

/// The built-in httpbin suite.
const BUILTIN_SUITE: &str = include_str!("httpbin.yaml");

/// Origin label used in errors for the built-in suite.
const BUILTIN_ORIGIN: &str = "built-in";

/// On-disk suite formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuiteFormat {
    /// `.yaml` or `.yml`
    Yaml,
    /// `.json`
    Json,
}

impl SuiteFormat {
    /// Picks the format from a file extension.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedFormat`] for any other extension.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Loads and validates test suites.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuiteLoader;

impl SuiteLoader {
    /// The fixed httpbin suite, in its canonical order.
    ///
    /// # Errors
    ///
    /// Only fails if the embedded document is broken.
    pub fn builtin() -> Result<TestSuite, ConfigError> {
        Self::parse(BUILTIN_SUITE, SuiteFormat::Yaml, BUILTIN_ORIGIN)
    }

    /// Reads a `.yaml`, `.yml` or `.json` suite file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read, parsed or validated.
    pub async fn from_path(path: &Path) -> Result<TestSuite, ConfigError> {
        let format = SuiteFormat::from_path(path)?;
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::parse(&content, format, &path.display().to_string())
    }

    /// Parses and validates suite text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed documents (including
    /// unknown assertion types) and [`ConfigError::Invalid`] for suites that
    /// parse but break a rule.
    pub fn parse(content: &str, format: SuiteFormat, origin: &str) -> Result<TestSuite, ConfigError> {
        let parsed = match format {
            SuiteFormat::Yaml => serde_yaml::from_str::<TestSuite>(content).map_err(|e| e.to_string()),
            SuiteFormat::Json => serde_json::from_str::<TestSuite>(content).map_err(|e| e.to_string()),
        };
        let suite = parsed.map_err(|message| ConfigError::Parse {
            origin: origin.to_string(),
            message,
        })?;

        suite.validate()?;
        debug!(origin, suite = %suite.name, cases = suite.len(), "suite loaded");
        Ok(suite)
    }
}
