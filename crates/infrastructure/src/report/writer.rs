//! Machine-readable report output.

use std::path::Path;

use echoline_application::ApplicationError;
use echoline_domain::SuiteReport;
use tokio::fs;
use tracing::debug;

use crate::serialization::{SerializationError, to_json_stable};

/// Renders the report as pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_json(report: &SuiteReport) -> Result<String, SerializationError> {
    to_json_stable(report)
}

/// Writes the JSON report to `path`, creating parent directories.
///
/// # Errors
///
/// Returns [`ApplicationError`] if the report cannot be serialized or written.
pub async fn write_report(path: &Path, report: &SuiteReport) -> Result<(), ApplicationError> {
    let json = render_json(report).map_err(|e| ApplicationError::Serialization(e.to_string()))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, json).await?;

    debug!(path = %path.display(), "report written");
    Ok(())
}
