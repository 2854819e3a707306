use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoverageError>;

#[derive(Debug, Error)]
pub enum CoverageError {
    /// Node.js driver process failed to spawn
    #[error("Failed to spawn {script} (is Node.js installed?): {source}")]
    SubprocessSpawn {
        script: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading from / writing to the driver process failed
    #[error("Browser session I/O error: {0}")]
    SessionIO(String),

    /// Driver answered a command with ok=false or an incomplete response
    #[error("Browser command '{command}' failed: {error}")]
    SessionProtocol { command: String, error: String },

    /// JSON parsing failed (driver output or scan payload)
    #[error("JSON parse error ({context}): {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// JSON serialization failed (request to driver, JSON artifact)
    #[error("JSON serialize error ({context}): {source}")]
    JsonSerialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Scan script returned something other than the expected payload
    #[error("Unexpected scan result shape: {0}")]
    ScanShape(String),

    /// A required wrapper action (click, fill, wait) did not complete
    #[error("Element not {action}: {selector}")]
    ActionFailed {
        action: &'static str,
        selector: String,
        #[source]
        source: Box<CoverageError>,
    },

    /// An optional action reported a soft failure that the caller escalated
    #[error("{action} on '{selector}' did not complete: {reason}")]
    Escalated {
        action: &'static str,
        selector: String,
        reason: String,
    },

    /// Writing the report artifact failed
    #[error("Failed to write report to {}: {source}", path.display())]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
