use std::io::Write;
use std::path::Path;

use tracing::{error, info};

use crate::error::{CoverageError, Result};
use crate::report::console::format_coverage_summary;
use crate::report::html::generate_html_report;
use crate::report::report_model::CoverageReport;

/// Default location of the report artifact.
pub const DEFAULT_REPORT_PATH: &str = "target/ui-coverage-report.html";

/// Artifact body for `path`: pretty JSON for `.json`, HTML otherwise.
pub fn artifact_content(report: &CoverageReport, path: &Path) -> Result<String> {
    let is_json = path.extension().is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::to_string_pretty(report).map_err(|e| CoverageError::JsonSerialize {
            context: "coverage report".into(),
            source: e,
        })
    } else {
        Ok(generate_html_report(report))
    }
}

/// Write the report artifact. Parent directories are not created.
pub fn write_artifact(report: &CoverageReport, path: &Path) -> Result<()> {
    let content = artifact_content(report, path)?;
    std::fs::write(path, content).map_err(|e| CoverageError::ReportWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write the artifact, then print the summary to `out`.
///
/// Artifact failures are logged and reported through the return value
/// (`true` when the artifact was written); the summary is emitted either way.
pub fn render_to<W: Write>(report: &CoverageReport, out: &mut W, artifact: &Path) -> bool {
    let written = match write_artifact(report, artifact) {
        Ok(()) => {
            info!(path = %artifact.display(), "Coverage report written");
            true
        }
        Err(e) => {
            error!(error = %e, "Could not write coverage report");
            false
        }
    };

    if let Err(e) = out.write_all(format_coverage_summary(report).as_bytes()) {
        error!(error = %e, "Could not print coverage summary");
    }

    written
}

/// `render_to` on stdout.
pub fn render(report: &CoverageReport, artifact: &Path) -> bool {
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    render_to(report, &mut lock, artifact)
}
