use crate::report::report_model::CoverageReport;

// ============================================================================
// HTML reporter: self-contained coverage page
// ============================================================================

/// Generate a self-contained HTML coverage report.
///
/// Summary numbers in the header, then every discovered identifier with a
/// covered/uncovered flag. Exercised identifiers that were never discovered
/// get their own section.
pub fn generate_html_report(report: &CoverageReport) -> String {
    let header_color = match report.percentage {
        p if p >= 80.0 => "#4CAF50",
        p if p >= 50.0 => "#FF9800",
        _ => "#f44336",
    };

    let mut rows = String::new();
    for entry in report.entries() {
        let (class, status) = if entry.exercised {
            ("covered", "\u{2713} covered")
        } else {
            ("uncovered", "\u{2717} uncovered")
        };
        rows.push_str(&format!(
            "<tr class=\"{class}\"><td><code>{id}</code></td><td>{status}</td></tr>\n",
            class = class,
            id = escape_html(entry.id.as_str()),
            status = status,
        ));
    }

    let unmatched = report.unmatched();
    let mut unmatched_section = String::new();
    if !unmatched.is_empty() {
        unmatched_section.push_str(
            "<h2>Exercised but not discovered</h2>\n<ul class=\"unmatched\">\n",
        );
        for id in unmatched {
            unmatched_section.push_str(&format!(
                "<li><code>{}</code></li>\n",
                escape_html(id.as_str())
            ));
        }
        unmatched_section.push_str("</ul>\n");
    }

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>UI Coverage Report</title>
<style>
body {{ font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; margin: 0; padding: 0; background: #f5f5f5; }}
.header {{ background: {header_color}; color: white; padding: 20px 30px; }}
.header h1 {{ margin: 0 0 8px 0; font-size: 24px; }}
.header p {{ margin: 0; font-size: 16px; opacity: 0.9; }}
.content {{ max-width: 900px; margin: 20px auto; padding: 0 20px; }}
table {{ width: 100%; border-collapse: collapse; background: white; border-radius: 6px; }}
th, td {{ text-align: left; padding: 8px 12px; border-bottom: 1px solid #eee; font-size: 14px; }}
tr.covered td:last-child {{ color: #2e7d32; }}
tr.uncovered td:last-child {{ color: #c62828; }}
.unmatched li {{ color: #666; font-size: 13px; }}
</style>
</head>
<body>
<div class="header">
<h1>UI Coverage: {percentage:.2}%</h1>
<p>Total elements: {total} | Covered: {covered} | Uncovered: {uncovered}</p>
</div>
<div class="content">
<table>
<thead><tr><th>Element</th><th>Status</th></tr></thead>
<tbody>
{rows}</tbody>
</table>
{unmatched_section}</div>
</body>
</html>"##,
        header_color = header_color,
        percentage = report.percentage,
        total = report.total_discovered,
        covered = report.total_exercised,
        uncovered = report.uncovered,
        rows = rows,
        unmatched_section = unmatched_section,
    )
}

/// Escape HTML special characters.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
