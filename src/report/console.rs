use crate::report::report_model::CoverageReport;
use crate::spec::spec_model::TestResult;

// ============================================================================
// Console reporter: formatted terminal output
// ============================================================================

/// Format the coverage summary block.
///
/// Produces output like:
/// ```text
/// === UI COVERAGE REPORT ===
/// Total elements: 12
/// Covered elements: 3
/// Coverage: 25.00%
/// Uncovered elements: 9
/// ```
pub fn format_coverage_summary(report: &CoverageReport) -> String {
    format!(
        "=== UI COVERAGE REPORT ===\n\
         Total elements: {}\n\
         Covered elements: {}\n\
         Coverage: {:.2}%\n\
         Uncovered elements: {}\n",
        report.total_discovered, report.total_exercised, report.percentage, report.uncovered
    )
}

/// Format per-test pass/fail lines for a run.
pub fn format_test_results(results: &[TestResult]) -> String {
    let mut out = String::new();

    for result in results {
        let marker = if result.passed {
            "\u{2713} PASS"
        } else {
            "\u{2717} FAIL"
        };

        out.push_str(&format!(
            "{}  {} ({} steps, {} assertions)\n",
            marker,
            result.spec_name,
            result.steps_run,
            result.assertion_results.len()
        ));

        if let Some(ref error) = result.error {
            out.push_str(&format!("    [ERROR] {}\n", error));
        }

        for soft in &result.soft_failures {
            out.push_str(&format!("    [SKIP] {}\n", soft));
        }

        for ar in result.assertion_results.iter().filter(|ar| !ar.passed) {
            let detail = ar.message.as_deref().unwrap_or("assertion failed");
            out.push_str(&format!("    [FAIL] Step {}: {}\n", ar.step_index, detail));
        }
    }

    let passed = results.iter().filter(|r| r.passed).count();
    out.push_str(&format!(
        "\n=== Results: {} passed, {} failed ({} total) ===\n",
        passed,
        results.len() - passed,
        results.len()
    ));

    out
}
