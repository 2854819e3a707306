use std::path::Path;

use tracing::{info, warn};

use crate::browser::session::BrowserSession;
use crate::cli::config::{AppConfig, build_action_config};
use crate::coverage::actions::CoverageActions;
use crate::coverage::registry::SharedRegistry;
use crate::report::console::format_test_results;
use crate::report::writer::render;
use crate::spec::runner::TestRunner;
use crate::spec::spec_model::TestSpec;

// ============================================================================
// run subcommand
// ============================================================================

/// Run test specs, render the coverage report, and return whether all passed.
///
/// Each spec gets a fresh page; the registry is shared by the whole run so
/// coverage accumulates across specs. Once the browser is up, results and the
/// coverage report are always printed, even when individual specs fail.
pub fn cmd_run(spec_path: &str, config: &AppConfig) -> Result<bool, Box<dyn std::error::Error>> {
    let specs = load_specs(spec_path)?;

    if specs.is_empty() {
        warn!(path = spec_path, "No test specs found");
        return Ok(true);
    }

    info!(count = specs.len(), "Running test specs");

    let actions = CoverageActions::new(SharedRegistry::new(), build_action_config(config));
    let mut session = BrowserSession::launch(&config.browser)?;

    let results = TestRunner::run_all(&specs, &mut session, &actions);
    if let Err(e) = session.quit() {
        warn!(error = %e, "browser session did not shut down cleanly");
    }

    print!("{}", format_test_results(&results));

    let report = actions.registry().report();
    render(&report, Path::new(&config.coverage.report_path));

    Ok(results.iter().all(|r| r.passed))
}

/// Load test specs from a single YAML file or a directory of YAML files.
pub fn load_specs(path: &str) -> Result<Vec<TestSpec>, Box<dyn std::error::Error>> {
    let metadata = std::fs::metadata(path)?;
    if metadata.is_dir() {
        let mut specs = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let p = entry?.path();
            if p.extension().is_some_and(|e| e == "yaml" || e == "yml") {
                let content = std::fs::read_to_string(&p)?;
                let spec: TestSpec = serde_yaml::from_str(&content)?;
                specs.push(spec);
            }
        }
        // Sort by name for deterministic order
        specs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(specs)
    } else {
        let content = std::fs::read_to_string(path)?;
        let spec: TestSpec = serde_yaml::from_str(&content)?;
        Ok(vec![spec])
    }
}

// ============================================================================
// scan subcommand
// ============================================================================

pub fn cmd_scan(url: &str, config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let registry = SharedRegistry::new();
    let actions = CoverageActions::new(registry, build_action_config(config));
    let mut session = BrowserSession::launch(&config.browser)?;

    let scan = actions.navigate(&mut session, url, url)?;
    session.quit()?;

    for failure in &scan.skipped {
        println!("  skipped selector {}: {}", failure.selector, failure.message);
    }
    for id in &scan.identifiers {
        println!("{}", id);
    }
    println!("Collected {} interactive elements", scan.collected());

    Ok(())
}
