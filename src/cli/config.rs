use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::coverage::actions::{ActionConfig, IdentifierMode};
use crate::report::writer::DEFAULT_REPORT_PATH;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "ui-coverage",
    version,
    about = "Measure how much of a page's interactive surface UI tests exercise"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to config file (default: ui-coverage.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run test specs and report UI coverage
    Run {
        /// Path to test spec YAML file or directory of YAML files
        #[arg(long)]
        spec: String,

        /// Report artifact path (.html or .json)
        #[arg(long)]
        report: Option<String>,

        /// Identifier derivation for exercised elements: unified or legacy
        #[arg(long)]
        identifiers: Option<String>,

        /// Show the browser window
        #[arg(long)]
        headed: bool,
    },

    /// Scan a single page and print the interactive elements found
    Scan {
        /// URL to scan
        #[arg(long)]
        url: String,

        /// Show the browser window
        #[arg(long)]
        headed: bool,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `ui-coverage.yaml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub coverage: CoverageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_server_script")]
    pub server_script: String,

    #[serde(default = "default_true")]
    pub headless: bool,

    #[serde(default)]
    pub slow_mo_ms: u64,

    #[serde(default = "default_navigation_timeout")]
    pub navigation_timeout_ms: u64,

    #[serde(default = "default_action_timeout")]
    pub action_timeout_ms: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            server_script: default_server_script(),
            headless: true,
            slow_mo_ms: 0,
            navigation_timeout_ms: default_navigation_timeout(),
            action_timeout_ms: default_action_timeout(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageConfig {
    #[serde(default = "default_report_path")]
    pub report_path: String,

    #[serde(default)]
    pub identifiers: IdentifierMode,

    #[serde(default = "default_settle")]
    pub settle_ms: u64,

    #[serde(default = "default_visibility_timeout")]
    pub visibility_timeout_ms: u64,

    #[serde(default = "default_click_pause")]
    pub click_pause_ms: u64,

    #[serde(default = "default_fill_pause")]
    pub fill_pause_ms: u64,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            report_path: default_report_path(),
            identifiers: IdentifierMode::Unified,
            settle_ms: default_settle(),
            visibility_timeout_ms: default_visibility_timeout(),
            click_pause_ms: default_click_pause(),
            fill_pause_ms: default_fill_pause(),
        }
    }
}

// Serde default helpers
fn default_server_script() -> String { "node/browser_server.js".to_string() }
fn default_true() -> bool { true }
fn default_navigation_timeout() -> u64 { 60_000 }
fn default_action_timeout() -> u64 { 30_000 }
fn default_report_path() -> String { DEFAULT_REPORT_PATH.to_string() }
fn default_settle() -> u64 { 2_000 }
fn default_visibility_timeout() -> u64 { 10_000 }
fn default_click_pause() -> u64 { 1_000 }
fn default_fill_pause() -> u64 { 500 }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("ui-coverage.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = config_path, error = %e, "ignoring malformed config");
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

/// Parse an `--identifiers` value.
pub fn parse_identifier_mode(value: &str) -> Option<IdentifierMode> {
    match value.to_ascii_lowercase().as_str() {
        "unified" => Some(IdentifierMode::Unified),
        "legacy" => Some(IdentifierMode::Legacy),
        _ => None,
    }
}

// ============================================================================
// Config Builders (merge CLI args with config file)
// ============================================================================

/// Build the wrapper configuration from resolved config values.
pub fn build_action_config(config: &AppConfig) -> ActionConfig {
    ActionConfig {
        identifiers: config.coverage.identifiers,
        action_timeout_ms: config.browser.action_timeout_ms,
        visibility_timeout_ms: config.coverage.visibility_timeout_ms,
        settle_ms: config.coverage.settle_ms,
        click_pause_ms: config.coverage.click_pause_ms,
        fill_pause_ms: config.coverage.fill_pause_ms,
    }
}
