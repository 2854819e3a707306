//! UI coverage for browser-driven tests.
//!
//! Pages are scanned for interactive elements (`coverage::scanner`), test
//! actions mark the elements they touch (`coverage::actions`), and both sides
//! land in a `coverage::registry::SharedRegistry`. At the end of a run the
//! registry becomes a `report::report_model::CoverageReport`, printed to the
//! console and written as an HTML or JSON artifact.

pub mod browser;
pub mod cli;
pub mod coverage;
pub mod error;
pub mod logging;
pub mod report;
pub mod spec;

pub use browser::driver::PageDriver;
pub use coverage::actions::{ActionConfig, ActionOutcome, CoverageActions, IdentifierMode};
pub use coverage::identity::{ElementAttributes, ElementIdentifier};
pub use coverage::registry::{CoverageRegistry, SharedRegistry};
pub use coverage::scanner::{PageScanner, ScanReport};
pub use error::{CoverageError, Result};
pub use report::report_model::CoverageReport;
