use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::browser::driver::PageDriver;
use crate::coverage::identity::{ElementAttributes, ElementIdentifier, identify};
use crate::coverage::registry::SharedRegistry;
use crate::error::{CoverageError, Result};

/// Selectors queried in order to find interactive elements.
pub const INTERACTIVE_SELECTORS: [&str; 9] = [
    "button",
    "input",
    "select",
    "textarea",
    "a",
    "[role=button]",
    "[onclick]",
    "[data-testid]",
    "[id]",
];

/// One element matched by a scan selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannedElement {
    /// Selector from `INTERACTIVE_SELECTORS` that matched the element
    pub selector: String,
    /// `false` when the element has no rendered box
    pub visible: bool,
    #[serde(flatten)]
    pub attributes: ElementAttributes,
}

/// A selector whose query threw inside the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectorFailure {
    pub selector: String,
    pub message: String,
}

/// Typed result of the in-page scan script.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanPayload {
    pub elements: Vec<ScannedElement>,
    #[serde(default)]
    pub errors: Vec<SelectorFailure>,
}

impl ScanPayload {
    /// Validate a raw script result.
    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(CoverageError::ScanShape(format!(
                "expected an object with an 'elements' array, got {}",
                json_kind(&value)
            )));
        }
        serde_json::from_value(value).map_err(|e| CoverageError::ScanShape(e.to_string()))
    }

    /// Identifiers of the visible elements, deduplicated, in scan order.
    pub fn identifiers(&self) -> Vec<ElementIdentifier> {
        let mut seen = HashSet::new();
        self.elements
            .iter()
            .filter(|el| el.visible)
            .map(|el| identify(&el.attributes, &el.selector))
            .filter(|id| seen.insert(id.clone()))
            .collect()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Outcome of one `scan` call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanReport {
    /// Distinct identifiers collected by this scan
    pub identifiers: Vec<ElementIdentifier>,
    /// How many of them were not yet in the registry
    pub newly_discovered: usize,
    /// Selectors skipped because their query failed
    pub skipped: Vec<SelectorFailure>,
}

impl ScanReport {
    pub fn collected(&self) -> usize {
        self.identifiers.len()
    }
}

/// Script run in the page: query every selector, report each match with its
/// visibility and raw attributes. Per-selector exceptions are reported, not thrown.
pub fn scan_script() -> String {
    let selectors = INTERACTIVE_SELECTORS
        .iter()
        .map(|s| format!("'{}'", s))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        r#"() => {{
  const selectors = [{selectors}];
  const elements = [];
  const errors = [];
  for (const selector of selectors) {{
    try {{
      document.querySelectorAll(selector).forEach(el => {{
        elements.push({{
          selector,
          visible: el.offsetParent !== null,
          tag: el.tagName,
          testId: el.getAttribute('data-testid'),
          id: el.id || null,
          text: el.textContent || null
        }});
      }});
    }} catch (e) {{
      errors.push({{ selector, message: String(e && e.message || e) }});
    }}
  }}
  return {{ elements, errors }};
}}"#
    )
}

/// Discovers interactive elements on the current page and records them.
pub struct PageScanner;

impl PageScanner {
    /// Scan the current page into `registry`.
    ///
    /// Never fails: a script or shape error is logged and yields an empty report.
    pub fn scan(driver: &mut dyn PageDriver, registry: &SharedRegistry) -> ScanReport {
        let payload = match Self::collect(driver) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "Could not collect elements");
                return ScanReport::default();
            }
        };

        for failure in &payload.errors {
            debug!(selector = %failure.selector, message = %failure.message, "selector skipped");
        }

        let identifiers = payload.identifiers();
        let newly_discovered = identifiers
            .iter()
            .filter(|id| registry.add_discovered((*id).clone()))
            .count();

        info!(
            collected = identifiers.len(),
            new = newly_discovered,
            "Collected {} interactive elements",
            identifiers.len()
        );

        ScanReport {
            identifiers,
            newly_discovered,
            skipped: payload.errors,
        }
    }

    /// Run the scan script and validate its result.
    pub fn collect(driver: &mut dyn PageDriver) -> Result<ScanPayload> {
        let value = driver.evaluate(&scan_script())?;
        ScanPayload::from_value(value)
    }
}
