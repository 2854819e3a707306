use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::browser::driver::{MouseButton, PageDriver, WaitState};
use crate::coverage::identity::{ElementIdentifier, action_identifier, derive};
use crate::coverage::registry::SharedRegistry;
use crate::coverage::scanner::{PageScanner, ScanReport};
use crate::error::{CoverageError, Result};

/// How action wrappers derive the identifier they mark as exercised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierMode {
    /// Resolve the element's attributes and apply the scanner's priority chain
    #[default]
    Unified,
    /// Always `selector::description`
    Legacy,
}

/// Timeouts and pauses used by the wrappers.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionConfig {
    pub identifiers: IdentifierMode,
    pub action_timeout_ms: u64,
    pub visibility_timeout_ms: u64,
    pub settle_ms: u64,
    pub click_pause_ms: u64,
    pub fill_pause_ms: u64,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            identifiers: IdentifierMode::Unified,
            action_timeout_ms: 30_000,
            visibility_timeout_ms: 10_000,
            settle_ms: 2_000,
            click_pause_ms: 1_000,
            fill_pause_ms: 500,
        }
    }
}

/// Result of an optional action. Soft failures are values, not errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// The action ran and the element was marked exercised
    Performed(ElementIdentifier),
    /// Visibility check completed but the element is not visible
    NotVisible,
    /// The action could not be performed
    Skipped { reason: String },
}

impl ActionOutcome {
    pub fn is_performed(&self) -> bool {
        matches!(self, ActionOutcome::Performed(_))
    }

    /// Treat anything but `Performed` as a failure of `action` on `selector`.
    pub fn escalate(self, action: &'static str, selector: &str) -> Result<ElementIdentifier> {
        match self {
            ActionOutcome::Performed(id) => Ok(id),
            ActionOutcome::NotVisible => Err(CoverageError::Escalated {
                action,
                selector: selector.to_string(),
                reason: "element not visible".into(),
            }),
            ActionOutcome::Skipped { reason } => Err(CoverageError::Escalated {
                action,
                selector: selector.to_string(),
                reason,
            }),
        }
    }
}

/// UI actions that record coverage for the elements they touch.
///
/// Required actions (`click`, `fill`, `wait_for_element`) return errors that
/// should fail the test. Optional ones return an `ActionOutcome`.
#[derive(Debug, Clone)]
pub struct CoverageActions {
    registry: SharedRegistry,
    config: ActionConfig,
}

impl CoverageActions {
    pub fn new(registry: SharedRegistry, config: ActionConfig) -> Self {
        Self { registry, config }
    }

    /// Registry this instance records into.
    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    /// Navigate, let the page settle, then scan it for interactive elements.
    pub fn navigate(
        &self,
        driver: &mut dyn PageDriver,
        url: &str,
        page_name: &str,
    ) -> Result<ScanReport> {
        info!(url, "Navigating");
        driver.navigate(url)?;
        driver.pause(self.config.settle_ms)?;
        let report = PageScanner::scan(driver, &self.registry);
        info!(page = page_name, "Analyzed page");
        Ok(report)
    }

    pub fn click(
        &self,
        driver: &mut dyn PageDriver,
        selector: &str,
        description: &str,
    ) -> Result<ElementIdentifier> {
        let result = self.wait_attached_then_visible(driver, selector).and_then(|()| {
            let id = self.exercised_identifier(driver, selector, description);
            driver.click(selector, MouseButton::Left)?;
            Ok(id)
        });

        let id = self.required("clickable", selector, description, result)?;
        self.registry.mark_exercised(id.clone());
        info!(element = description, "Clicked");
        driver.pause(self.config.click_pause_ms)?;
        Ok(id)
    }

    /// Clear the field, then type `value` into it.
    pub fn fill(
        &self,
        driver: &mut dyn PageDriver,
        selector: &str,
        value: &str,
        description: &str,
    ) -> Result<ElementIdentifier> {
        let result = self.wait_attached_then_visible(driver, selector).and_then(|()| {
            let id = self.exercised_identifier(driver, selector, description);
            driver.fill(selector, "")?;
            driver.fill(selector, value)?;
            Ok(id)
        });

        let id = self.required("fillable", selector, description, result)?;
        self.registry.mark_exercised(id.clone());
        info!(element = description, value, "Filled");
        driver.pause(self.config.fill_pause_ms)?;
        Ok(id)
    }

    /// Wait until the element is attached and visible. Marks nothing.
    pub fn wait_for_element(
        &self,
        driver: &mut dyn PageDriver,
        selector: &str,
        description: &str,
    ) -> Result<()> {
        info!(element = description, "Waiting for element");
        let result = self.wait_attached_then_visible(driver, selector);
        self.required("found", selector, description, result)?;
        info!(element = description, "Element ready");
        Ok(())
    }

    pub fn double_click(
        &self,
        driver: &mut dyn PageDriver,
        selector: &str,
        description: &str,
    ) -> ActionOutcome {
        let result = driver
            .wait_for(selector, WaitState::Visible, self.config.action_timeout_ms)
            .and_then(|()| {
                let id = self.exercised_identifier(driver, selector, description);
                driver.double_click(selector)?;
                Ok(id)
            });
        self.optional("double click", driver, description, result)
    }

    pub fn right_click(
        &self,
        driver: &mut dyn PageDriver,
        selector: &str,
        description: &str,
    ) -> ActionOutcome {
        let result = driver
            .wait_for(selector, WaitState::Visible, self.config.action_timeout_ms)
            .and_then(|()| {
                let id = self.exercised_identifier(driver, selector, description);
                driver.click(selector, MouseButton::Right)?;
                Ok(id)
            });
        self.optional("right click", driver, description, result)
    }

    /// Mark the element exercised if it is visible within the visibility timeout.
    pub fn check_visible(
        &self,
        driver: &mut dyn PageDriver,
        selector: &str,
        description: &str,
    ) -> ActionOutcome {
        match driver.is_visible(selector, self.config.visibility_timeout_ms) {
            Ok(true) => {
                let id = self.exercised_identifier(driver, selector, description);
                self.registry.mark_exercised(id.clone());
                info!(element = description, "Visible");
                ActionOutcome::Performed(id)
            }
            Ok(false) => {
                warn!(element = description, "Element not visible (but no error)");
                ActionOutcome::NotVisible
            }
            Err(e) => {
                warn!(element = description, error = %e, "Element check skipped");
                ActionOutcome::Skipped {
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn text_content(
        &self,
        driver: &mut dyn PageDriver,
        selector: &str,
    ) -> Result<Option<String>> {
        driver.text_content(selector)
    }

    /// Identifier to mark for an element targeted by `selector`.
    ///
    /// In unified mode the element's attributes go through the same chain the
    /// scanner uses. Elements that cannot be described, or that only reach the
    /// random fallback branch, use `selector::description` instead.
    pub fn exercised_identifier(
        &self,
        driver: &mut dyn PageDriver,
        selector: &str,
        description: &str,
    ) -> ElementIdentifier {
        if self.config.identifiers == IdentifierMode::Unified {
            match driver.describe(selector) {
                Ok(Some(attributes)) => {
                    let (id, source) = derive(&attributes, selector);
                    if source.is_stable() {
                        return id;
                    }
                }
                Ok(None) => {}
                Err(e) => warn!(selector, error = %e, "could not describe element"),
            }
        }
        action_identifier(selector, Some(description))
    }

    fn wait_attached_then_visible(&self, driver: &mut dyn PageDriver, selector: &str) -> Result<()> {
        let timeout = self.config.action_timeout_ms;
        driver.wait_for(selector, WaitState::Attached, timeout)?;
        driver.wait_for(selector, WaitState::Visible, timeout)
    }

    fn required<T>(
        &self,
        action: &'static str,
        selector: &str,
        description: &str,
        result: Result<T>,
    ) -> Result<T> {
        result.map_err(|e| {
            error!(element = description, error = %e, "Element not {}", action);
            CoverageError::ActionFailed {
                action,
                selector: selector.to_string(),
                source: Box::new(e),
            }
        })
    }

    fn optional(
        &self,
        action: &str,
        driver: &mut dyn PageDriver,
        description: &str,
        result: Result<ElementIdentifier>,
    ) -> ActionOutcome {
        match result {
            Ok(id) => {
                self.registry.mark_exercised(id.clone());
                info!(element = description, "Performed {}", action);
                if let Err(e) = driver.pause(self.config.click_pause_ms) {
                    warn!(error = %e, "pause after {} failed", action);
                }
                ActionOutcome::Performed(id)
            }
            Err(e) => {
                warn!(element = description, error = %e, "Failed to {}", action);
                ActionOutcome::Skipped {
                    reason: e.to_string(),
                }
            }
        }
    }
}
