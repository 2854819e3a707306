use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coverage::identity::ElementAttributes;
use crate::error::{CoverageError, Result};

/// Element state to wait for before acting on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitState {
    Attached,
    Visible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    #[default]
    Left,
    Right,
}

/// Browser-automation primitives the coverage layer calls into.
///
/// Every call is blocking and bounded by the timeout it is given (or the
/// driver's defaults). Implemented by `BrowserSession`; tests provide
/// scripted fakes.
pub trait PageDriver {
    /// Discard the current page and open a fresh one. Single-page drivers keep theirs.
    fn new_page(&mut self) -> Result<()> {
        Ok(())
    }

    fn navigate(&mut self, url: &str) -> Result<()>;

    /// Run a script in the page context and return its JSON result.
    fn evaluate(&mut self, script: &str) -> Result<Value>;

    fn wait_for(&mut self, selector: &str, state: WaitState, timeout_ms: u64) -> Result<()>;

    fn click(&mut self, selector: &str, button: MouseButton) -> Result<()>;

    fn double_click(&mut self, selector: &str) -> Result<()>;

    fn fill(&mut self, selector: &str, value: &str) -> Result<()>;

    fn is_visible(&mut self, selector: &str, timeout_ms: u64) -> Result<bool>;

    /// Text content of the first match, `None` if nothing matches.
    fn text_content(&mut self, selector: &str) -> Result<Option<String>>;

    fn current_url(&mut self) -> Result<String>;

    /// Let the page settle for `ms` milliseconds.
    fn pause(&mut self, ms: u64) -> Result<()>;

    /// Attributes of the first element matching a CSS selector.
    ///
    /// Returns `Ok(None)` when nothing matches or the selector is not plain
    /// CSS (engine-specific selectors throw inside `querySelector`).
    fn describe(&mut self, selector: &str) -> Result<Option<ElementAttributes>> {
        let value = self.evaluate(&describe_script(selector)?)?;
        if value.is_null() {
            return Ok(None);
        }
        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| CoverageError::JsonParse {
                context: format!("describe '{}'", selector),
                source: e,
            })
    }
}

/// Script returning `{tag, testId, id, text}` for the first match of `selector`, or null.
pub fn describe_script(selector: &str) -> Result<String> {
    let literal = serde_json::to_string(selector).map_err(|e| CoverageError::JsonSerialize {
        context: "describe selector".into(),
        source: e,
    })?;
    Ok(format!(
        r#"() => {{
  let el = null;
  try {{ el = document.querySelector({literal}); }} catch (e) {{ return null; }}
  if (!el) return null;
  return {{
    tag: el.tagName,
    testId: el.getAttribute('data-testid'),
    id: el.id || null,
    text: el.textContent || null
  }};
}}"#
    ))
}
