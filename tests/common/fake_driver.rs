use std::collections::{HashMap, HashSet};

use serde_json::Value;
use ui_coverage::browser::driver::{MouseButton, PageDriver, WaitState};
use ui_coverage::coverage::identity::ElementAttributes;
use ui_coverage::error::{CoverageError, Result};

/// State of one element on the scripted page.
#[derive(Debug, Clone)]
pub struct FakeElement {
    pub attributes: Option<ElementAttributes>,
    pub visible: bool,
    pub text: Option<String>,
}

/// In-memory `PageDriver` with scripted responses. Records every call.
#[derive(Debug, Default)]
pub struct FakeDriver {
    pub scan_result: Option<std::result::Result<Value, String>>,
    pub elements: HashMap<String, FakeElement>,
    /// Selectors whose every operation errors
    pub broken: HashSet<String>,
    pub url: String,
    /// Fresh pages opened so far
    pub pages_opened: usize,
    /// `new_page` fails once this many pages have been opened
    pub page_limit: Option<usize>,
    pub calls: Vec<String>,
}

fn timeout(selector: &str) -> CoverageError {
    CoverageError::SessionProtocol {
        command: "wait_for".into(),
        error: format!("Timeout waiting for selector \"{}\"", selector),
    }
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scan(mut self, value: Value) -> Self {
        self.scan_result = Some(Ok(value));
        self
    }

    pub fn with_scan_error(mut self, message: &str) -> Self {
        self.scan_result = Some(Err(message.to_string()));
        self
    }

    /// Add an element with the given `id` attribute.
    pub fn with_element(mut self, selector: &str, tag: &str, id: Option<&str>, visible: bool) -> Self {
        self.elements.insert(
            selector.to_string(),
            FakeElement {
                attributes: Some(ElementAttributes {
                    tag: tag.into(),
                    test_id: None,
                    id: id.map(str::to_string),
                    text: None,
                }),
                visible,
                text: None,
            },
        );
        self
    }

    /// Add an element that cannot be described (engine-specific selector).
    pub fn with_opaque_element(mut self, selector: &str, visible: bool) -> Self {
        self.elements.insert(
            selector.to_string(),
            FakeElement {
                attributes: None,
                visible,
                text: None,
            },
        );
        self
    }

    pub fn with_text(mut self, selector: &str, text: &str) -> Self {
        if let Some(el) = self.elements.get_mut(selector) {
            el.text = Some(text.to_string());
        }
        self
    }

    pub fn with_broken(mut self, selector: &str) -> Self {
        self.broken.insert(selector.to_string());
        self
    }

    /// Allow `limit` fresh pages; later `new_page` calls fail.
    pub fn with_page_limit(mut self, limit: usize) -> Self {
        self.page_limit = Some(limit);
        self
    }

    pub fn called(&self, call: &str) -> bool {
        self.calls.iter().any(|c| c == call)
    }

    fn element(&self, selector: &str) -> Result<&FakeElement> {
        if self.broken.contains(selector) {
            return Err(CoverageError::SessionProtocol {
                command: "query".into(),
                error: format!("Element is not attached to the DOM: {}", selector),
            });
        }
        self.elements.get(selector).ok_or_else(|| timeout(selector))
    }

    fn actionable(&self, selector: &str) -> Result<()> {
        let el = self.element(selector)?;
        if el.visible { Ok(()) } else { Err(timeout(selector)) }
    }
}

impl PageDriver for FakeDriver {
    fn new_page(&mut self) -> Result<()> {
        self.calls.push("new_page".into());
        if self.page_limit.is_some_and(|limit| self.pages_opened >= limit) {
            return Err(CoverageError::SessionProtocol {
                command: "new_page".into(),
                error: "Target page, context or browser has been closed".into(),
            });
        }
        self.pages_opened += 1;
        Ok(())
    }

    fn navigate(&mut self, url: &str) -> Result<()> {
        self.calls.push(format!("navigate {}", url));
        self.url = url.to_string();
        Ok(())
    }

    fn evaluate(&mut self, _script: &str) -> Result<Value> {
        self.calls.push("evaluate".into());
        match &self.scan_result {
            Some(Ok(value)) => Ok(value.clone()),
            Some(Err(message)) => Err(CoverageError::SessionProtocol {
                command: "evaluate".into(),
                error: message.clone(),
            }),
            None => Ok(Value::Null),
        }
    }

    fn wait_for(&mut self, selector: &str, state: WaitState, _timeout_ms: u64) -> Result<()> {
        self.calls.push(format!("wait_for {} {:?}", selector, state));
        match state {
            WaitState::Attached => self.element(selector).map(|_| ()),
            WaitState::Visible => self.actionable(selector),
        }
    }

    fn click(&mut self, selector: &str, button: MouseButton) -> Result<()> {
        self.calls.push(format!("click {} {:?}", selector, button));
        self.actionable(selector)
    }

    fn double_click(&mut self, selector: &str) -> Result<()> {
        self.calls.push(format!("double_click {}", selector));
        self.actionable(selector)
    }

    fn fill(&mut self, selector: &str, value: &str) -> Result<()> {
        self.calls.push(format!("fill {} '{}'", selector, value));
        self.actionable(selector)
    }

    fn is_visible(&mut self, selector: &str, _timeout_ms: u64) -> Result<bool> {
        self.calls.push(format!("is_visible {}", selector));
        if self.broken.contains(selector) {
            return self.element(selector).map(|_| false);
        }
        Ok(self.elements.get(selector).is_some_and(|el| el.visible))
    }

    fn text_content(&mut self, selector: &str) -> Result<Option<String>> {
        self.calls.push(format!("text_content {}", selector));
        Ok(self.elements.get(selector).and_then(|el| el.text.clone()))
    }

    fn current_url(&mut self) -> Result<String> {
        Ok(self.url.clone())
    }

    fn pause(&mut self, ms: u64) -> Result<()> {
        self.calls.push(format!("pause {}", ms));
        Ok(())
    }

    fn describe(&mut self, selector: &str) -> Result<Option<ElementAttributes>> {
        self.calls.push(format!("describe {}", selector));
        Ok(self.elements.get(selector).and_then(|el| el.attributes.clone()))
    }
}
