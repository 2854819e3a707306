use serde::{Deserialize, Serialize};

/// A UI test, usually deserialized from YAML.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestSpec {
    /// Human-readable name for this test
    pub name: String,

    /// URL navigated to (and scanned) before executing steps
    pub start_url: String,

    /// Ordered list of test steps to execute
    pub steps: Vec<TestStep>,
}

/// A single step in a test spec.
///
/// `click`, `fill` and `wait_for` are required: a failure stops the test.
/// `double_click`, `right_click` and `check_visible` are optional: a failure
/// is recorded and the test continues.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TestStep {
    /// Navigate to a URL and scan it for interactive elements
    Navigate {
        url: String,
        #[serde(default)]
        page_name: Option<String>,
    },

    Click {
        selector: String,
        description: String,
    },

    DoubleClick {
        selector: String,
        description: String,
    },

    RightClick {
        selector: String,
        description: String,
    },

    Fill {
        selector: String,
        value: String,
        description: String,
    },

    /// Wait until an element is attached and visible
    WaitFor {
        selector: String,
        description: String,
    },

    CheckVisible {
        selector: String,
        description: String,
    },

    /// Wait for the page to settle
    Wait {
        duration_ms: u64,
    },

    /// Run assertions against the current page state
    Assert {
        assertions: Vec<AssertionSpec>,
    },
}

/// A single assertion to evaluate against the page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssertionSpec {
    /// Current URL contains the expected substring
    UrlContains { expected: String },

    /// A specific element is visible on the page
    ElementVisible { selector: String },

    /// A specific element's text contains the expected string
    ElementText { selector: String, expected: String },
}

/// Result of evaluating a single assertion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssertionResult {
    /// Which step this assertion belongs to (0-indexed)
    pub step_index: usize,

    pub spec: AssertionSpec,

    pub passed: bool,

    /// Actual value found (for debugging failed assertions)
    pub actual: Option<String>,

    /// Human-readable failure message
    pub message: Option<String>,
}

/// Result of running a complete test spec.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub spec_name: String,

    /// Whether all required steps and assertions passed
    pub passed: bool,

    /// Number of steps that were executed
    pub steps_run: usize,

    pub assertion_results: Vec<AssertionResult>,

    /// Optional steps that did not complete
    #[serde(default)]
    pub soft_failures: Vec<String>,

    /// Error message if a required step failed
    pub error: Option<String>,
}
