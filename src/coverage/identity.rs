use std::fmt;

use serde::{Deserialize, Serialize};

/// Attribute that marks an element with an explicit test id.
pub const TEST_ID_ATTRIBUTE: &str = "data-testid";

/// Number of characters of trimmed visible text kept in a text identifier.
pub const TEXT_PREFIX_CHARS: usize = 30;

/// Opaque identifier for one interactive element during a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementIdentifier(String);

impl ElementIdentifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ElementIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementIdentifier {
    fn from(value: &str) -> Self {
        ElementIdentifier(value.to_string())
    }
}

impl From<String> for ElementIdentifier {
    fn from(value: String) -> Self {
        ElementIdentifier(value)
    }
}

/// Raw attributes read from a DOM element inside the page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementAttributes {
    /// `tagName` as the DOM reports it (upper case for HTML documents)
    pub tag: String,
    #[serde(default)]
    pub test_id: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// Which branch of the priority chain produced an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentitySource {
    TestId,
    Id,
    Text,
    /// Random suffix; not reproducible across scans
    Fallback,
}

impl IdentitySource {
    pub fn is_stable(self) -> bool {
        !matches!(self, IdentitySource::Fallback)
    }
}

/// Derive an identifier from element attributes, first match wins:
/// test id, non-blank `id`, non-blank text, then `selector:<random>`.
pub fn derive(attributes: &ElementAttributes, selector: &str) -> (ElementIdentifier, IdentitySource) {
    if let Some(test_id) = attributes.test_id.as_deref().filter(|v| !v.is_empty()) {
        return (
            ElementIdentifier(format!("{}:{}", TEST_ID_ATTRIBUTE, test_id)),
            IdentitySource::TestId,
        );
    }

    if let Some(id) = attributes.id.as_deref().filter(|v| !v.trim().is_empty()) {
        return (ElementIdentifier(format!("id:{}", id)), IdentitySource::Id);
    }

    if let Some(text) = attributes.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        let prefix: String = text.chars().take(TEXT_PREFIX_CHARS).collect();
        return (
            ElementIdentifier(format!("{}:text={}", attributes.tag, prefix)),
            IdentitySource::Text,
        );
    }

    (
        ElementIdentifier(format!("{}:{}", selector, random_suffix())),
        IdentitySource::Fallback,
    )
}

/// Identifier for an element found through `selector`.
pub fn identify(attributes: &ElementAttributes, selector: &str) -> ElementIdentifier {
    derive(attributes, selector).0
}

/// Identifier used by action wrappers in legacy mode: `selector::description`.
pub fn action_identifier(selector: &str, description: Option<&str>) -> ElementIdentifier {
    ElementIdentifier(format!("{}::{}", selector, description.unwrap_or("element")))
}

fn random_suffix() -> String {
    let mut suffix = uuid::Uuid::new_v4().simple().to_string();
    suffix.truncate(6);
    suffix
}
