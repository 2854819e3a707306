use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::coverage::identity::ElementIdentifier;
use crate::coverage::registry::coverage_percentage;

// ============================================================================
// Coverage report: read-only snapshot of the registry
// ============================================================================

/// Coverage numbers plus copies of the underlying sets.
///
/// Built via `generate()` at the end of a run. Consumed by the console,
/// HTML and JSON renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageReport {
    /// Number of distinct discovered elements
    pub total_discovered: usize,

    /// Number of distinct exercised elements
    pub total_exercised: usize,

    /// exercised / discovered * 100, in [0, 100]
    pub percentage: f64,

    /// discovered - exercised, floored at 0
    pub uncovered: usize,

    pub discovered: BTreeSet<ElementIdentifier>,

    pub exercised: BTreeSet<ElementIdentifier>,
}

/// One discovered element and whether a test exercised it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementStatus<'a> {
    pub id: &'a ElementIdentifier,
    pub exercised: bool,
}

impl CoverageReport {
    pub fn generate(
        discovered: &BTreeSet<ElementIdentifier>,
        exercised: &BTreeSet<ElementIdentifier>,
    ) -> Self {
        Self {
            total_discovered: discovered.len(),
            total_exercised: exercised.len(),
            percentage: coverage_percentage(discovered.len(), exercised.len()),
            uncovered: discovered.len().saturating_sub(exercised.len()),
            discovered: discovered.clone(),
            exercised: exercised.clone(),
        }
    }

    /// Every discovered element, flagged covered or not, sorted by identifier.
    pub fn entries(&self) -> Vec<ElementStatus<'_>> {
        self.discovered
            .iter()
            .map(|id| ElementStatus {
                id,
                exercised: self.exercised.contains(id),
            })
            .collect()
    }

    /// Exercised identifiers that no scan discovered.
    pub fn unmatched(&self) -> Vec<&ElementIdentifier> {
        self.exercised.difference(&self.discovered).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.discovered.is_empty() && self.exercised.is_empty()
    }
}
