use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use crate::coverage::identity::ElementIdentifier;
use crate::report::report_model::CoverageReport;

// ============================================================================
// Coverage registry: discovered vs exercised element identifiers
// ============================================================================

/// Records which elements were discovered on visited pages and which ones a
/// test actually interacted with. Entries only grow until `reset()`.
#[derive(Debug, Clone, Default)]
pub struct CoverageRegistry {
    discovered: BTreeSet<ElementIdentifier>,
    exercised: BTreeSet<ElementIdentifier>,
}

impl CoverageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an element found by the page scanner. Returns `true` if it was new.
    pub fn add_discovered(&mut self, id: ElementIdentifier) -> bool {
        self.discovered.insert(id)
    }

    /// Record an element as exercised. Not required to be discovered first.
    pub fn mark_exercised(&mut self, id: ElementIdentifier) -> bool {
        self.exercised.insert(id)
    }

    pub fn discovered(&self) -> &BTreeSet<ElementIdentifier> {
        &self.discovered
    }

    pub fn exercised(&self) -> &BTreeSet<ElementIdentifier> {
        &self.exercised
    }

    /// `|exercised| / |discovered| * 100`, `0.0` when nothing was discovered.
    ///
    /// Uses raw set sizes. Exercised identifiers that were never discovered
    /// still count, so the ratio is capped at 100.
    pub fn coverage_percentage(&self) -> f64 {
        coverage_percentage(self.discovered.len(), self.exercised.len())
    }

    /// Clear both sets for a fresh measurement.
    pub fn reset(&mut self) {
        self.discovered.clear();
        self.exercised.clear();
    }

    /// Snapshot the registry into a report. The sets are copied.
    pub fn report(&self) -> CoverageReport {
        CoverageReport::generate(&self.discovered, &self.exercised)
    }
}

pub(crate) fn coverage_percentage(discovered: usize, exercised: usize) -> f64 {
    if discovered == 0 {
        return 0.0;
    }
    (exercised as f64 / discovered as f64 * 100.0).min(100.0)
}

// ============================================================================
// Shared handle
// ============================================================================

/// Cloneable, lock-protected handle to a registry.
///
/// Scanner and action wrappers receive this handle explicitly. Each mutator
/// takes the lock for one insert, so parallel test cases may share a handle.
#[derive(Debug, Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<Mutex<CoverageRegistry>>,
}

static GLOBAL: OnceLock<SharedRegistry> = OnceLock::new();

impl SharedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry, created on first access.
    pub fn global() -> &'static SharedRegistry {
        GLOBAL.get_or_init(SharedRegistry::new)
    }

    // A panic inside a test body must not take coverage data down with it.
    fn lock(&self) -> MutexGuard<'_, CoverageRegistry> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_discovered(&self, id: ElementIdentifier) -> bool {
        self.lock().add_discovered(id)
    }

    pub fn mark_exercised(&self, id: ElementIdentifier) -> bool {
        self.lock().mark_exercised(id)
    }

    pub fn coverage_percentage(&self) -> f64 {
        self.lock().coverage_percentage()
    }

    pub fn reset(&self) {
        self.lock().reset();
    }

    pub fn discovered_count(&self) -> usize {
        self.lock().discovered().len()
    }

    pub fn exercised_count(&self) -> usize {
        self.lock().exercised().len()
    }

    /// Copy of the current registry state.
    pub fn snapshot(&self) -> CoverageRegistry {
        self.lock().clone()
    }

    pub fn report(&self) -> CoverageReport {
        self.lock().report()
    }
}
