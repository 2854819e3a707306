use crate::spec::spec_model::AssertionResult;

/// Tracks the execution state and results of a running test.
#[derive(Debug, Clone, Default)]
pub struct TestContext {
    pub assertion_results: Vec<AssertionResult>,

    /// Optional steps that were skipped, formatted for display
    pub soft_failures: Vec<String>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_assertions(&mut self, results: Vec<AssertionResult>) {
        self.assertion_results.extend(results);
    }

    pub fn record_soft_failure(&mut self, message: String) {
        self.soft_failures.push(message);
    }

    pub fn all_passed(&self) -> bool {
        self.assertion_results.iter().all(|r| r.passed)
    }

    pub fn fail_count(&self) -> usize {
        self.assertion_results.iter().filter(|r| !r.passed).count()
    }
}
