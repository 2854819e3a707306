use tracing::{error, info};

use crate::browser::driver::PageDriver;
use crate::coverage::actions::{ActionOutcome, CoverageActions};
use crate::error::Result;
use crate::spec::context::TestContext;
use crate::spec::spec_model::{AssertionResult, AssertionSpec, TestResult, TestSpec, TestStep};

/// Executes a TestSpec step-by-step through coverage-recording actions.
pub struct TestRunner;

impl TestRunner {
    /// Run a complete test spec against a page.
    ///
    /// A failed required step ends the test with `error` set. Skipped optional
    /// steps are listed in `soft_failures` and do not fail the test.
    pub fn run(spec: &TestSpec, driver: &mut dyn PageDriver, actions: &CoverageActions) -> TestResult {
        let mut ctx = TestContext::new();
        info!(test = %spec.name, "Running test");

        if let Err(e) = actions.navigate(driver, &spec.start_url, &spec.name) {
            return Self::finish(spec, ctx, 0, Some(format!("Failed to navigate to start_url: {}", e)));
        }

        for (i, step) in spec.steps.iter().enumerate() {
            if let Err(e) = Self::execute_step(step, i, driver, actions, &mut ctx) {
                return Self::finish(spec, ctx, i + 1, Some(format!("Step {} failed: {}", i, e)));
            }
        }

        Self::finish(spec, ctx, spec.steps.len(), None)
    }

    /// Run every spec on a fresh page, sharing `actions` (and its registry).
    ///
    /// A spec whose page cannot be opened fails with `error` set; the rest
    /// still run.
    pub fn run_all(
        specs: &[TestSpec],
        driver: &mut dyn PageDriver,
        actions: &CoverageActions,
    ) -> Vec<TestResult> {
        let mut results = Vec::with_capacity(specs.len());
        for spec in specs {
            if let Err(e) = driver.new_page() {
                error!(test = %spec.name, error = %e, "Could not open a fresh page");
                let message = format!("Failed to open a fresh page: {}", e);
                results.push(Self::finish(spec, TestContext::new(), 0, Some(message)));
                continue;
            }
            results.push(Self::run(spec, driver, actions));
        }
        results
    }

    fn finish(spec: &TestSpec, ctx: TestContext, steps_run: usize, error: Option<String>) -> TestResult {
        info!(
            test = %spec.name,
            steps_run,
            failed_assertions = ctx.fail_count(),
            soft_failures = ctx.soft_failures.len(),
            "Test finished"
        );
        TestResult {
            spec_name: spec.name.clone(),
            passed: error.is_none() && ctx.all_passed(),
            steps_run,
            assertion_results: ctx.assertion_results,
            soft_failures: ctx.soft_failures,
            error,
        }
    }

    fn execute_step(
        step: &TestStep,
        step_index: usize,
        driver: &mut dyn PageDriver,
        actions: &CoverageActions,
        ctx: &mut TestContext,
    ) -> Result<()> {
        match step {
            TestStep::Navigate { url, page_name } => {
                let name = page_name.as_deref().unwrap_or(url);
                actions.navigate(driver, url, name).map(|_| ())
            }

            TestStep::Click { selector, description } => {
                actions.click(driver, selector, description).map(|_| ())
            }

            TestStep::Fill { selector, value, description } => {
                actions.fill(driver, selector, value, description).map(|_| ())
            }

            TestStep::WaitFor { selector, description } => {
                actions.wait_for_element(driver, selector, description)
            }

            TestStep::DoubleClick { selector, description } => {
                let outcome = actions.double_click(driver, selector, description);
                Self::record_outcome(ctx, step_index, "double_click", description, outcome);
                Ok(())
            }

            TestStep::RightClick { selector, description } => {
                let outcome = actions.right_click(driver, selector, description);
                Self::record_outcome(ctx, step_index, "right_click", description, outcome);
                Ok(())
            }

            TestStep::CheckVisible { selector, description } => {
                let outcome = actions.check_visible(driver, selector, description);
                Self::record_outcome(ctx, step_index, "check_visible", description, outcome);
                Ok(())
            }

            TestStep::Wait { duration_ms } => driver.pause(*duration_ms),

            TestStep::Assert { assertions } => {
                let results = assertions
                    .iter()
                    .map(|spec| Self::evaluate_one(spec, step_index, driver))
                    .collect();
                ctx.record_assertions(results);
                Ok(())
            }
        }
    }

    fn record_outcome(
        ctx: &mut TestContext,
        step_index: usize,
        action: &str,
        description: &str,
        outcome: ActionOutcome,
    ) {
        match outcome {
            ActionOutcome::Performed(_) => {}
            ActionOutcome::NotVisible => ctx.record_soft_failure(format!(
                "Step {}: {} '{}' not visible",
                step_index, action, description
            )),
            ActionOutcome::Skipped { reason } => ctx.record_soft_failure(format!(
                "Step {}: {} '{}' skipped: {}",
                step_index, action, description, reason
            )),
        }
    }

    /// Evaluate a single assertion.
    fn evaluate_one(spec: &AssertionSpec, step_index: usize, driver: &mut dyn PageDriver) -> AssertionResult {
        let checked = match spec {
            AssertionSpec::UrlContains { expected } => driver.current_url().map(|url| {
                let passed = url.contains(expected.as_str());
                let message = (!passed).then(|| format!("URL does not contain '{}'", expected));
                (passed, Some(url), message)
            }),

            AssertionSpec::ElementVisible { selector } => {
                driver.is_visible(selector, 0).map(|visible| {
                    let message = (!visible).then(|| format!("Element '{}' is not visible", selector));
                    (visible, Some(visible.to_string()), message)
                })
            }

            AssertionSpec::ElementText { selector, expected } => {
                driver.text_content(selector).map(|text| match text {
                    Some(text) => {
                        let passed = text.to_lowercase().contains(&expected.to_lowercase());
                        let message = (!passed).then(|| {
                            format!("Element '{}' text does not contain '{}'", selector, expected)
                        });
                        (passed, Some(text), message)
                    }
                    None => (false, None, Some(format!("Element '{}' not found on page", selector))),
                })
            }
        };

        match checked {
            Ok((passed, actual, message)) => AssertionResult {
                step_index,
                spec: spec.clone(),
                passed,
                actual,
                message,
            },
            Err(e) => AssertionResult {
                step_index,
                spec: spec.clone(),
                passed: false,
                actual: None,
                message: Some(format!("Failed to query page: {}", e)),
            },
        }
    }
}
