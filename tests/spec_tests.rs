use ui_coverage::coverage::actions::{ActionConfig, CoverageActions};
use ui_coverage::coverage::registry::SharedRegistry;
use ui_coverage::spec::context::TestContext;
use ui_coverage::spec::runner::TestRunner;
use ui_coverage::spec::spec_model::{AssertionResult, AssertionSpec, TestSpec, TestStep};

mod common;
use crate::common::fake_driver::FakeDriver;
use crate::common::utils::{payload, scanned};

// =========================================================================
// Helpers
// =========================================================================

const TEXT_BOX_YAML: &str = r##"
name: Text box form
start_url: https://demoqa.com/text-box
steps:
  - action: wait_for
    selector: "#userName"
    description: Full Name input field
  - action: fill
    selector: "#userName"
    value: John Doe
    description: Full Name field
  - action: click
    selector: "#submit"
    description: Submit button
  - action: check_visible
    selector: "#output"
    description: Results output section
  - action: assert
    assertions:
      - type: element_visible
        selector: "#output"
      - type: element_text
        selector: "#name"
        expected: John Doe
      - type: url_contains
        expected: text-box
"##;

fn text_box_page() -> FakeDriver {
    FakeDriver::new()
        .with_scan(payload(vec![
            scanned("input", "INPUT", Some("userName"), None, true),
            scanned("button", "BUTTON", Some("submit"), Some("Submit"), true),
            scanned("textarea", "TEXTAREA", Some("currentAddress"), None, true),
            scanned("[id]", "DIV", Some("output"), None, false),
        ]))
        .with_element("#userName", "INPUT", Some("userName"), true)
        .with_element("#submit", "BUTTON", Some("submit"), true)
        .with_element("#output", "DIV", Some("output"), true)
        .with_element("#name", "P", Some("name"), true)
        .with_text("#name", "Name:John Doe")
}

fn actions() -> (SharedRegistry, CoverageActions) {
    let registry = SharedRegistry::new();
    (registry.clone(), CoverageActions::new(registry, ActionConfig::default()))
}

// =========================================================================
// YAML model
// =========================================================================

#[test]
fn spec_parses_from_yaml() {
    let spec: TestSpec = serde_yaml::from_str(TEXT_BOX_YAML).unwrap();
    assert_eq!(spec.name, "Text box form");
    assert_eq!(spec.steps.len(), 5);
    assert_eq!(
        spec.steps[1],
        TestStep::Fill {
            selector: "#userName".into(),
            value: "John Doe".into(),
            description: "Full Name field".into(),
        }
    );
    match &spec.steps[4] {
        TestStep::Assert { assertions } => assert_eq!(assertions.len(), 3),
        other => panic!("expected assert step, got {:?}", other),
    }
}

#[test]
fn navigate_page_name_is_optional() {
    let step: TestStep = serde_yaml::from_str("action: navigate\nurl: https://demoqa.com/buttons\n").unwrap();
    assert_eq!(
        step,
        TestStep::Navigate {
            url: "https://demoqa.com/buttons".into(),
            page_name: None,
        }
    );
}

#[test]
fn unknown_action_is_rejected() {
    let result: Result<TestStep, _> = serde_yaml::from_str("action: hover\nselector: '#a'\n");
    assert!(result.is_err());
}

// =========================================================================
// Runner
// =========================================================================

#[test]
fn runner_passes_and_records_coverage() {
    let spec: TestSpec = serde_yaml::from_str(TEXT_BOX_YAML).unwrap();
    let (registry, actions) = actions();
    let mut driver = text_box_page();

    let result = TestRunner::run(&spec, &mut driver, &actions);

    assert!(result.passed, "{:?}", result);
    assert_eq!(result.steps_run, 5);
    assert_eq!(result.assertion_results.len(), 3);
    assert!(result.error.is_none());

    // userName, submit, currentAddress discovered; #output was hidden during the scan
    let snapshot = registry.snapshot();
    assert_eq!(snapshot.discovered().len(), 3);
    // filled, clicked, and the output seen visible later
    assert_eq!(snapshot.exercised().len(), 3);
    assert_eq!(registry.report().unmatched().len(), 1);
}

#[test]
fn required_step_failure_halts_test() {
    let spec = TestSpec {
        name: "Broken".into(),
        start_url: "https://demo.test".into(),
        steps: vec![
            TestStep::Click {
                selector: "#missing".into(),
                description: "Missing".into(),
            },
            TestStep::Click {
                selector: "#submit".into(),
                description: "Submit".into(),
            },
        ],
    };
    let (registry, actions) = actions();
    let mut driver = text_box_page();

    let result = TestRunner::run(&spec, &mut driver, &actions);

    assert!(!result.passed);
    assert_eq!(result.steps_run, 1);
    assert!(result.error.as_deref().unwrap().contains("Element not clickable: #missing"));
    assert!(!driver.called("click #submit Left"));
    assert_eq!(registry.exercised_count(), 0);
}

#[test]
fn optional_step_failure_does_not_fail_test() {
    let spec = TestSpec {
        name: "Buttons".into(),
        start_url: "https://demoqa.com/buttons".into(),
        steps: vec![
            TestStep::DoubleClick {
                selector: "#doubleClickBtn".into(),
                description: "Double Click Button".into(),
            },
            TestStep::CheckVisible {
                selector: "#doubleClickMessage".into(),
                description: "Double Click Message".into(),
            },
            TestStep::Click {
                selector: "#submit".into(),
                description: "Submit".into(),
            },
        ],
    };
    let (_registry, actions) = actions();
    let mut driver = text_box_page();

    let result = TestRunner::run(&spec, &mut driver, &actions);

    assert!(result.passed);
    assert_eq!(result.steps_run, 3);
    assert_eq!(result.soft_failures.len(), 2);
    assert!(result.soft_failures[0].starts_with("Step 0: double_click 'Double Click Button' skipped"));
    assert_eq!(result.soft_failures[1], "Step 1: check_visible 'Double Click Message' not visible");
}

#[test]
fn failed_assertion_fails_test_without_error() {
    let spec = TestSpec {
        name: "Assertions".into(),
        start_url: "https://demoqa.com/text-box".into(),
        steps: vec![TestStep::Assert {
            assertions: vec![
                AssertionSpec::ElementText {
                    selector: "#name".into(),
                    expected: "Jane".into(),
                },
                AssertionSpec::ElementText {
                    selector: "#email".into(),
                    expected: "jane@example.com".into(),
                },
                AssertionSpec::UrlContains {
                    expected: "/buttons".into(),
                },
            ],
        }],
    };
    let (_registry, actions) = actions();
    let mut driver = text_box_page();

    let result = TestRunner::run(&spec, &mut driver, &actions);

    assert!(!result.passed);
    assert!(result.error.is_none());
    let messages: Vec<_> = result
        .assertion_results
        .iter()
        .map(|r| r.message.clone().unwrap_or_default())
        .collect();
    assert_eq!(
        messages,
        vec![
            "Element '#name' text does not contain 'Jane'".to_string(),
            "Element '#email' not found on page".to_string(),
            "URL does not contain '/buttons'".to_string(),
        ]
    );
}

#[test]
fn page_failure_fails_only_that_spec() {
    let first = TestSpec {
        name: "Text box".into(),
        start_url: "https://demoqa.com/text-box".into(),
        steps: vec![TestStep::Click {
            selector: "#submit".into(),
            description: "Submit".into(),
        }],
    };
    let second = TestSpec {
        name: "Buttons".into(),
        start_url: "https://demoqa.com/buttons".into(),
        steps: vec![],
    };
    let (registry, actions) = actions();
    let mut driver = text_box_page().with_page_limit(1);

    let results = TestRunner::run_all(&[first, second], &mut driver, &actions);

    assert_eq!(results.len(), 2);
    assert!(results[0].passed, "{:?}", results[0]);
    assert!(!results[1].passed);
    assert_eq!(results[1].steps_run, 0);
    let error = results[1].error.as_deref().unwrap();
    assert!(error.starts_with("Failed to open a fresh page:"), "{}", error);
    assert!(error.contains("new_page"));
    assert!(!driver.called("navigate https://demoqa.com/buttons"));
    // coverage from the first spec survives
    assert_eq!(registry.discovered_count(), 3);
    assert_eq!(registry.exercised_count(), 1);
}

#[test]
fn every_spec_gets_a_fresh_page() {
    let spec: TestSpec = serde_yaml::from_str(TEXT_BOX_YAML).unwrap();
    let (_registry, actions) = actions();
    let mut driver = text_box_page();

    let results = TestRunner::run_all(&[spec.clone(), spec], &mut driver, &actions);

    assert!(results.iter().all(|r| r.passed));
    assert_eq!(driver.pages_opened, 2);
    assert_eq!(driver.calls[0], "new_page");
}

// =========================================================================
// TestContext
// =========================================================================

#[test]
fn context_counts_failures() {
    let mut ctx = TestContext::new();
    assert!(ctx.all_passed());
    ctx.record_assertions(vec![
        AssertionResult {
            step_index: 0,
            spec: AssertionSpec::UrlContains { expected: "a".into() },
            passed: true,
            actual: Some("a".into()),
            message: None,
        },
        AssertionResult {
            step_index: 0,
            spec: AssertionSpec::UrlContains { expected: "b".into() },
            passed: false,
            actual: Some("a".into()),
            message: Some("URL does not contain 'b'".into()),
        },
    ]);
    assert!(!ctx.all_passed());
    assert_eq!(ctx.fail_count(), 1);
}
