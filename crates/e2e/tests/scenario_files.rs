//! Shipped YAML scenarios parse and compile to Playwright scripts

use std::path::PathBuf;

use bloglist_e2e::playwright::PlaywrightHandle;
use bloglist_e2e::{HarnessConfig, Scenario, TestStep};

fn scenarios_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios")
}

#[test]
fn shipped_scenarios_load() {
    let scenarios = Scenario::load_all(&scenarios_dir()).expect("load scenarios");
    assert!(!scenarios.is_empty());

    for scenario in &scenarios {
        assert_eq!(
            scenario.steps.first(),
            Some(&TestStep::Goto { url: "/".into() }),
            "{} must start at the application root",
            scenario.full_title()
        );
        assert!(!scenario.users.is_empty(), "{} seeds no users", scenario.full_title());
    }
}

#[test]
fn logout_scenario_compiles() {
    let scenario = Scenario::from_file(&scenarios_dir().join("logout.yaml")).unwrap();
    let script = PlaywrightHandle::new(&HarnessConfig::default()).build_script(&scenario);

    assert!(script.contains(r#"await page.getByRole("button", { name: "Logout" }).click();"#));
    assert!(script.contains(concat!(
        r#"await expect(page.getByTestId("login-form")"#,
        r#".getByText("Log in to application")).toBeVisible();"#
    )));
    assert!(script.contains(&format!("step = {};", scenario.steps.len())));
}
