//! Playwright browser automation
//!
//! Each scenario is compiled into a standalone Node script that launches one
//! browser, replays the steps in order, and prints a single result line.

use std::path::PathBuf;
use std::process::Stdio;
use serde::Deserialize;
use tokio::process::Command as TokioCommand;
use tracing::{debug, info};

use crate::config::{Browser, HarnessConfig, Viewport};
use crate::error::{E2eError, E2eResult};
use crate::locator::js_str;
use crate::spec::{Scenario, TestStep};

/// Prefix of the line the generated script reports its outcome on
const RESULT_MARKER: &str = "@@bloglist-e2e ";

/// Playwright browser handle
pub struct PlaywrightHandle {
    /// Base URL of the frontend
    base_url: String,

    /// Node project the scripts resolve `@playwright/test` from
    node_project_dir: PathBuf,

    /// Directory for screenshots
    screenshot_dir: PathBuf,
    screenshot_on_failure: bool,

    browser: Browser,
    headless: bool,
    viewport: Viewport,

    action_timeout_ms: Option<u64>,
    expect_timeout_ms: Option<u64>,
}

/// Outcome line printed by a generated script
#[derive(Debug, Clone, Deserialize)]
struct ScriptOutcome {
    success: bool,
    #[serde(default)]
    step: usize,
    #[serde(default)]
    error: Option<String>,
}

impl PlaywrightHandle {
    pub fn new(config: &HarnessConfig) -> Self {
        Self {
            base_url: config.frontend_url.trim_end_matches('/').to_string(),
            node_project_dir: config.node_project_dir.clone(),
            screenshot_dir: config.screenshot_dir(),
            screenshot_on_failure: config.screenshot_on_failure,
            browser: config.browser,
            headless: config.headless,
            viewport: config.viewport,
            action_timeout_ms: config.action_timeout_ms,
            expect_timeout_ms: config.expect_timeout_ms,
        }
    }

    /// Check if Playwright is installed in the node project
    pub async fn check_installed(&self) -> E2eResult<()> {
        let output = TokioCommand::new("npx")
            .args(["--no-install", "playwright", "--version"])
            .current_dir(&self.node_project_dir)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match output {
            Ok(status) if status.success() => Ok(()),
            _ => Err(E2eError::PlaywrightNotFound),
        }
    }

    /// Where the failure screenshot of `scenario` is written
    pub fn failure_screenshot_path(&self, scenario: &Scenario) -> Option<PathBuf> {
        self.screenshot_on_failure
            .then(|| self.screenshot_dir.join(format!("{}-failure.png", scenario.slug())))
    }

    /// Build the Playwright script for a scenario
    pub fn build_script(&self, scenario: &Scenario) -> String {
        let mut script = String::new();

        let expect = match self.expect_timeout_ms {
            Some(ms) => format!("baseExpect.configure({{ timeout: {} }})", ms),
            None => "baseExpect".to_string(),
        };
        let action_timeout = self
            .action_timeout_ms
            .map(|ms| format!("\n  page.setDefaultTimeout({});", ms))
            .unwrap_or_default();

        // Header
        script.push_str(&format!(
            r#"// {title}
const {{ chromium, firefox, webkit, expect: baseExpect }} = require('@playwright/test');
const expect = {expect};

(async () => {{
  const browser = await {browser}.launch({{ headless: {headless} }});
  const context = await browser.newContext({{
    viewport: {{ width: {width}, height: {height} }}
  }});
  const page = await context.newPage();{action_timeout}
  let step = 0;

  try {{
"#,
            title = comment_text(&scenario.full_title()),
            expect = expect,
            browser = self.browser.as_str(),
            headless = self.headless,
            width = self.viewport.width,
            height = self.viewport.height,
            action_timeout = action_timeout,
        ));

        for (i, step) in scenario.steps.iter().enumerate() {
            script.push_str(&format!(
                "\n    // Step {}: {}\n    step = {};\n",
                i + 1,
                comment_text(&step.name()),
                i + 1
            ));
            script.push_str(&self.step_to_js(scenario, step));
            script.push('\n');
        }

        let failure_screenshot = self
            .failure_screenshot_path(scenario)
            .map(|path| {
                format!(
                    "\n    await page.screenshot({{ path: {} }}).catch(() => {{}});",
                    js_str(&path.to_string_lossy())
                )
            })
            .unwrap_or_default();

        // Footer
        script.push_str(&format!(
            r#"
    console.log('{marker}' + JSON.stringify({{ success: true, step }}));
  }} catch (error) {{{failure_screenshot}
    console.log('{marker}' + JSON.stringify({{ success: false, step, error: error.message }}));
    process.exitCode = 1;
  }} finally {{
    await browser.close();
  }}
}})();
"#,
            marker = RESULT_MARKER,
            failure_screenshot = failure_screenshot,
        ));

        script
    }

    /// Convert a step to JavaScript code
    fn step_to_js(&self, scenario: &Scenario, step: &TestStep) -> String {
        match step {
            TestStep::Goto { url } => {
                format!("    await page.goto({});", js_str(&self.resolve_url(url)))
            }
            TestStep::Fill { locator, value } => {
                format!("    await {}.fill({});", locator.to_js("page"), js_str(value))
            }
            TestStep::Click { locator, timeout_ms: Some(ms) } => {
                format!("    await {}.click({{ timeout: {} }});", locator.to_js("page"), ms)
            }
            TestStep::Click { locator, timeout_ms: None } => {
                format!("    await {}.click();", locator.to_js("page"))
            }
            TestStep::AcceptDialog => {
                "    page.once('dialog', dialog => dialog.accept());".to_string()
            }
            TestStep::ExpectVisible { locator } => {
                format!("    await expect({}).toBeVisible();", locator.to_js("page"))
            }
            TestStep::ExpectHidden { locator } => {
                format!("    await expect({}).not.toBeVisible();", locator.to_js("page"))
            }
            TestStep::ExpectContainsText { locator, text } => {
                format!(
                    "    await expect({}).toContainText({});",
                    locator.to_js("page"),
                    js_str(text)
                )
            }
            TestStep::Screenshot { name, full_page } => {
                let path = self
                    .screenshot_dir
                    .join(format!("{}-{}.png", scenario.slug(), name));
                format!(
                    "    await page.screenshot({{ path: {}, fullPage: {} }});",
                    js_str(&path.to_string_lossy()),
                    full_page
                )
            }
            TestStep::Log { message } => {
                format!("    console.log({});", js_str(&format!("[TEST] {}", message)))
            }
        }
    }

    fn resolve_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else if url.starts_with('/') {
            format!("{}{}", self.base_url, url)
        } else {
            format!("{}/{}", self.base_url, url)
        }
    }

    /// Run a scenario in a fresh browser.
    ///
    /// Returns [`E2eError::StepFailed`] naming the first step that failed.
    pub async fn run(&self, scenario: &Scenario) -> E2eResult<()> {
        if self.screenshot_on_failure
            || scenario.steps.iter().any(|s| matches!(s, TestStep::Screenshot { .. }))
        {
            std::fs::create_dir_all(&self.screenshot_dir)?;
        }

        let script = self.build_script(scenario);
        let stdout = self.run_script(&script).await?;

        let outcome = parse_outcome(&stdout).ok_or_else(|| {
            E2eError::Playwright(format!("script produced no result line:\n{}", stdout))
        })?;

        if outcome.success {
            return Ok(());
        }

        let step = outcome
            .step
            .checked_sub(1)
            .and_then(|i| scenario.steps.get(i))
            .map(TestStep::name)
            .unwrap_or_else(|| "browser setup".to_string());

        Err(E2eError::StepFailed {
            index: outcome.step,
            step,
            reason: outcome.error.unwrap_or_else(|| "unknown error".to_string()),
        })
    }

    /// Execute a script with node and return its stdout.
    ///
    /// A non-zero exit without a result line (e.g. the browser failed to
    /// launch) is reported as a Playwright error carrying stderr.
    pub async fn run_script(&self, script: &str) -> E2eResult<String> {
        // Inside the node project so require() resolves its node_modules
        let temp_dir = tempfile::Builder::new()
            .prefix(".bloglist-e2e-")
            .tempdir_in(&self.node_project_dir)?;
        let script_path = temp_dir.path().join("scenario.js");
        std::fs::write(&script_path, script)?;

        debug!("Running Playwright script: {}", script_path.display());

        let output = TokioCommand::new("node")
            .arg(&script_path)
            .current_dir(&self.node_project_dir)
            .output()
            .await?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        for line in stdout.lines().filter(|l| l.starts_with("[TEST]")) {
            info!("{}", line);
        }

        if !output.status.success() && parse_outcome(&stdout).is_none() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(E2eError::Playwright(format!(
                "Script failed:\nstdout: {}\nstderr: {}",
                stdout, stderr
            )));
        }

        Ok(stdout)
    }
}

/// Text safe to place in a `//` comment: every JS line terminator becomes a space
fn comment_text(text: &str) -> String {
    text.replace(['\n', '\r', '\u{2028}', '\u{2029}'], " ")
}

fn parse_outcome(stdout: &str) -> Option<ScriptOutcome> {
    stdout
        .lines()
        .rev()
        .find_map(|line| line.strip_prefix(RESULT_MARKER))
        .and_then(|json| serde_json::from_str(json).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::Locator;
    use crate::page::Page;

    fn handle(config: HarnessConfig) -> PlaywrightHandle {
        PlaywrightHandle::new(&config)
    }

    fn scenario(page: Page) -> Scenario {
        Scenario {
            title: "t".into(),
            describe: vec!["Blog app".into()],
            tags: vec![],
            users: vec![],
            steps: page.into_steps(),
        }
    }

    #[test]
    fn script_replays_steps_in_order() {
        let mut page = Page::new();
        page.goto("/")
            .fill(Locator::test_id("username-input"), "user")
            .click(Locator::button("Login"))
            .expect_visible(Locator::text("Name logged in"));

        let script = handle(HarnessConfig::default()).build_script(&scenario(page));

        let goto = script.find(r#"await page.goto("http://localhost:5173/");"#).unwrap();
        let fill = script
            .find(r#"await page.getByTestId("username-input").fill("user");"#)
            .unwrap();
        let click = script
            .find(r#"await page.getByRole("button", { name: "Login" }).click();"#)
            .unwrap();
        let expect = script
            .find(r#"await expect(page.getByText("Name logged in")).toBeVisible();"#)
            .unwrap();
        assert!(goto < fill && fill < click && click < expect);
        assert!(script.contains("step = 4;"));
        assert!(script.contains("chromium.launch({ headless: true })"));
        assert!(script.contains("const expect = baseExpect;"));
    }

    #[test]
    fn hidden_assertion_and_one_shot_dialog() {
        let mut page = Page::new();
        page.accept_next_dialog()
            .click(Locator::button("delete"))
            .expect_hidden(Locator::text("Title - Author"));

        let script = handle(HarnessConfig::default()).build_script(&scenario(page));
        assert!(script.contains("page.once('dialog', dialog => dialog.accept());"));
        assert!(!script.contains("page.on('dialog'"));
        assert!(script.contains(
            r#"await expect(page.getByText("Title - Author")).not.toBeVisible();"#
        ));
    }

    #[test]
    fn configured_timeouts_and_browser_are_applied() {
        let config = HarnessConfig {
            browser: Browser::Firefox,
            headless: false,
            action_timeout_ms: Some(7000),
            expect_timeout_ms: Some(9000),
            ..Default::default()
        };
        let mut page = Page::new();
        page.goto("/");

        let script = handle(config).build_script(&scenario(page));
        assert!(script.contains("firefox.launch({ headless: false })"));
        assert!(script.contains("page.setDefaultTimeout(7000);"));
        assert!(script.contains("baseExpect.configure({ timeout: 9000 })"));
    }

    #[test]
    fn failure_screenshot_is_optional() {
        let mut page = Page::new();
        page.goto("/");
        let s = scenario(page);

        let with = handle(HarnessConfig::default());
        assert!(with.build_script(&s).contains("-failure.png"));

        let without = handle(HarnessConfig {
            screenshot_on_failure: false,
            ..Default::default()
        });
        assert!(without.failure_screenshot_path(&s).is_none());
        assert!(!without.build_script(&s).contains("-failure.png"));
    }

    #[test]
    fn urls_resolve_against_frontend() {
        let pw = handle(HarnessConfig {
            frontend_url: "http://localhost:5173/".into(),
            ..Default::default()
        });
        assert_eq!(pw.resolve_url("/"), "http://localhost:5173/");
        assert_eq!(pw.resolve_url("blogs/1"), "http://localhost:5173/blogs/1");
        assert_eq!(pw.resolve_url("https://example.com"), "https://example.com");
    }

    #[test]
    fn outcome_is_read_from_last_marker_line() {
        let stdout = concat!(
            "[TEST] hello\n",
            "@@bloglist-e2e {\"success\":false,\"step\":3,\"error\":\"Timeout 5000ms exceeded\"}\n",
        );
        let outcome = parse_outcome(stdout).unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.step, 3);
        assert_eq!(outcome.error.as_deref(), Some("Timeout 5000ms exceeded"));

        assert!(parse_outcome("no marker here").is_none());
    }

    #[test]
    fn failure_screenshot_is_named_after_scenario() {
        let mut page = Page::new();
        page.goto("/");
        let s = scenario(page);

        let path = handle(HarnessConfig::default()).failure_screenshot_path(&s).unwrap();
        assert_eq!(
            path,
            PathBuf::from("test-results/screenshots/blog-app-t-failure.png")
        );
    }

    #[test]
    fn line_terminators_in_titles_stay_inside_comments() {
        let mut page = Page::new();
        page.goto("/").log("first\u{2028}second");
        let mut s = scenario(page);
        s.title = "a\rrequire('x')+\u{2029}b".into();

        let script = handle(HarnessConfig::default()).build_script(&s);
        assert!(!script.contains('\r'));
        assert!(script.starts_with("// Blog app › a require('x')+ b\n"));
        for line in script.lines().filter(|l| l.trim_start().starts_with("//")) {
            assert!(!line.contains('\u{2028}') && !line.contains('\u{2029}'), "{line:?}");
        }
    }

    #[tokio::test]
    async fn missing_node_project_means_playwright_not_found() {
        let config = HarnessConfig {
            node_project_dir: PathBuf::from("/nonexistent/bloglist-frontend"),
            ..HarnessConfig::default()
        };
        let err = handle(config).check_installed().await.unwrap_err();
        assert!(matches!(err, E2eError::PlaywrightNotFound));
    }
}
