//! Main test runner: reset, seed, and replay each scenario in a browser

use std::path::PathBuf;
use std::time::Instant;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::api::TestingApi;
use crate::config::HarnessConfig;
use crate::error::{E2eError, E2eResult};
use crate::playwright::PlaywrightHandle;
use crate::server::ServerHandle;
use crate::spec::Scenario;

/// Result of running a single test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub title: String,
    pub success: bool,
    pub duration_ms: u64,
    /// 1-based index of the failing step, if a step failed
    pub failed_step: Option<usize>,
    pub error: Option<String>,
    pub screenshot: Option<PathBuf>,
}

/// Result of running all tests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuiteResult {
    pub run_started_at: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub results: Vec<TestResult>,
}

impl TestSuiteResult {
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Main E2E test runner
pub struct TestRunner {
    config: HarnessConfig,
    api: TestingApi,
    playwright: PlaywrightHandle,

    /// Managed processes, stopped when the runner is dropped
    servers: Vec<ServerHandle>,
}

impl TestRunner {
    pub fn new(config: HarnessConfig) -> E2eResult<Self> {
        config.validate()?;
        let api = TestingApi::new(&config.backend_url)?;
        let playwright = PlaywrightHandle::new(&config);

        Ok(Self {
            config,
            api,
            playwright,
            servers: Vec::new(),
        })
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Start configured servers and verify Playwright is available
    pub async fn prepare(&mut self) -> E2eResult<()> {
        self.playwright.check_installed().await?;

        for server in &self.config.servers {
            if self.servers.iter().any(|s| s.name() == server.name) {
                continue; // Already running
            }
            let handle = ServerHandle::spawn(server).await?;
            self.servers.push(handle);
        }
        Ok(())
    }

    /// Stop managed servers
    pub fn stop_servers(&mut self) -> E2eResult<()> {
        for mut server in self.servers.drain(..) {
            server.stop()?;
        }
        Ok(())
    }

    /// The built-in suite followed by any scenarios from `scenarios_dir`
    pub fn collect_scenarios(&self) -> E2eResult<Vec<Scenario>> {
        let mut scenarios = crate::scenarios::blog_app();
        if let Some(dir) = &self.config.scenarios_dir {
            let extra = Scenario::load_all(dir)?;
            debug!("Loaded {} scenario(s) from {}", extra.len(), dir.display());
            scenarios.extend(extra);
        }
        Ok(scenarios)
    }

    /// Run a list of scenarios sequentially; one failure never stops the rest
    pub async fn run_scenarios(&self, scenarios: &[Scenario]) -> TestSuiteResult {
        let run_started_at = chrono::Utc::now().to_rfc3339();
        let start = Instant::now();
        let mut results = Vec::new();
        let mut passed = 0;
        let mut failed = 0;

        info!("Running {} test(s)...", scenarios.len());

        for scenario in scenarios {
            let result = self.run_scenario(scenario).await;
            if result.success {
                passed += 1;
                info!("✓ {} ({} ms)", result.title, result.duration_ms);
            } else {
                failed += 1;
                let reason = result.error.as_deref().unwrap_or("unknown error");
                error!("✗ {} - {}", result.title, reason);
            }
            results.push(result);
        }

        let duration_ms = start.elapsed().as_millis() as u64;

        info!("");
        info!("Test Results: {} passed, {} failed ({} ms)", passed, failed, duration_ms);

        TestSuiteResult {
            run_started_at,
            total: scenarios.len(),
            passed,
            failed,
            duration_ms,
            results,
        }
    }

    /// Run a single scenario: reset, seed users, then drive the browser
    pub async fn run_scenario(&self, scenario: &Scenario) -> TestResult {
        let start = Instant::now();
        let title = scenario.full_title();
        debug!("Running test: {}", title);

        let outcome = self.execute(scenario).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(()) => TestResult {
                title,
                success: true,
                duration_ms,
                failed_step: None,
                error: None,
                screenshot: None,
            },
            Err(e) => {
                let failed_step = match &e {
                    E2eError::StepFailed { index, .. } => Some(*index),
                    _ => None,
                };
                let screenshot = failed_step
                    .and_then(|_| self.playwright.failure_screenshot_path(scenario))
                    .filter(|path| path.exists());

                TestResult {
                    title,
                    success: false,
                    duration_ms,
                    failed_step,
                    error: Some(e.to_string()),
                    screenshot,
                }
            }
        }
    }

    async fn execute(&self, scenario: &Scenario) -> E2eResult<()> {
        self.api.reset().await?;
        for user in &scenario.users {
            self.api.create_user(user).await?;
        }
        self.playwright.run(scenario).await
    }

    /// Write test results to JSON file
    pub fn write_results(&self, results: &TestSuiteResult) -> E2eResult<PathBuf> {
        std::fs::create_dir_all(&self.config.output_dir)?;

        let path = self.config.output_dir.join("test-results.json");
        let json = serde_json::to_string_pretty(results)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}

impl Drop for TestRunner {
    fn drop(&mut self) {
        let _ = self.stop_servers();
    }
}

/// Keep scenarios whose full title matches `pattern`, like Playwright's `--grep`
pub fn filter_by_title(scenarios: Vec<Scenario>, pattern: &str) -> E2eResult<Vec<Scenario>> {
    let re = Regex::new(pattern)?;
    Ok(scenarios
        .into_iter()
        .filter(|s| re.is_match(&s.full_title()))
        .collect())
}
