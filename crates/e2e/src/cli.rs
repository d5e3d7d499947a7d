//! Command line of the `blog_app` test target
//!
//! The target is a `harness = false` test, so `cargo test` hands it libtest
//! arguments (`--nocapture`, `--test-threads 1`, name filters). Those are
//! stripped or reinterpreted before clap sees them: name filters select
//! scenarios by substring of their full title, like libtest does for tests.

use std::path::PathBuf;
use clap::Parser;
use tracing::info;

use crate::config::{Browser, HarnessConfig};
use crate::error::{E2eError, E2eResult};
use crate::runner::{filter_by_title, TestRunner};
use crate::spec::Scenario;

/// libtest switches without a value
const LIBTEST_SWITCHES: &[&str] = &[
    "--nocapture",
    "--no-capture",
    "--quiet",
    "-q",
    "--exact",
    "--ignored",
    "--include-ignored",
    "--show-output",
    "--bench",
    "--test",
];

/// libtest options that take a value, as `--opt value` or `--opt=value`
const LIBTEST_OPTIONS: &[&str] = &[
    "--test-threads",
    "--format",
    "--color",
    "--skip",
    "--logfile",
    "-Z",
];

#[derive(Parser, Debug)]
#[command(name = "blog_app")]
#[command(about = "E2E test runner for the blog list app")]
pub struct Args {
    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Frontend URL (overrides config and env)
    #[arg(long)]
    pub frontend_url: Option<String>,

    /// Backend URL (overrides config and env)
    #[arg(long)]
    pub backend_url: Option<String>,

    /// Run only tests whose full title matches this regex
    #[arg(short, long)]
    pub grep: Option<String>,

    /// Run only tests carrying this tag
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Browser to use (chromium, firefox, webkit)
    #[arg(long)]
    pub browser: Option<Browser>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Print test titles without running them
    #[arg(long)]
    pub list: bool,

    /// Extra YAML scenarios directory
    #[arg(long)]
    pub scenarios_dir: Option<PathBuf>,

    /// Output directory for results
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Fail instead of skipping when Playwright is not installed
    #[arg(long)]
    pub strict: bool,

    /// Name filters forwarded by `cargo test <filter>`
    #[arg(hide = true)]
    pub filters: Vec<String>,
}

impl Args {
    /// Parse `std::env::args()`-style input after dropping libtest flags
    pub fn parse_from_libtest<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::try_parse_from(strip_libtest_args(args.into_iter().map(Into::into)))
    }

    /// Layer CLI overrides on top of file and env config
    pub fn apply(&self, config: &mut HarnessConfig) {
        if let Some(url) = &self.frontend_url {
            config.frontend_url = url.clone();
        }
        if let Some(url) = &self.backend_url {
            config.backend_url = url.clone();
        }
        if let Some(browser) = self.browser {
            config.browser = browser;
        }
        if self.headed {
            config.headless = false;
        }
        if let Some(dir) = &self.scenarios_dir {
            config.scenarios_dir = Some(dir.clone());
        }
        if let Some(output) = &self.output {
            config.output_dir = output.clone();
        }
    }

    /// Narrow `scenarios` by `--grep`, `--tag`, and name filters
    pub fn select(&self, mut scenarios: Vec<Scenario>) -> E2eResult<Vec<Scenario>> {
        if let Some(pattern) = &self.grep {
            scenarios = filter_by_title(scenarios, pattern)?;
        }
        if let Some(tag) = &self.tag {
            scenarios = Scenario::filter_by_tag(&scenarios, tag)
                .into_iter()
                .cloned()
                .collect();
        }
        if !self.filters.is_empty() {
            scenarios.retain(|s| {
                let title = s.full_title();
                self.filters.iter().any(|f| title.contains(f.as_str()))
            });
        }
        Ok(scenarios)
    }
}

/// Drop libtest switches and options (with their values) from an argument list
pub fn strip_libtest_args(args: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut kept = Vec::new();
    let mut skip_value = false;

    for arg in args {
        if skip_value {
            skip_value = false;
            continue;
        }
        if LIBTEST_SWITCHES.contains(&arg.as_str()) {
            continue;
        }
        if LIBTEST_OPTIONS.contains(&arg.as_str()) {
            skip_value = true;
            continue;
        }
        if LIBTEST_OPTIONS
            .iter()
            .any(|opt| arg.starts_with(&format!("{}=", opt)))
        {
            continue;
        }
        kept.push(arg);
    }

    kept
}

/// Run the suite; `Ok(false)` means at least one scenario failed
pub async fn run(args: Args) -> E2eResult<bool> {
    let mut config = HarnessConfig::load(args.config.as_deref())?;
    args.apply(&mut config);

    let mut runner = TestRunner::new(config)?;
    let scenarios = args.select(runner.collect_scenarios()?)?;

    if args.list {
        for scenario in &scenarios {
            println!("{}", scenario.full_title());
        }
        println!("Total: {} test(s)", scenarios.len());
        return Ok(true);
    }

    if scenarios.is_empty() {
        info!("No scenarios match the given filters");
        return Ok(true);
    }

    match runner.prepare().await {
        Err(E2eError::PlaywrightNotFound) if !args.strict => {
            eprintln!(
                "Skipping: Playwright not available in {}",
                runner.config().node_project_dir.display()
            );
            return Ok(true);
        }
        other => other?,
    }

    let results = runner.run_scenarios(&scenarios).await;
    runner.write_results(&results)?;

    Ok(results.all_passed())
}
