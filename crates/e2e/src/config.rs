//! Harness configuration
//!
//! Layered as: built-in defaults, then an optional TOML file, then
//! `BLOGLIST_E2E_*` environment variables. The test binary applies its CLI
//! flags on top.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{E2eError, E2eResult};

pub const ENV_FRONTEND_URL: &str = "BLOGLIST_E2E_FRONTEND_URL";
pub const ENV_BACKEND_URL: &str = "BLOGLIST_E2E_BACKEND_URL";
pub const ENV_NODE_DIR: &str = "BLOGLIST_E2E_NODE_DIR";
pub const ENV_HEADLESS: &str = "BLOGLIST_E2E_HEADLESS";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Where the blog list UI is served
    pub frontend_url: String,

    /// Where the blog list API is served
    pub backend_url: String,

    /// Node project with `@playwright/test` in its node_modules
    pub node_project_dir: PathBuf,

    pub browser: Browser,
    pub headless: bool,
    pub viewport: Viewport,

    /// Per-action timeout; Playwright's default when unset
    pub action_timeout_ms: Option<u64>,

    /// Per-assertion timeout; Playwright's default when unset
    pub expect_timeout_ms: Option<u64>,

    /// Results file and failure screenshots go here
    pub output_dir: PathBuf,
    pub screenshot_on_failure: bool,

    /// Extra YAML scenarios to run after the built-in suite
    pub scenarios_dir: Option<PathBuf>,

    /// Processes to spawn before the suite (backend, frontend dev server)
    pub servers: Vec<ServerConfig>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            backend_url: "http://localhost:3003".to_string(),
            node_project_dir: PathBuf::from("."),
            browser: Browser::Chromium,
            headless: true,
            viewport: Viewport::default(),
            action_timeout_ms: None,
            expect_timeout_ms: None,
            output_dir: PathBuf::from("test-results"),
            screenshot_on_failure: true,
            scenarios_dir: None,
            servers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl Browser {
    pub fn as_str(&self) -> &'static str {
        match self {
            Browser::Chromium => "chromium",
            Browser::Firefox => "firefox",
            Browser::Webkit => "webkit",
        }
    }
}

impl std::str::FromStr for Browser {
    type Err = E2eError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chromium" => Ok(Browser::Chromium),
            "firefox" => Ok(Browser::Firefox),
            "webkit" => Ok(Browser::Webkit),
            other => Err(E2eError::Config(format!("unknown browser '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// A process the harness starts and waits on before running scenarios
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Label used in logs and errors
    pub name: String,

    pub command: String,

    #[serde(default)]
    pub args: Vec<String>,

    #[serde(default)]
    pub cwd: Option<PathBuf>,

    #[serde(default)]
    pub env: HashMap<String, String>,

    /// Polled with GET until it answers 2xx
    pub ready_url: String,

    #[serde(default = "default_startup_timeout_secs")]
    pub startup_timeout_secs: u64,
}

fn default_startup_timeout_secs() -> u64 {
    60
}

impl ServerConfig {
    pub fn startup_timeout(&self) -> Duration {
        Duration::from_secs(self.startup_timeout_secs)
    }
}

impl HarnessConfig {
    /// Load configuration from file, or defaults if `path` is `None`
    pub fn load(path: Option<&Path>) -> E2eResult<Self> {
        let mut config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|e| {
                    E2eError::Config(format!("cannot read {}: {}", path.display(), e))
                })?;
                Self::from_toml(&content)?
            }
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> E2eResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Override fields from environment variables, read through `lookup`
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> E2eResult<()> {
        if let Some(url) = lookup(ENV_FRONTEND_URL) {
            self.frontend_url = url;
        }
        if let Some(url) = lookup(ENV_BACKEND_URL) {
            self.backend_url = url;
        }
        if let Some(dir) = lookup(ENV_NODE_DIR) {
            self.node_project_dir = PathBuf::from(dir);
        }
        if let Some(value) = lookup(ENV_HEADLESS) {
            self.headless = match value.as_str() {
                "1" | "true" => true,
                "0" | "false" => false,
                other => {
                    return Err(E2eError::Config(format!(
                        "{} must be true/false, got '{}'",
                        ENV_HEADLESS, other
                    )))
                }
            };
        }
        Ok(())
    }

    pub fn validate(&self) -> E2eResult<()> {
        for (field, url) in [
            ("frontend_url", &self.frontend_url),
            ("backend_url", &self.backend_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(E2eError::Config(format!(
                    "{} must be an http(s) URL, got '{}'",
                    field, url
                )));
            }
        }

        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(E2eError::Config("viewport must be non-zero".to_string()));
        }

        Ok(())
    }

    pub fn screenshot_dir(&self) -> PathBuf {
        self.output_dir.join("screenshots")
    }
}
