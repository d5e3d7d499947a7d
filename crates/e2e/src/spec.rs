//! Scenario model: steps, seeded users, and YAML loading

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::api::NewUser;
use crate::error::{E2eError, E2eResult};
use crate::locator::Locator;

/// Separator between describe groups and the title, as Playwright prints it
pub const TITLE_SEPARATOR: &str = " › ";

/// One end-to-end test case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Test name within its describe group
    pub title: String,

    /// Enclosing describe groups, outermost first
    #[serde(default)]
    pub describe: Vec<String>,

    /// Tags for filtering tests
    #[serde(default)]
    pub tags: Vec<String>,

    /// Users created through the API after the reset, before the browser starts
    #[serde(default)]
    pub users: Vec<NewUser>,

    /// Steps to execute in order
    pub steps: Vec<TestStep>,
}

/// A single browser action or assertion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TestStep {
    /// Navigate to a path relative to the frontend URL
    Goto { url: String },

    /// Fill an input field
    Fill { locator: Locator, value: String },

    /// Click an element
    Click {
        locator: Locator,
        #[serde(default)]
        timeout_ms: Option<u64>,
    },

    /// Accept the next native dialog (confirm/alert) the page opens
    AcceptDialog,

    /// Assert the element is visible
    ExpectVisible { locator: Locator },

    /// Assert the element is not visible (absent or hidden)
    ExpectHidden { locator: Locator },

    /// Assert the element's text contains a fragment
    ExpectContainsText { locator: Locator, text: String },

    /// Take a screenshot
    Screenshot {
        name: String,
        #[serde(default)]
        full_page: bool,
    },

    /// Log a message (for debugging)
    Log { message: String },
}

impl TestStep {
    /// Short human-readable name used in reports
    pub fn name(&self) -> String {
        match self {
            TestStep::Goto { url } => format!("goto:{}", url),
            TestStep::Fill { locator, .. } => format!("fill:{}", locator),
            TestStep::Click { locator, .. } => format!("click:{}", locator),
            TestStep::AcceptDialog => "accept_dialog".to_string(),
            TestStep::ExpectVisible { locator } => format!("expect_visible:{}", locator),
            TestStep::ExpectHidden { locator } => format!("expect_hidden:{}", locator),
            TestStep::ExpectContainsText { locator, text } => {
                format!("expect_contains_text:{}:{:?}", locator, text)
            }
            TestStep::Screenshot { name, .. } => format!("screenshot:{}", name),
            TestStep::Log { message } => {
                format!("log:{}", message.chars().take(30).collect::<String>())
            }
        }
    }
}

impl Scenario {
    /// Describe path and title joined, e.g. `Blog app › Login › succeeds with correct credentials`
    pub fn full_title(&self) -> String {
        let mut parts: Vec<&str> = self.describe.iter().map(String::as_str).collect();
        parts.push(&self.title);
        parts.join(TITLE_SEPARATOR)
    }

    /// File-name-safe form of the full title
    pub fn slug(&self) -> String {
        let mut slug = String::new();
        for c in self.full_title().chars() {
            if c.is_ascii_alphanumeric() {
                slug.push(c.to_ascii_lowercase());
            } else if !slug.ends_with('-') {
                slug.push('-');
            }
        }
        slug.trim_matches('-').to_string()
    }

    /// Parse a scenario from YAML string
    pub fn from_yaml(yaml: &str) -> E2eResult<Self> {
        let scenario: Self = serde_yaml::from_str(yaml)?;
        if scenario.steps.is_empty() {
            return Err(E2eError::ScenarioParse(format!(
                "scenario '{}' has no steps",
                scenario.title
            )));
        }
        Ok(scenario)
    }

    /// Parse a scenario from a YAML file
    pub fn from_file(path: &Path) -> E2eResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content).map_err(|e| {
            E2eError::ScenarioParse(format!("{}: {}", path.display(), e))
        })
    }

    /// Load all scenarios from a directory, in path order
    pub fn load_all(dir: &Path) -> E2eResult<Vec<Self>> {
        let mut scenarios = Vec::new();

        for entry in walkdir::WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
            })
        {
            scenarios.push(Self::from_file(entry.path())?);
        }

        Ok(scenarios)
    }

    /// Filter scenarios by tag
    pub fn filter_by_tag<'a>(scenarios: &'a [Self], tag: &str) -> Vec<&'a Self> {
        scenarios
            .iter()
            .filter(|s| s.tags.iter().any(|t| t == tag))
            .collect()
    }
}
