//! Recording page handle
//!
//! `Page` is what scenario code and the action helpers drive. Every call
//! appends a [`TestStep`]; the Playwright layer later replays the steps in
//! a real browser, awaiting each one before starting the next.

use crate::locator::Locator;
use crate::spec::TestStep;

#[derive(Debug, Clone, Default)]
pub struct Page {
    steps: Vec<TestStep>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Navigate to `path` relative to the frontend URL.
    pub fn goto(&mut self, path: impl Into<String>) -> &mut Self {
        self.push(TestStep::Goto { url: path.into() })
    }

    pub fn fill(&mut self, locator: Locator, value: impl Into<String>) -> &mut Self {
        self.push(TestStep::Fill {
            locator,
            value: value.into(),
        })
    }

    pub fn click(&mut self, locator: Locator) -> &mut Self {
        self.push(TestStep::Click {
            locator,
            timeout_ms: None,
        })
    }

    /// Register a one-shot handler accepting the next native dialog.
    /// Must be recorded before the click that opens the dialog.
    pub fn accept_next_dialog(&mut self) -> &mut Self {
        self.push(TestStep::AcceptDialog)
    }

    pub fn expect_visible(&mut self, locator: Locator) -> &mut Self {
        self.push(TestStep::ExpectVisible { locator })
    }

    pub fn expect_hidden(&mut self, locator: Locator) -> &mut Self {
        self.push(TestStep::ExpectHidden { locator })
    }

    pub fn expect_contains_text(&mut self, locator: Locator, text: impl Into<String>) -> &mut Self {
        self.push(TestStep::ExpectContainsText {
            locator,
            text: text.into(),
        })
    }

    pub fn screenshot(&mut self, name: impl Into<String>) -> &mut Self {
        self.push(TestStep::Screenshot {
            name: name.into(),
            full_page: false,
        })
    }

    pub fn log(&mut self, message: impl Into<String>) -> &mut Self {
        self.push(TestStep::Log {
            message: message.into(),
        })
    }

    pub fn steps(&self) -> &[TestStep] {
        &self.steps
    }

    pub fn into_steps(self) -> Vec<TestStep> {
        self.steps
    }

    fn push(&mut self, step: TestStep) -> &mut Self {
        self.steps.push(step);
        self
    }
}
