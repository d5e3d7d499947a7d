//! Typed element locators and their Playwright rendering

use std::fmt;

use serde::{Deserialize, Serialize};

/// ARIA roles the blog list UI is queried by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AriaRole {
    Button,
    Textbox,
    Heading,
    Link,
    Form,
    Listitem,
}

impl AriaRole {
    fn as_str(&self) -> &'static str {
        match self {
            AriaRole::Button => "button",
            AriaRole::Textbox => "textbox",
            AriaRole::Heading => "heading",
            AriaRole::Link => "link",
            AriaRole::Form => "form",
            AriaRole::Listitem => "listitem",
        }
    }
}

/// How to find an element on the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "by", rename_all = "snake_case")]
pub enum Locator {
    /// `data-testid` attribute
    TestId { id: String },

    /// Accessible role, optionally narrowed by accessible name
    Role {
        role: AriaRole,
        #[serde(default)]
        name: Option<String>,
    },

    /// Visible text (substring, case-insensitive unless `exact`)
    Text {
        text: String,
        #[serde(default)]
        exact: bool,
    },

    /// Raw CSS / Playwright selector
    Css { selector: String },

    /// The `index`-th match of another locator
    Nth { of: Box<Locator>, index: usize },

    /// `child` resolved inside `parent`
    Within {
        parent: Box<Locator>,
        child: Box<Locator>,
    },
}

impl Locator {
    pub fn test_id(id: impl Into<String>) -> Self {
        Locator::TestId { id: id.into() }
    }

    pub fn role(role: AriaRole, name: impl Into<String>) -> Self {
        Locator::Role {
            role,
            name: Some(name.into()),
        }
    }

    /// Shorthand for the most common lookup in the blog list UI.
    pub fn button(name: impl Into<String>) -> Self {
        Self::role(AriaRole::Button, name)
    }

    pub fn text(text: impl Into<String>) -> Self {
        Locator::Text {
            text: text.into(),
            exact: false,
        }
    }

    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css {
            selector: selector.into(),
        }
    }

    pub fn nth(self, index: usize) -> Self {
        Locator::Nth {
            of: Box::new(self),
            index,
        }
    }

    /// Scope `child` to matches of `self`.
    pub fn locator(self, child: Locator) -> Self {
        Locator::Within {
            parent: Box::new(self),
            child: Box::new(child),
        }
    }

    /// Render as a Playwright locator expression rooted at `scope`
    /// (`page` or another locator expression).
    pub fn to_js(&self, scope: &str) -> String {
        match self {
            Locator::TestId { id } => format!("{}.getByTestId({})", scope, js_str(id)),
            Locator::Role { role, name: None } => {
                format!("{}.getByRole({})", scope, js_str(role.as_str()))
            }
            Locator::Role {
                role,
                name: Some(name),
            } => format!(
                "{}.getByRole({}, {{ name: {} }})",
                scope,
                js_str(role.as_str()),
                js_str(name)
            ),
            Locator::Text { text, exact: false } => {
                format!("{}.getByText({})", scope, js_str(text))
            }
            Locator::Text { text, exact: true } => {
                format!("{}.getByText({}, {{ exact: true }})", scope, js_str(text))
            }
            Locator::Css { selector } => format!("{}.locator({})", scope, js_str(selector)),
            Locator::Nth { of, index } => format!("{}.nth({})", of.to_js(scope), index),
            Locator::Within { parent, child } => child.to_js(&parent.to_js(scope)),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::TestId { id } => write!(f, "test_id={}", id),
            Locator::Role { role, name: None } => write!(f, "role={}", role.as_str()),
            Locator::Role {
                role,
                name: Some(name),
            } => write!(f, "role={}[name={:?}]", role.as_str(), name),
            Locator::Text { text, .. } => write!(f, "text={:?}", text),
            Locator::Css { selector } => write!(f, "css={}", selector),
            Locator::Nth { of, index } => write!(f, "{} >> nth={}", of, index),
            Locator::Within { parent, child } => write!(f, "{} >> {}", parent, child),
        }
    }
}

/// Quote a value as a JS string literal.
///
/// JSON string syntax is a subset of JS string syntax, so serde_json does the escaping.
pub(crate) fn js_str(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Locator::test_id("username-input"), r#"page.getByTestId("username-input")"# ; "test id")]
    #[test_case(Locator::button("Login"), r#"page.getByRole("button", { name: "Login" })"# ; "role with name")]
    #[test_case(Locator::Role { role: AriaRole::Form, name: None }, r#"page.getByRole("form")"# ; "role without name")]
    #[test_case(Locator::text("Likes: 0"), r#"page.getByText("Likes: 0")"# ; "text")]
    #[test_case(Locator::Text { text: "view".into(), exact: true }, r#"page.getByText("view", { exact: true })"# ; "exact text")]
    #[test_case(Locator::css(".blog-item").nth(1), r#"page.locator(".blog-item").nth(1)"# ; "nth")]
    fn renders_playwright_expression(locator: Locator, expected: &str) {
        assert_eq!(locator.to_js("page"), expected);
    }

    #[test]
    fn nested_locator_is_scoped_to_parent() {
        let locator = Locator::css(".blog-item")
            .nth(1)
            .locator(Locator::css(r#"button:has-text("like")"#));
        assert_eq!(
            locator.to_js("page"),
            r#"page.locator(".blog-item").nth(1).locator("button:has-text(\"like\")")"#
        );
    }

    #[test]
    fn quotes_and_newlines_are_escaped() {
        let locator = Locator::text("it's \"quoted\"\nline");
        assert_eq!(
            locator.to_js("page"),
            r#"page.getByText("it's \"quoted\"\nline")"#
        );
    }

    #[test]
    fn display_reads_like_a_selector_chain() {
        let locator = Locator::css(".blog-item").nth(0);
        assert_eq!(locator.to_string(), "css=.blog-item >> nth=0");
        assert_eq!(
            Locator::button("delete").to_string(),
            r#"role=button[name="delete"]"#
        );
    }

    #[test]
    fn parses_from_yaml() {
        let yaml = r#"
by: within
parent:
  by: nth
  of:
    by: css
    selector: .blog-item
  index: 0
child:
  by: role
  role: button
  name: view
"#;
        let locator: Locator = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            locator,
            Locator::css(".blog-item").nth(0).locator(Locator::button("view"))
        );
    }
}
