//! Blog list E2E Test Framework
//!
//! This crate provides a Rust-controlled E2E testing framework that:
//! - Resets and seeds the blog list backend through its testing API
//! - Records scenarios against a page handle with typed locators
//! - Compiles each scenario to a Playwright script and runs it under Node
//! - Optionally spawns the backend/frontend and waits for them to be ready
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    E2E Test Runner (Rust)                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TestRunner                                                 │
//! │    ├── prepare() -> spawn servers, check Playwright         │
//! │    ├── run_scenario(s)                                      │
//! │    │     ├── TestingApi::reset()                            │
//! │    │     ├── TestingApi::create_user(u) for each seed user  │
//! │    │     └── PlaywrightHandle::run(scenario)                │
//! │    └── write_results() -> test-results.json                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Scenario                                                   │
//! │    ├── title, describe, tags                                │
//! │    ├── users: [NewUser]                                     │
//! │    └── steps: [TestStep]                                    │
//! │          ├── goto { url }                                   │
//! │          ├── fill { locator, value }                        │
//! │          ├── click { locator }                              │
//! │          ├── accept_dialog                                  │
//! │          ├── expect_visible / expect_hidden { locator }     │
//! │          └── expect_contains_text { locator, text }         │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod helpers;
pub mod locator;
pub mod page;
pub mod playwright;
pub mod runner;
pub mod scenarios;
pub mod server;
pub mod spec;

pub use api::{NewUser, TestingApi};
pub use config::HarnessConfig;
pub use error::{E2eError, E2eResult};
pub use locator::{AriaRole, Locator};
pub use page::Page;
pub use runner::TestRunner;
pub use spec::{Scenario, TestStep};
