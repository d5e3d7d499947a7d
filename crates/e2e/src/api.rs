//! Client for the backend's testing endpoints
//!
//! Scenarios bypass the UI for setup: every test starts by wiping the
//! backend through `POST /api/testing/reset` and seeding users through
//! `POST /api/users`.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{E2eError, E2eResult};

/// Request body for `POST /api/users`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub password: String,
}

impl NewUser {
    pub fn new(
        name: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            username: username.into(),
            password: password.into(),
        }
    }
}

/// HTTP client bound to one backend base URL
#[derive(Debug, Clone)]
pub struct TestingApi {
    client: reqwest::Client,
    base_url: String,
}

impl TestingApi {
    pub fn new(base_url: impl Into<String>) -> E2eResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Clear all persisted data on the backend
    pub async fn reset(&self) -> E2eResult<()> {
        let endpoint = "/api/testing/reset";
        debug!("POST {}{}", self.base_url, endpoint);

        let resp = self
            .client
            .post(format!("{}{}", self.base_url, endpoint))
            .send()
            .await?;
        Self::check(endpoint, resp).await
    }

    /// Create a user the scenario can log in as
    pub async fn create_user(&self, user: &NewUser) -> E2eResult<()> {
        let endpoint = "/api/users";
        debug!("POST {}{} ({})", self.base_url, endpoint, user.username);

        let resp = self
            .client
            .post(format!("{}{}", self.base_url, endpoint))
            .json(user)
            .send()
            .await?;
        Self::check(endpoint, resp).await
    }

    async fn check(endpoint: &str, resp: reqwest::Response) -> E2eResult<()> {
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }

        let body = resp.text().await.unwrap_or_default();
        Err(E2eError::Api {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            body,
        })
    }
}
