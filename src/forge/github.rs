//! forge::github
//!
//! Opens pull requests through the GitHub REST API.
//!
//! The API base is configurable so GitHub Enterprise installs (and test
//! servers) can be targeted. The token is read from the environment by the
//! caller and never logged.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::ForgeConfig;
use crate::error::{FlowError, Result};
use crate::forge::{CreatedReview, ReviewGateway, ReviewRequest};

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = concat!("gitflow/", env!("CARGO_PKG_VERSION"));

pub struct GitHubGateway {
    client: Client,
    token: String,
    owner: String,
    repo: String,
    api_base: String,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for GitHubGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubGateway")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("api_base", &self.api_base)
            .finish()
    }
}

#[derive(Serialize)]
struct CreatePullBody<'a> {
    head: &'a str,
    base: &'a str,
    title: &'a str,
    body: &'a str,
}

#[derive(Deserialize)]
struct CreatedPull {
    number: u64,
    html_url: String,
}

impl GitHubGateway {
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        token: impl Into<String>,
        api_base: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FlowError::Network(e.to_string()))?;

        Ok(GitHubGateway {
            client,
            token: token.into(),
            owner: owner.into(),
            repo: repo.into(),
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    /// Build a gateway from `[forge]`, reading the token from its environment
    /// variable.
    pub fn from_config(config: &ForgeConfig, timeout: Duration) -> Result<Self> {
        let (owner, repo) = config.repository()?;
        let token = config.token()?;
        Self::new(owner, repo, token, &config.api_base, timeout)
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {}", self.token))
            .map_err(|_| FlowError::config("API token contains characters not allowed in a header"))?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        Ok(headers)
    }

    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_base, self.owner, self.repo, path
        )
    }
}

#[async_trait]
impl ReviewGateway for GitHubGateway {
    async fn open_review_request(&self, request: &ReviewRequest) -> Result<CreatedReview> {
        let url = self.repo_url("pulls");
        tracing::debug!(%url, head = %request.source, base = %request.destination, "opening pull request");

        let response = self
            .client
            .post(&url)
            .headers(self.headers()?)
            .json(&CreatePullBody {
                head: &request.source,
                base: &request.destination,
                title: &request.title,
                body: &request.body,
            })
            .send()
            .await
            .map_err(|e| FlowError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<unreadable body: {}>", e));
            tracing::debug!(status = status.as_u16(), %body, "pull request rejected");
            return Err(FlowError::remote(status.as_u16(), body));
        }

        let created: CreatedPull = response.json().await.map_err(|e| {
            FlowError::remote(status.as_u16(), format!("Failed to parse response: {}", e))
        })?;

        Ok(CreatedReview {
            id: created.number,
            url: created.html_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_token() {
        let gateway = GitHubGateway::new(
            "acme",
            "widgets",
            "ghp_secret",
            "https://api.github.com/",
            Duration::from_secs(5),
        )
        .unwrap();
        let debug = format!("{:?}", gateway);
        assert!(!debug.contains("ghp_secret"));
        assert_eq!(
            gateway.repo_url("pulls"),
            "https://api.github.com/repos/acme/widgets/pulls"
        );
    }

    #[test]
    fn test_header_rejects_newline_token() {
        let gateway =
            GitHubGateway::new("a", "b", "bad\ntoken", "http://x", Duration::from_secs(1)).unwrap();
        assert!(gateway.headers().is_err());
    }
}
