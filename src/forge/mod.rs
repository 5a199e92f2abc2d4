//! Remote review requests
//!
//! - [github::GitHubGateway]: GitHub pull requests over the REST API
//! - [mock::MockReviewGateway]: records requests in memory for testing

pub mod github;
pub mod mock;

pub use github::GitHubGateway;
pub use mock::MockReviewGateway;

use async_trait::async_trait;

use crate::domain::{humanize, BranchKind};
use crate::error::{FlowError, Result};

/// A request to merge `source` into `destination`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRequest {
    pub source: String,
    pub destination: String,
    pub title: String,
    pub body: String,
}

impl ReviewRequest {
    /// Build the request closing a finished branch.
    ///
    /// The title names both branches; the body names the work, e.g.
    /// `Finished Hot Fix login bug` for `hotfix-login-bug`.
    pub fn finishing(kind: BranchKind, source: &str, destination: &str) -> Self {
        ReviewRequest {
            source: source.to_string(),
            destination: destination.to_string(),
            title: title_for(source, destination),
            body: format!("Finished {} {}", kind.title(), humanize(kind, source)),
        }
    }
}

pub fn title_for(source: &str, destination: &str) -> String {
    format!("Requesting Merge of {} to {}", source, destination)
}

/// What the service answered for a created request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedReview {
    pub id: u64,
    pub url: String,
}

#[async_trait]
pub trait ReviewGateway: Send + Sync {
    /// Fail early when requests cannot be sent at all, e.g. missing credentials
    fn ensure_ready(&self) -> Result<()> {
        Ok(())
    }

    /// Open a review request. Not retried; a non-success response is a
    /// [`FlowError::RemoteService`](crate::error::FlowError::RemoteService)
    /// carrying the response body.
    async fn open_review_request(&self, request: &ReviewRequest) -> Result<CreatedReview>;
}

/// Stand-in used when the review service is not configured.
///
/// Flows that never open a request work as usual; the others fail with the
/// configuration error before touching the repository.
#[derive(Debug, Clone)]
pub struct UnavailableReviewGateway {
    reason: String,
}

impl UnavailableReviewGateway {
    pub fn new(reason: impl Into<String>) -> Self {
        UnavailableReviewGateway {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl ReviewGateway for UnavailableReviewGateway {
    fn ensure_ready(&self) -> Result<()> {
        Err(FlowError::config(self.reason.clone()))
    }

    async fn open_review_request(&self, _request: &ReviewRequest) -> Result<CreatedReview> {
        Err(FlowError::config(self.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finishing_hotfix_request() {
        let request = ReviewRequest::finishing(BranchKind::Hotfix, "hotfix-login-bug", "master");
        assert_eq!(request.title, "Requesting Merge of hotfix-login-bug to master");
        assert_eq!(request.body, "Finished Hot Fix login bug");
        assert_eq!(request.destination, "master");
    }

    #[test]
    fn test_finishing_feature_request() {
        let request =
            ReviewRequest::finishing(BranchKind::Feature, "feature-dark-mode", "development");
        assert_eq!(request.body, "Finished Feature dark mode");
    }

    #[test]
    fn test_unavailable_gateway_fails_early() {
        let forge = UnavailableReviewGateway::new("GITFLOW_TOKEN is not set");
        assert!(matches!(forge.ensure_ready(), Err(FlowError::Config(_))));
    }
}
