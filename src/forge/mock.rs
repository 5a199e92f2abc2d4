//! forge::mock
//!
//! In-memory review gateway for deterministic testing.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::{FlowError, Result};
use crate::forge::{CreatedReview, ReviewGateway, ReviewRequest};

#[derive(Debug, Default)]
struct Inner {
    requests: Vec<ReviewRequest>,
    /// Status and body to answer every request with
    reject: Option<(u16, String)>,
}

/// Records every review request and answers with sequential ids
#[derive(Debug, Default)]
pub struct MockReviewGateway {
    inner: Mutex<Inner>,
}

impl MockReviewGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every request with `status` and response `body`
    pub fn rejecting(status: u16, body: impl Into<String>) -> Self {
        MockReviewGateway {
            inner: Mutex::new(Inner {
                requests: Vec::new(),
                reject: Some((status, body.into())),
            }),
        }
    }

    /// Requests received, including rejected ones
    pub fn requests(&self) -> Vec<ReviewRequest> {
        self.lock().requests.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ReviewGateway for MockReviewGateway {
    async fn open_review_request(&self, request: &ReviewRequest) -> Result<CreatedReview> {
        let mut inner = self.lock();
        inner.requests.push(request.clone());
        if let Some((status, body)) = &inner.reject {
            return Err(FlowError::remote(*status, body.clone()));
        }

        let id = inner.requests.len() as u64;
        Ok(CreatedReview {
            id,
            url: format!("https://example.invalid/pull/{}", id),
        })
    }
}
