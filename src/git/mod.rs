//! Repository gateway
//!
//! This module provides a trait-based abstraction over the version-control
//! commands the workflows need, allowing for multiple implementations:
//!
//! - [cli::GitCli]: runs the `git` executable with argument vectors
//! - [mock::MockGateway]: an in-memory implementation for testing
//!
//! Every call is a single shot: no retries, and a non-zero exit is surfaced
//! to the caller with the captured standard error.

pub mod cli;
pub mod mock;

pub use cli::GitCli;
pub use mock::{GitCall, GitOp, MockGateway};

use crate::domain::RepoState;
use crate::error::Result;
use async_trait::async_trait;

/// Common git operation trait for abstraction
///
/// All methods return the captured standard output on success.
#[async_trait]
pub trait RepositoryGateway: Send + Sync {
    /// Name of the checked-out branch
    async fn current_branch(&self) -> Result<String>;

    /// Short-form working tree status; an empty string means clean
    async fn status(&self) -> Result<String>;

    async fn pull(&self) -> Result<String>;

    async fn push(&self) -> Result<String>;

    /// Create a local branch from HEAD, check it out and publish it as a
    /// tracked remote branch.
    ///
    /// A failed publish leaves the local branch in place.
    async fn publish_branch(&self, name: &str) -> Result<String>;

    async fn checkout(&self, name: &str) -> Result<String>;

    /// Stage every change, including deletions
    async fn stage_all(&self) -> Result<String>;

    async fn commit(&self, message: &str) -> Result<String>;

    /// Fresh snapshot of branch and status
    async fn state(&self) -> Result<RepoState> {
        let branch = self.current_branch().await?;
        let status = self.status().await?;
        Ok(RepoState { branch, status })
    }
}
