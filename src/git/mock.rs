use crate::error::{FlowError, Result};
use crate::git::RepositoryGateway;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

/// Operations the gateway exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GitOp {
    CurrentBranch,
    Status,
    Pull,
    Push,
    PublishBranch,
    Checkout,
    StageAll,
    Commit,
}

impl GitOp {
    /// Whether the operation changes the repository or the remote
    pub fn is_mutation(&self) -> bool {
        !matches!(self, GitOp::CurrentBranch | GitOp::Status)
    }
}

/// One recorded gateway call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCall {
    pub op: GitOp,
    pub arg: Option<String>,
}

#[derive(Debug, Default)]
struct MockState {
    branch: String,
    status: String,
    staged: bool,
    commits: Vec<String>,
    pushed: usize,
    branches: Vec<String>,
    calls: Vec<GitCall>,
    fail_on: HashSet<GitOp>,
}

/// Mock gateway for testing without actual git operations
///
/// Keeps just enough state to observe flows: the checked-out branch, the
/// status text, commits made and pushes performed.
#[derive(Debug, Default)]
pub struct MockGateway {
    state: Mutex<MockState>,
}

impl MockGateway {
    /// Create a clean working copy on `branch`
    pub fn new(branch: impl Into<String>) -> Self {
        let branch = branch.into();
        MockGateway {
            state: Mutex::new(MockState {
                branches: vec![branch.clone()],
                branch,
                ..MockState::default()
            }),
        }
    }

    /// Set the short-form status output
    pub fn with_status(self, status: impl Into<String>) -> Self {
        self.lock().status = status.into();
        self
    }

    /// Make every call of `op` fail with an external tool error
    pub fn fail_on(self, op: GitOp) -> Self {
        self.lock().fail_on.insert(op);
        self
    }

    pub fn branch(&self) -> String {
        self.lock().branch.clone()
    }

    pub fn branches(&self) -> Vec<String> {
        self.lock().branches.clone()
    }

    pub fn commits(&self) -> Vec<String> {
        self.lock().commits.clone()
    }

    /// Whether changes are staged but not yet committed
    pub fn is_staged(&self) -> bool {
        self.lock().staged
    }

    pub fn push_count(&self) -> usize {
        self.lock().pushed
    }

    pub fn calls(&self) -> Vec<GitCall> {
        self.lock().calls.clone()
    }

    /// Calls that would have changed the repository or the remote
    pub fn mutations(&self) -> Vec<GitCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.op.is_mutation())
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, op: GitOp, arg: Option<&str>) -> Result<MutexGuard<'_, MockState>> {
        let mut state = self.lock();
        state.calls.push(GitCall {
            op,
            arg: arg.map(str::to_string),
        });
        if state.fail_on.contains(&op) {
            return Err(FlowError::external(
                format!("git {:?}", op).to_lowercase(),
                "simulated failure",
            ));
        }
        Ok(state)
    }
}

#[async_trait]
impl RepositoryGateway for MockGateway {
    async fn current_branch(&self) -> Result<String> {
        Ok(self.record(GitOp::CurrentBranch, None)?.branch.clone())
    }

    async fn status(&self) -> Result<String> {
        Ok(self.record(GitOp::Status, None)?.status.clone())
    }

    async fn pull(&self) -> Result<String> {
        self.record(GitOp::Pull, None)?;
        Ok("Already up to date.\n".to_string())
    }

    async fn push(&self) -> Result<String> {
        self.record(GitOp::Push, None)?.pushed += 1;
        Ok(String::new())
    }

    async fn publish_branch(&self, name: &str) -> Result<String> {
        let mut state = self.record(GitOp::PublishBranch, Some(name))?;
        state.branches.push(name.to_string());
        state.branch = name.to_string();
        Ok(format!("branch '{}' set up to track 'origin/{}'\n", name, name))
    }

    async fn checkout(&self, name: &str) -> Result<String> {
        self.record(GitOp::Checkout, Some(name))?.branch = name.to_string();
        Ok(String::new())
    }

    async fn stage_all(&self) -> Result<String> {
        self.record(GitOp::StageAll, None)?.staged = true;
        Ok(String::new())
    }

    async fn commit(&self, message: &str) -> Result<String> {
        let mut state = self.record(GitOp::Commit, Some(message))?;
        state.commits.push(message.to_string());
        state.staged = false;
        state.status.clear();
        Ok(String::new())
    }
}
