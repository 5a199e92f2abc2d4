use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::{FlowError, Result};
use crate::git::RepositoryGateway;

/// Repository gateway backed by the `git` executable.
///
/// Arguments are always passed as a vector, so operator-supplied branch names
/// and commit messages never reach a shell.
#[derive(Debug, Clone)]
pub struct GitCli {
    workdir: PathBuf,
    remote: String,
    timeout: Duration,
}

impl GitCli {
    /// Locate the working tree containing `path`.
    ///
    /// Discovers the repository in `path` or any parent directory.
    ///
    /// # Returns
    /// * `Ok(GitCli)` - Gateway rooted at the working tree
    /// * `Err` - If not in a git repository, or the repository is bare
    pub fn discover(
        path: impl AsRef<Path>,
        remote: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let repo = git2::Repository::discover(path.as_ref())?;
        let workdir = repo
            .workdir()
            .ok_or_else(|| FlowError::precondition("A bare repository has no working tree"))?
            .to_path_buf();

        Ok(GitCli {
            workdir,
            remote: remote.into(),
            timeout,
        })
    }

    /// Root of the working tree every command runs in
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    async fn run(&self, args: &[&str]) -> Result<String> {
        let command_line = format!("git {}", args.join(" "));
        tracing::debug!(?args, workdir = %self.workdir.display(), "running git");

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, output)
            .await
            .map_err(|_| FlowError::Timeout {
                command: command_line.clone(),
                secs: self.timeout.as_secs(),
            })??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::debug!(code = ?output.status.code(), %stderr, "git failed");
            return Err(FlowError::external(command_line, stderr));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Reject names git would not accept as a branch, or would read as an option
fn check_branch_name(name: &str) -> Result<()> {
    if name.starts_with('-') || !git2::Reference::is_valid_name(&format!("refs/heads/{}", name)) {
        return Err(FlowError::validation(format!(
            "'{}' is not a valid branch name",
            name
        )));
    }
    Ok(())
}

#[async_trait]
impl RepositoryGateway for GitCli {
    async fn current_branch(&self) -> Result<String> {
        Ok(self
            .run(&["rev-parse", "--abbrev-ref", "HEAD"])
            .await?
            .trim()
            .to_string())
    }

    async fn status(&self) -> Result<String> {
        self.run(&["status", "-s"]).await
    }

    async fn pull(&self) -> Result<String> {
        self.run(&["pull"]).await
    }

    async fn push(&self) -> Result<String> {
        self.run(&["push"]).await
    }

    async fn publish_branch(&self, name: &str) -> Result<String> {
        check_branch_name(name)?;
        let mut output = self.run(&["checkout", "-b", name]).await?;
        output.push_str(&self.run(&["push", "-u", &self.remote, name]).await?);
        Ok(output)
    }

    async fn checkout(&self, name: &str) -> Result<String> {
        check_branch_name(name)?;
        self.run(&["checkout", name]).await
    }

    async fn stage_all(&self) -> Result<String> {
        self.run(&["add", "--all"]).await
    }

    async fn commit(&self, message: &str) -> Result<String> {
        self.run(&["commit", "-m", message]).await
    }
}
