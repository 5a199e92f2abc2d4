//! Running the project's build/test command before a commit

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::{FlowError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    Passed,
    /// There is no build command to run
    NotConfigured,
}

#[async_trait]
pub trait BuildRunner: Send + Sync {
    /// Run the build once. A failing build is an error.
    async fn run(&self) -> Result<BuildOutcome>;
}

/// Runs a configured argument vector in the working tree
#[derive(Debug, Clone)]
pub struct CommandBuildRunner {
    command: Vec<String>,
    workdir: PathBuf,
    timeout: Duration,
}

impl CommandBuildRunner {
    pub fn new(command: Vec<String>, workdir: impl Into<PathBuf>, timeout: Duration) -> Self {
        CommandBuildRunner {
            command,
            workdir: workdir.into(),
            timeout,
        }
    }
}

#[async_trait]
impl BuildRunner for CommandBuildRunner {
    /// Stdout and stderr are inherited so the operator sees build progress.
    /// A non-zero exit code is reported as an external tool failure.
    async fn run(&self) -> Result<BuildOutcome> {
        let Some((program, args)) = self.command.split_first() else {
            return Ok(BuildOutcome::NotConfigured);
        };
        let command_line = self.command.join(" ");
        tracing::info!(command = %command_line, "running build");

        let mut child = Command::new(program)
            .args(args)
            .current_dir(&self.workdir)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| FlowError::external(command_line.clone(), e.to_string()))?;

        let status = tokio::time::timeout(self.timeout, child.wait())
            .await
            .map_err(|_| FlowError::Timeout {
                command: command_line.clone(),
                secs: self.timeout.as_secs(),
            })??;

        if !status.success() {
            return Err(FlowError::external(
                command_line,
                format!("exited with code {}", status.code().unwrap_or(-1)),
            ));
        }

        Ok(BuildOutcome::Passed)
    }
}

/// Build runner with a fixed result, counting how often it ran
#[derive(Debug)]
pub struct MockBuildRunner {
    outcome: std::result::Result<BuildOutcome, String>,
    runs: AtomicUsize,
}

impl MockBuildRunner {
    pub fn passing() -> Self {
        Self::with(Ok(BuildOutcome::Passed))
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self::with(Err(reason.into()))
    }

    pub fn not_configured() -> Self {
        Self::with(Ok(BuildOutcome::NotConfigured))
    }

    fn with(outcome: std::result::Result<BuildOutcome, String>) -> Self {
        MockBuildRunner {
            outcome,
            runs: AtomicUsize::new(0),
        }
    }

    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BuildRunner for MockBuildRunner {
    async fn run(&self) -> Result<BuildOutcome> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        self.outcome
            .clone()
            .map_err(|reason| FlowError::external("build", reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner(command: &[&str]) -> CommandBuildRunner {
        CommandBuildRunner::new(
            command.iter().map(|s| s.to_string()).collect(),
            std::env::temp_dir(),
            Duration::from_secs(30),
        )
    }

    #[tokio::test]
    async fn test_empty_command_is_not_configured() {
        assert_eq!(runner(&[]).run().await.unwrap(), BuildOutcome::NotConfigured);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_exit_codes() {
        assert_eq!(runner(&["true"]).run().await.unwrap(), BuildOutcome::Passed);

        let err = runner(&["false"]).run().await.unwrap_err();
        assert!(matches!(err, FlowError::ExternalTool { .. }));
        assert!(err.to_string().contains("exited with code 1"));
    }

    #[tokio::test]
    async fn test_missing_program() {
        let err = runner(&["/nonexistent/build-tool"]).run().await.unwrap_err();
        assert!(matches!(err, FlowError::ExternalTool { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout() {
        let slow = CommandBuildRunner::new(
            vec!["sleep".to_string(), "5".to_string()],
            std::env::temp_dir(),
            Duration::from_millis(100),
        );
        assert!(matches!(
            slow.run().await.unwrap_err(),
            FlowError::Timeout { .. }
        ));
    }

    #[tokio::test]
    async fn test_mock_counts_runs() {
        let mock = MockBuildRunner::failing("tests failed");
        assert!(mock.run().await.is_err());
        assert!(mock.run().await.is_err());
        assert_eq!(mock.runs(), 2);
    }
}
