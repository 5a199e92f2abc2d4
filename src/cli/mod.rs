//! Flow orchestration and the wiring the binary uses to run it

pub mod orchestration;
pub mod pipeline;

pub use orchestration::{Collaborators, FinishOutcome, Orchestrator};
pub use pipeline::Pipeline;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::build_runner::CommandBuildRunner;
use crate::config::Config;
use crate::error::{FlowError, Result};
use crate::forge::{GitHubGateway, ReviewGateway, UnavailableReviewGateway};
use crate::git::GitCli;
use crate::notify::{self, Notifier};
use crate::ui::{self, TerminalPrompter};
use crate::version_store::ManifestVersionStore;

/// Connect the real collaborators for the repository containing `cwd`
///
/// A missing review-service setup is not an error here; only the flows that
/// open a review request fail on it.
pub fn connect(config: &Config, cwd: &Path) -> Result<Collaborators> {
    let timeouts = &config.timeouts;
    let git = GitCli::discover(
        cwd,
        config.branches.remote.clone(),
        Duration::from_secs(timeouts.git_secs),
    )?;
    let root = git.workdir().to_path_buf();

    let reviews: Arc<dyn ReviewGateway> =
        match GitHubGateway::from_config(&config.forge, Duration::from_secs(timeouts.http_secs)) {
            Ok(gateway) => Arc::new(gateway),
            Err(e) => {
                tracing::debug!(error = %e, "review requests unavailable");
                Arc::new(UnavailableReviewGateway::new(e.to_string()))
            }
        };

    Ok(Collaborators {
        versions: Arc::new(ManifestVersionStore::new(&root, &config.manifests.files)?),
        builder: Arc::new(CommandBuildRunner::new(
            config.build.command.clone(),
            &root,
            Duration::from_secs(timeouts.build_secs),
        )),
        repo: Arc::new(git),
        reviews,
        prompter: Arc::new(TerminalPrompter::new()),
        notifier: notify::from_config(&config.notifications),
    })
}

/// The single error sink: print the failure and notify the operator
pub fn report_failure(err: &FlowError, notifier: &dyn Notifier) {
    ui::display_error(&err.to_string());
    notify::send(notifier, "UH OH!", &format!("Error: {}", err));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::RecordingNotifier;

    #[test]
    fn test_report_failure_notifies() {
        let notifier = RecordingNotifier::new();
        report_failure(&FlowError::precondition("dirty tree"), &notifier);
        assert_eq!(
            notifier.sent(),
            vec![(
                "UH OH!".to_string(),
                "Error: Precondition failed: dirty tree".to_string()
            )]
        );
    }
}
