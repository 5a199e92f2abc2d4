//! Main workflow orchestration logic
//!
//! Every flow re-reads the repository state it depends on, checks its
//! preconditions before any mutation, then runs its steps one after another
//! through a [`Pipeline`]. The first failure aborts the flow and is returned
//! to the caller; completed steps are not rolled back.

use std::sync::Arc;

use crate::boundary::BoundaryWarning;
use crate::build_runner::{BuildOutcome, BuildRunner};
use crate::cli::pipeline::Pipeline;
use crate::config::{BranchesConfig, BuildPolicy, Config};
use crate::domain::{branch_name, BranchKind, BumpKind, CommitMessage, CommitType, RepoState, Version};
use crate::error::{FlowError, Result};
use crate::forge::{CreatedReview, ReviewGateway, ReviewRequest};
use crate::git::RepositoryGateway;
use crate::notify::{self, Notifier};
use crate::ui::{self, Prompter};
use crate::version_store::VersionStore;

const FEATURE_BUMPS: &[&str] = &["major", "minor", "patch"];
const RELEASE_BUMPS: &[&str] = &["major", "minor"];

/// Everything a flow talks to outside of its own logic
#[derive(Clone)]
pub struct Collaborators {
    pub repo: Arc<dyn RepositoryGateway>,
    pub versions: Arc<dyn VersionStore>,
    pub reviews: Arc<dyn ReviewGateway>,
    pub prompter: Arc<dyn Prompter>,
    pub builder: Arc<dyn BuildRunner>,
    pub notifier: Arc<dyn Notifier>,
}

/// Result of a successful finish flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishOutcome {
    /// The branch that was finished
    pub branch: String,
    /// Version written before committing
    pub version: Version,
    pub review: CreatedReview,
}

pub struct Orchestrator {
    deps: Collaborators,
    branches: BranchesConfig,
    build_policy: BuildPolicy,
}

impl Orchestrator {
    pub fn new(deps: Collaborators, branches: BranchesConfig, build_policy: BuildPolicy) -> Self {
        Orchestrator {
            deps,
            branches,
            build_policy,
        }
    }

    pub fn from_config(deps: Collaborators, config: &Config) -> Self {
        Self::new(deps, config.branches.clone(), config.build.policy)
    }

    /// Current branch and working-tree status. Never mutates.
    pub async fn info(&self) -> Result<RepoState> {
        self.deps.repo.state().await
    }

    /// Pull the current branch, returning the tool output
    pub async fn update(&self) -> Result<String> {
        let mut pipeline = Pipeline::new("update");
        let output = pipeline.step("pull", self.deps.repo.pull()).await?;
        pipeline.finish();
        Ok(output)
    }

    pub async fn start_feature(&self) -> Result<String> {
        self.start(BranchKind::Feature).await
    }

    pub async fn start_hotfix(&self) -> Result<String> {
        self.start(BranchKind::Hotfix).await
    }

    pub async fn start_release(&self) -> Result<String> {
        self.start(BranchKind::Release).await
    }

    /// Cut a new `kind` branch from its base and publish it, returning its name
    pub async fn start(&self, kind: BranchKind) -> Result<String> {
        let base = self.base_of(kind).to_string();
        let mut pipeline = Pipeline::new(start_flow(kind));

        let state = pipeline.step("read state", self.deps.repo.state()).await?;
        pipeline.check("check branch", || {
            if state.branch != base {
                return Err(FlowError::precondition(format!(
                    "A {} can only be started from {} (currently on {})",
                    kind.noun(),
                    base,
                    state.branch
                )));
            }
            if !state.is_clean() {
                return Err(FlowError::precondition(format!(
                    "Commit or stash your changes on {} before starting a {}",
                    state.branch,
                    kind.noun()
                )));
            }
            Ok(())
        })?;

        let name = pipeline.check("name branch", || {
            let answer = self
                .deps
                .prompter
                .input(&format!("What is the name of this {}?", name_noun(kind)))?;
            branch_name(kind, &answer)
        })?;

        ui::display_status(&format!("Creating {} from {}", name, base));
        pipeline
            .step("publish branch", self.deps.repo.publish_branch(&name))
            .await?;
        pipeline.finish();

        ui::display_success(&format!("Started {} {}", kind.noun(), name));
        Ok(name)
    }

    /// Build, stage, commit with a conventional message and push.
    ///
    /// Refuses to commit on either permanent branch. Returns the message used.
    pub async fn commit(&self) -> Result<String> {
        let mut pipeline = Pipeline::new("commit");

        pipeline.step("pull", self.deps.repo.pull()).await?;

        let branch = pipeline
            .step("read branch", self.deps.repo.current_branch())
            .await?;
        pipeline.check("check branch", || {
            if branch == self.branches.development || branch == self.branches.master {
                return Err(FlowError::precondition(format!(
                    "You can't commit directly to {}",
                    branch
                )));
            }
            Ok(())
        })?;

        pipeline.step("build", self.run_build()).await?;
        pipeline.step("stage", self.deps.repo.stage_all()).await?;

        let message = pipeline.check("compose message", || {
            self.ask_commit_message()?.render()
        })?;

        ui::display_status("Committing changes");
        pipeline.step("commit", self.deps.repo.commit(&message)).await?;
        ui::display_status("Pushing to remote");
        pipeline.step("push", self.deps.repo.push()).await?;
        pipeline.finish();

        ui::display_success(&format!("Committed and pushed {}", branch));
        Ok(message)
    }

    pub async fn finish_feature(&self) -> Result<FinishOutcome> {
        self.finish(BranchKind::Feature).await
    }

    pub async fn finish_hotfix(&self) -> Result<FinishOutcome> {
        self.finish(BranchKind::Hotfix).await
    }

    pub async fn finish_release(&self) -> Result<FinishOutcome> {
        self.finish(BranchKind::Release).await
    }

    /// Bump, commit and push the current `kind` branch, request its merge and
    /// return to the development branch.
    pub async fn finish(&self, kind: BranchKind) -> Result<FinishOutcome> {
        let destination = match kind {
            BranchKind::Feature => self.branches.development.clone(),
            BranchKind::Hotfix | BranchKind::Release => self.branches.master.clone(),
        };
        let mut pipeline = Pipeline::new(finish_flow(kind));

        let branch = pipeline
            .step("read branch", self.deps.repo.current_branch())
            .await?;
        pipeline.check("check branch", || {
            if !branch.starts_with(kind.prefix()) {
                return Err(FlowError::precondition(format!(
                    "You're not currently working on a {}! ({} does not start with {})",
                    kind.noun(),
                    branch,
                    kind.prefix()
                )));
            }
            self.deps.reviews.ensure_ready()
        })?;

        let bump = pipeline.check("choose bump", || self.ask_bump_kind(kind))?;
        let version = pipeline.check("bump version", || self.deps.versions.bump(&bump))?;
        ui::display_status(&format!("Version is now {}", version));

        pipeline.step("commit", self.commit()).await?;

        let request = ReviewRequest::finishing(kind, &branch, &destination);
        ui::display_status(&request.title);
        let review = pipeline
            .step("open review", self.deps.reviews.open_review_request(&request))
            .await?;
        ui::display_success(&format!("Review request #{} opened: {}", review.id, review.url));

        pipeline
            .step("checkout development", self.deps.repo.checkout(&self.branches.development))
            .await?;
        pipeline.finish();

        Ok(FinishOutcome {
            branch,
            version,
            review,
        })
    }

    /// Apply `kind` to the project version. `dev` writes nothing.
    pub fn bump(&self, kind: &BumpKind) -> Result<Version> {
        if !kind.is_mutating() {
            notify::send(
                self.deps.notifier.as_ref(),
                "Dev Build",
                "Since this is a dev build we won't bump the version",
            );
        }
        self.deps.versions.bump(kind)
    }

    pub fn version(&self) -> Result<Version> {
        self.deps.versions.current_version()
    }

    /// `<name> Version: <version>`, naming the project after `configured`,
    /// then the version store, then `Project`
    pub fn version_line(&self, configured: Option<&str>) -> Result<String> {
        let version = self.version()?;
        let name = match configured {
            Some(name) => name.to_string(),
            None => self
                .deps
                .versions
                .project_name()?
                .unwrap_or_else(|| "Project".to_string()),
        };
        Ok(format!("{} Version: {}", name, version))
    }

    fn base_of(&self, kind: BranchKind) -> &str {
        match kind {
            BranchKind::Feature | BranchKind::Release => &self.branches.development,
            BranchKind::Hotfix => &self.branches.master,
        }
    }

    fn ask_bump_kind(&self, kind: BranchKind) -> Result<BumpKind> {
        let choices = match kind {
            // Hot fixes are always patch releases
            BranchKind::Hotfix => return Ok(BumpKind::Patch),
            BranchKind::Feature => FEATURE_BUMPS,
            BranchKind::Release => RELEASE_BUMPS,
        };
        let answer = self
            .deps
            .prompter
            .select(&format!("What type of {} is this?", kind.noun()), choices)?;
        answer.parse()
    }

    fn ask_commit_message(&self) -> Result<CommitMessage> {
        let prompter = &self.deps.prompter;
        let types: Vec<&str> = CommitType::ALL.iter().map(CommitType::as_str).collect();

        Ok(CommitMessage {
            r#type: prompter
                .select("What type of commit is this?", &types)?
                .parse()?,
            scope: prompter.input("What area was this change in?")?,
            subject: prompter.input("Brief description of this commit")?,
            body: prompter
                .input("Please detail your change(s) (You can force a newline by adding \\n)")?,
            breaks: prompter.input("What does this change break? (Separate values with commas)")?,
            closes: prompter.input(
                "What issues does this change close? (Separate values with commas)\n\
                 Example: [Closes: #67719970], [Finishes: #67719983]",
            )?,
        })
    }

    async fn run_build(&self) -> Result<()> {
        if self.build_policy == BuildPolicy::Skip {
            tracing::info!("build skipped by policy");
            return Ok(());
        }

        ui::display_status("Running build");
        match self.deps.builder.run().await {
            Ok(BuildOutcome::Passed) => Ok(()),
            Ok(BuildOutcome::NotConfigured) => {
                ui::display_boundary_warning(&BoundaryWarning::NoBuildCommand);
                Ok(())
            }
            Err(e) if self.build_policy == BuildPolicy::Warn => {
                ui::display_boundary_warning(&BoundaryWarning::BuildFailed {
                    reason: e.to_string(),
                });
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

fn start_flow(kind: BranchKind) -> &'static str {
    match kind {
        BranchKind::Feature => "start-feature",
        BranchKind::Hotfix => "start-hotfix",
        BranchKind::Release => "start-release",
    }
}

fn finish_flow(kind: BranchKind) -> &'static str {
    match kind {
        BranchKind::Feature => "finish-feature",
        BranchKind::Hotfix => "finish-hotfix",
        BranchKind::Release => "finish-release",
    }
}

fn name_noun(kind: BranchKind) -> &'static str {
    match kind {
        BranchKind::Hotfix => "hotfix",
        other => other.noun(),
    }
}
