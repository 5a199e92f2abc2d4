use crate::error::{FlowError, Result};
use std::fmt;

/// Kind of short-lived branch, identified by its name prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchKind {
    Feature,
    Hotfix,
    Release,
}

impl BranchKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            BranchKind::Feature => "feature-",
            BranchKind::Hotfix => "hotfix-",
            BranchKind::Release => "release-",
        }
    }

    /// Word used when talking to the operator ("feature", "hot fix", "release")
    pub fn noun(&self) -> &'static str {
        match self {
            BranchKind::Feature => "feature",
            BranchKind::Hotfix => "hot fix",
            BranchKind::Release => "release",
        }
    }

    /// Title used in review-request bodies
    pub fn title(&self) -> &'static str {
        match self {
            BranchKind::Feature => "Feature",
            BranchKind::Hotfix => "Hot Fix",
            BranchKind::Release => "Release",
        }
    }

    /// Classify a branch name by prefix
    pub fn of(branch: &str) -> Option<Self> {
        [BranchKind::Feature, BranchKind::Hotfix, BranchKind::Release]
            .into_iter()
            .find(|kind| branch.starts_with(kind.prefix()))
    }
}

impl fmt::Display for BranchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun())
    }
}

/// Lowercase the name and replace every character outside `[a-z0-9-]` with `-`
pub fn slugify(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Build a prefixed branch name from operator input
pub fn branch_name(kind: BranchKind, raw: &str) -> Result<String> {
    if raw.trim().is_empty() {
        return Err(FlowError::validation(format!(
            "The {} name cannot be empty",
            kind.noun()
        )));
    }
    Ok(format!("{}{}", kind.prefix(), slugify(raw)))
}

/// Turn `feature-login-page` into `login page`
pub fn humanize(kind: BranchKind, branch: &str) -> String {
    branch
        .strip_prefix(kind.prefix())
        .unwrap_or(branch)
        .replace('-', " ")
}

/// Snapshot of the working copy, read fresh before every check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoState {
    pub branch: String,
    /// Short-form status output; empty means clean
    pub status: String,
}

impl RepoState {
    pub fn is_clean(&self) -> bool {
        self.status.trim().is_empty()
    }
}
