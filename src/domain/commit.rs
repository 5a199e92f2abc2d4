//! Conventional commit messages assembled from operator answers

use crate::error::{FlowError, Result};
use regex::Regex;
use std::fmt;
use std::str::FromStr;

/// Commit types offered to the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitType {
    Feat,
    Fix,
    Docs,
    Style,
    Refactor,
    Perf,
    Test,
    Chore,
}

impl CommitType {
    pub const ALL: [CommitType; 8] = [
        CommitType::Feat,
        CommitType::Fix,
        CommitType::Docs,
        CommitType::Style,
        CommitType::Refactor,
        CommitType::Perf,
        CommitType::Test,
        CommitType::Chore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommitType::Feat => "feat",
            CommitType::Fix => "fix",
            CommitType::Docs => "docs",
            CommitType::Style => "style",
            CommitType::Refactor => "refactor",
            CommitType::Perf => "perf",
            CommitType::Test => "test",
            CommitType::Chore => "chore",
        }
    }
}

impl FromStr for CommitType {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self> {
        CommitType::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| FlowError::validation(format!("Unknown commit type: '{}'", s)))
    }
}

impl fmt::Display for CommitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw answers collected for one commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMessage {
    pub r#type: CommitType,
    pub scope: String,
    pub subject: String,
    /// May contain literal `\n` markers typed by the operator
    pub body: String,
    /// Comma-separated breaking-change notes
    pub breaks: String,
    /// Comma-separated issue references
    pub closes: String,
}

impl CommitMessage {
    /// Render the final message text.
    ///
    /// Sections are separated by a blank line; empty sections are left out.
    /// Quotes are kept verbatim because the message is handed to git as a
    /// single argument, never through a shell.
    pub fn render(&self) -> Result<String> {
        let subject = self.subject.trim();
        if subject.is_empty() {
            return Err(FlowError::validation("The commit subject cannot be empty"));
        }

        let scope = self.scope.trim();
        let header = if scope.is_empty() {
            format!("{}: {}", self.r#type, subject)
        } else {
            format!("{}({}): {}", self.r#type, scope, subject)
        };

        let mut sections = vec![header];
        for section in [
            expand_newlines(&self.body),
            one_per_line(&self.breaks),
            one_per_line(&self.closes),
        ] {
            if !section.trim().is_empty() {
                sections.push(section);
            }
        }

        Ok(sections.join("\n\n"))
    }
}

/// Convert literal `\n` markers (optionally followed by a space) into line breaks
fn expand_newlines(text: &str) -> String {
    match Regex::new(r"\\n ?") {
        Ok(re) => re.replace_all(text.trim(), "\n").into_owned(),
        Err(_) => text.trim().replace("\\n", "\n"),
    }
}

/// Reformat a comma-separated list as one item per line
fn one_per_line(list: &str) -> String {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
