//! Pre-release labels recognised by the bump command
//!
//! A label is appended to the numeric triple (`1.4.0-beta`). Applying a label
//! always replaces whatever label the version carried before.

use crate::error::{FlowError, Result};
use std::fmt;
use std::str::FromStr;

/// Pre-release label attached to a version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreReleaseLabel {
    Alpha,
    Beta,
    Release,
    Hotfix,
    Feature,
}

impl PreReleaseLabel {
    /// Every label, in the order they are offered to the operator
    pub const ALL: [PreReleaseLabel; 5] = [
        PreReleaseLabel::Alpha,
        PreReleaseLabel::Beta,
        PreReleaseLabel::Release,
        PreReleaseLabel::Hotfix,
        PreReleaseLabel::Feature,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PreReleaseLabel::Alpha => "alpha",
            PreReleaseLabel::Beta => "beta",
            PreReleaseLabel::Release => "release",
            PreReleaseLabel::Hotfix => "hotfix",
            PreReleaseLabel::Feature => "feature",
        }
    }
}

impl FromStr for PreReleaseLabel {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "alpha" => Ok(PreReleaseLabel::Alpha),
            "beta" => Ok(PreReleaseLabel::Beta),
            "release" => Ok(PreReleaseLabel::Release),
            "hotfix" => Ok(PreReleaseLabel::Hotfix),
            "feature" => Ok(PreReleaseLabel::Feature),
            _ => Err(FlowError::validation(format!(
                "Unknown pre-release label: '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for PreReleaseLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
