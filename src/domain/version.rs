use crate::domain::PreReleaseLabel;
use crate::error::{FlowError, Result};
use std::fmt;
use std::str::FromStr;

/// Semantic version representation
///
/// `pre` holds the pre-release part after `-`, `build` the metadata after `+`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre: Option<String>,
    pub build: Option<String>,
}

impl Version {
    /// Create a new version without pre-release or build metadata
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            pre: None,
            build: None,
        }
    }

    /// Parse a version string of the form `MAJOR.MINOR.PATCH[-pre][+build]`
    ///
    /// Prefixes such as `v` are not accepted.
    pub fn parse(s: &str) -> Result<Self> {
        let parsed = semver::Version::parse(s.trim()).map_err(|e| {
            FlowError::validation(format!(
                "'{}' is not a MAJOR.MINOR.PATCH[-prerelease][+build] version: {}",
                s, e
            ))
        })?;

        Ok(Version {
            major: parsed.major,
            minor: parsed.minor,
            patch: parsed.patch,
            pre: (!parsed.pre.is_empty()).then(|| parsed.pre.to_string()),
            build: (!parsed.build.is_empty()).then(|| parsed.build.to_string()),
        })
    }

    /// Same numeric triple with label and build metadata dropped
    pub fn base(&self) -> Self {
        Version::new(self.major, self.minor, self.patch)
    }

    /// Apply a bump and return the resulting version
    ///
    /// A numeric component already at `u64::MAX` cannot be incremented.
    pub fn bump(&self, kind: &BumpKind) -> Result<Self> {
        let next = match kind {
            BumpKind::Major => Version::new(increment(self.major, "major", self)?, 0, 0),
            BumpKind::Minor => Version::new(self.major, increment(self.minor, "minor", self)?, 0),
            BumpKind::Patch => {
                Version::new(self.major, self.minor, increment(self.patch, "patch", self)?)
            }
            BumpKind::Label(label) => Version {
                pre: Some(label.to_string()),
                ..self.base()
            },
            BumpKind::Literal(version) => version.clone(),
            BumpKind::Dev => self.clone(),
        };
        Ok(next)
    }
}

fn increment(component: u64, name: &str, version: &Version) -> Result<u64> {
    component.checked_add(1).ok_or_else(|| {
        FlowError::validation(format!(
            "Cannot bump the {} component of {} any further",
            name, version
        ))
    })
}

impl FromStr for Version {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.pre {
            write!(f, "-{}", pre)?;
        }
        if let Some(build) = &self.build {
            write!(f, "+{}", build)?;
        }
        Ok(())
    }
}

/// Requested kind of version change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BumpKind {
    Major,
    Minor,
    Patch,
    /// Re-label the current numeric triple
    Label(PreReleaseLabel),
    /// Replace the version outright
    Literal(Version),
    /// Leave the version untouched
    Dev,
}

impl BumpKind {
    /// Whether applying this kind writes the manifests
    pub fn is_mutating(&self) -> bool {
        !matches!(self, BumpKind::Dev)
    }
}

impl FromStr for BumpKind {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "dev" => return Ok(BumpKind::Dev),
            "major" => return Ok(BumpKind::Major),
            "minor" => return Ok(BumpKind::Minor),
            "patch" => return Ok(BumpKind::Patch),
            _ => {}
        }

        if let Ok(label) = trimmed.parse::<PreReleaseLabel>() {
            return Ok(BumpKind::Label(label));
        }

        Version::parse(trimmed)
            .map(BumpKind::Literal)
            .map_err(|_| FlowError::validation(format!("'{}' is not a valid bump kind", s)))
    }
}

impl fmt::Display for BumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BumpKind::Major => f.write_str("major"),
            BumpKind::Minor => f.write_str("minor"),
            BumpKind::Patch => f.write_str("patch"),
            BumpKind::Label(label) => write!(f, "{}", label),
            BumpKind::Literal(version) => write!(f, "{}", version),
            BumpKind::Dev => f.write_str("dev"),
        }
    }
}
