//! Project version storage
//!
//! - [manifest::ManifestVersionStore]: JSON manifests on disk kept in sync
//! - [mock::MemoryVersionStore]: in-memory implementation for testing

pub mod manifest;
pub mod mock;

pub use manifest::ManifestVersionStore;
pub use mock::MemoryVersionStore;

use crate::domain::{BumpKind, Version};
use crate::error::Result;

pub trait VersionStore: Send + Sync {
    /// Read the current project version
    fn current_version(&self) -> Result<Version>;

    /// Persist `version` everywhere it is recorded, all or nothing
    fn write_version(&self, version: &Version) -> Result<()>;

    /// Project name recorded next to the version, if the store keeps one
    fn project_name(&self) -> Result<Option<String>> {
        Ok(None)
    }

    /// Apply `kind` to the current version and persist the result.
    ///
    /// `BumpKind::Dev` writes nothing and returns the current version.
    fn bump(&self, kind: &BumpKind) -> Result<Version> {
        let current = self.current_version()?;
        if !kind.is_mutating() {
            return Ok(current);
        }

        let next = current.bump(kind)?;
        self.write_version(&next)?;
        tracing::info!(from = %current, to = %next, "version bumped");
        Ok(next)
    }
}
