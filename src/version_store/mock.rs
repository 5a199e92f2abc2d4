use std::sync::{Mutex, MutexGuard};

use crate::domain::Version;
use crate::error::{FlowError, Result};
use crate::version_store::VersionStore;

#[derive(Debug)]
struct Inner {
    version: Version,
    writes: Vec<Version>,
    fail_writes: bool,
}

/// Version store kept in memory, recording every write
#[derive(Debug)]
pub struct MemoryVersionStore {
    inner: Mutex<Inner>,
}

impl MemoryVersionStore {
    pub fn new(version: Version) -> Self {
        MemoryVersionStore {
            inner: Mutex::new(Inner {
                version,
                writes: Vec::new(),
                fail_writes: false,
            }),
        }
    }

    /// Make every write fail with a manifest write error
    pub fn failing_writes(self) -> Self {
        self.lock().fail_writes = true;
        self
    }

    pub fn writes(&self) -> Vec<Version> {
        self.lock().writes.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl VersionStore for MemoryVersionStore {
    fn current_version(&self) -> Result<Version> {
        Ok(self.lock().version.clone())
    }

    fn write_version(&self, version: &Version) -> Result<()> {
        let mut inner = self.lock();
        if inner.fail_writes {
            return Err(FlowError::manifest_write("package.json", "simulated failure"));
        }
        inner.version = version.clone();
        inner.writes.push(version.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BumpKind, PreReleaseLabel};

    #[test]
    fn test_bump_writes_once() {
        let store = MemoryVersionStore::new(Version::new(1, 0, 0));
        assert_eq!(store.bump(&BumpKind::Minor).unwrap(), Version::new(1, 1, 0));
        assert_eq!(store.writes(), vec![Version::new(1, 1, 0)]);
    }

    #[test]
    fn test_dev_bump_writes_nothing() {
        let store = MemoryVersionStore::new(Version::new(1, 0, 0));
        assert_eq!(store.bump(&BumpKind::Dev).unwrap(), Version::new(1, 0, 0));
        assert!(store.writes().is_empty());
    }

    #[test]
    fn test_label_bump_twice_matches_once() {
        let store = MemoryVersionStore::new(Version::new(2, 4, 1));
        let kind = BumpKind::Label(PreReleaseLabel::Alpha);
        let once = store.bump(&kind).unwrap();
        let twice = store.bump(&kind).unwrap();
        assert_eq!(once, twice);
        assert_eq!(twice.to_string(), "2.4.1-alpha");
    }

    #[test]
    fn test_failing_write_propagates() {
        let store = MemoryVersionStore::new(Version::new(1, 0, 0)).failing_writes();
        assert!(matches!(
            store.bump(&BumpKind::Patch),
            Err(FlowError::ManifestWrite { .. })
        ));
        assert_eq!(store.current_version().unwrap(), Version::new(1, 0, 0));
    }
}
