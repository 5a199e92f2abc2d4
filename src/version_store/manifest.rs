use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tempfile::NamedTempFile;

use crate::boundary::BoundaryWarning;
use crate::domain::Version;
use crate::error::{FlowError, Result};
use crate::ui;
use crate::version_store::VersionStore;

type Manifest = Map<String, Value>;

/// Version store over JSON manifests holding a `version` field.
///
/// The first file is authoritative for reads; writes go to every file.
#[derive(Debug, Clone)]
pub struct ManifestVersionStore {
    files: Vec<PathBuf>,
}

impl ManifestVersionStore {
    /// Resolve `files` against `root`
    pub fn new(root: impl AsRef<Path>, files: &[PathBuf]) -> Result<Self> {
        if files.is_empty() {
            return Err(FlowError::config(
                "[manifests] files must name at least one file",
            ));
        }

        Ok(ManifestVersionStore {
            files: files.iter().map(|f| root.as_ref().join(f)).collect(),
        })
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}

fn read_manifest(path: &Path) -> Result<Manifest> {
    let text = fs::read_to_string(path).map_err(|e| FlowError::manifest_read(path, e))?;
    parse_manifest(path, &text)
}

fn parse_manifest(path: &Path, text: &str) -> Result<Manifest> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(FlowError::manifest_read(path, "expected a JSON object")),
        Err(e) => Err(FlowError::manifest_read(path, e)),
    }
}

fn version_of(path: &Path, manifest: &Manifest) -> Result<Version> {
    let raw = manifest
        .get("version")
        .and_then(Value::as_str)
        .ok_or_else(|| FlowError::manifest_read(path, "missing string field \"version\""))?;
    Version::parse(raw).map_err(|e| FlowError::manifest_read(path, e))
}

fn render(manifest: &Manifest) -> Result<String> {
    let mut text = serde_json::to_string_pretty(manifest)
        .map_err(|e| FlowError::validation(format!("cannot serialize manifest: {}", e)))?;
    text.push('\n');
    Ok(text)
}

type Staged<'a> = (&'a PathBuf, String, NamedTempFile);

/// Move staged files over their targets in order. On the first failure the
/// targets already replaced get their original content back.
fn replace_all<F>(staged: Vec<Staged<'_>>, mut persist: F) -> Result<()>
where
    F: FnMut(NamedTempFile, &Path) -> io::Result<()>,
{
    let mut replaced: Vec<(&PathBuf, String)> = Vec::new();
    for (path, original, tmp) in staged {
        if let Err(e) = persist(tmp, path) {
            for (done, previous) in &replaced {
                if let Err(restore) = fs::write(done, previous) {
                    tracing::error!(
                        path = %done.display(),
                        error = %restore,
                        "could not restore manifest"
                    );
                }
            }
            return Err(FlowError::manifest_write(path, e));
        }
        replaced.push((path, original));
    }
    Ok(())
}

impl VersionStore for ManifestVersionStore {
    fn current_version(&self) -> Result<Version> {
        let primary = &self.files[0];
        let version = version_of(primary, &read_manifest(primary)?)?;

        for secondary in &self.files[1..] {
            let other = version_of(secondary, &read_manifest(secondary)?)?;
            if other != version {
                ui::display_boundary_warning(&BoundaryWarning::ManifestsOutOfSync {
                    primary: primary.display().to_string(),
                    secondary: secondary.display().to_string(),
                    secondary_version: other.to_string(),
                });
            }
        }

        Ok(version)
    }

    /// The `name` field of the primary manifest
    fn project_name(&self) -> Result<Option<String>> {
        let manifest = read_manifest(&self.files[0])?;
        Ok(manifest
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    /// Every manifest is rendered into a temporary file next to it before any
    /// of them is replaced. If a replacement fails, files already replaced
    /// are restored to their previous content.
    fn write_version(&self, version: &Version) -> Result<()> {
        let mut staged = Vec::with_capacity(self.files.len());
        for path in &self.files {
            let original =
                fs::read_to_string(path).map_err(|e| FlowError::manifest_read(path, e))?;
            let mut manifest = parse_manifest(path, &original)?;
            manifest.insert("version".to_string(), Value::String(version.to_string()));

            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let mut tmp =
                NamedTempFile::new_in(dir).map_err(|e| FlowError::manifest_write(path, e))?;
            tmp.write_all(render(&manifest)?.as_bytes())
                .and_then(|_| tmp.flush())
                .map_err(|e| FlowError::manifest_write(path, e))?;
            staged.push((path, original, tmp));
        }

        replace_all(staged, |tmp, path| tmp.persist(path).map(drop).map_err(|e| e.error))?;

        tracing::debug!(%version, files = self.files.len(), "manifests written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup(version: &str) -> (TempDir, ManifestVersionStore) {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("package.json"),
            format!("{{\n  \"name\": \"blurr\",\n  \"version\": \"{}\"\n}}\n", version),
        )
        .unwrap();
        fs::write(
            dir.path().join("bower.json"),
            format!("{{\"version\": \"{}\", \"main\": \"index.js\"}}", version),
        )
        .unwrap();
        let store = ManifestVersionStore::new(
            dir.path(),
            &[PathBuf::from("package.json"), PathBuf::from("bower.json")],
        )
        .unwrap();
        (dir, store)
    }

    #[test]
    fn test_current_version() {
        let (_dir, store) = setup("1.2.3");
        assert_eq!(store.current_version().unwrap(), Version::new(1, 2, 3));
        assert_eq!(store.project_name().unwrap().as_deref(), Some("blurr"));
    }

    #[test]
    fn test_write_keeps_key_order_and_other_fields() {
        let (dir, store) = setup("1.2.3");
        store.write_version(&Version::new(1, 3, 0)).unwrap();

        let bower = fs::read_to_string(dir.path().join("bower.json")).unwrap();
        assert_eq!(bower, "{\n  \"version\": \"1.3.0\",\n  \"main\": \"index.js\"\n}\n");
    }

    #[test]
    fn test_failed_replace_restores_earlier_files() {
        let (dir, store) = setup("1.2.3");
        let package_before = fs::read_to_string(dir.path().join("package.json")).unwrap();
        let bower_before = fs::read_to_string(dir.path().join("bower.json")).unwrap();

        let staged = store
            .files()
            .iter()
            .map(|path| {
                let original = fs::read_to_string(path).unwrap();
                let mut tmp = NamedTempFile::new_in(dir.path()).unwrap();
                tmp.write_all(b"{\"version\": \"9.9.9\"}\n").unwrap();
                (path, original, tmp)
            })
            .collect();

        let mut calls = 0;
        let err = replace_all(staged, |tmp, path| {
            calls += 1;
            if calls == 2 {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
            }
            tmp.persist(path).map(drop).map_err(|e| e.error)
        })
        .unwrap_err();

        assert!(matches!(err, FlowError::ManifestWrite { .. }));
        assert!(err.to_string().contains("bower.json"));
        assert_eq!(
            fs::read_to_string(dir.path().join("package.json")).unwrap(),
            package_before
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("bower.json")).unwrap(),
            bower_before
        );
        assert_eq!(store.current_version().unwrap(), Version::new(1, 2, 3));
    }

    #[test]
    fn test_empty_file_list_rejected() {
        assert!(ManifestVersionStore::new(".", &[]).is_err());
    }

    #[test]
    fn test_non_object_manifest() {
        let (dir, store) = setup("1.0.0");
        fs::write(dir.path().join("package.json"), "[1, 2]").unwrap();
        assert!(matches!(
            store.current_version(),
            Err(FlowError::ManifestRead { .. })
        ));
    }
}
