// tests/version_store_test.rs
use std::fs;
use std::path::PathBuf;

use gitflow::domain::{BumpKind, Version};
use gitflow::version_store::{ManifestVersionStore, VersionStore};
use gitflow::FlowError;
use tempfile::TempDir;

fn project(version: &str) -> (TempDir, ManifestVersionStore) {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("package.json"),
        format!(
            "{{\n  \"name\": \"blurr\",\n  \"version\": \"{}\",\n  \"private\": true\n}}\n",
            version
        ),
    )
    .unwrap();
    fs::write(
        dir.path().join("bower.json"),
        format!("{{\n  \"name\": \"blurr\",\n  \"version\": \"{}\"\n}}\n", version),
    )
    .unwrap();
    let store = ManifestVersionStore::new(
        dir.path(),
        &[PathBuf::from("package.json"), PathBuf::from("bower.json")],
    )
    .unwrap();
    (dir, store)
}

fn version_in(dir: &TempDir, file: &str) -> String {
    let text = fs::read_to_string(dir.path().join(file)).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    json["version"].as_str().unwrap().to_string()
}

#[test]
fn test_numeric_bumps_reset_lower_fields() {
    let (dir, store) = project("1.4.7");
    assert_eq!(store.bump(&BumpKind::Minor).unwrap(), Version::new(1, 5, 0));
    assert_eq!(store.bump(&BumpKind::Major).unwrap(), Version::new(2, 0, 0));
    assert_eq!(version_in(&dir, "package.json"), "2.0.0");
    assert_eq!(version_in(&dir, "bower.json"), "2.0.0");
}

#[test]
fn test_two_patches_add_two() {
    for start in ["0.0.0", "1.9.9", "3.2.1-beta"] {
        let (_dir, store) = project(start);
        let before = store.current_version().unwrap();
        store.bump(&BumpKind::Patch).unwrap();
        let after = store.bump(&BumpKind::Patch).unwrap();
        assert_eq!(after.major, before.major);
        assert_eq!(after.minor, before.minor);
        assert_eq!(after.patch, before.patch + 2);
        assert_eq!(after.pre, None);
    }
}

#[test]
fn test_label_does_not_layer() {
    let (dir, store) = project("1.2.3-beta");
    let kind: BumpKind = "alpha".parse().unwrap();
    store.bump(&kind).unwrap();
    store.bump(&kind).unwrap();
    assert_eq!(version_in(&dir, "package.json"), "1.2.3-alpha");
    assert_eq!(version_in(&dir, "bower.json"), "1.2.3-alpha");
}

#[test]
fn test_literal_versions() {
    let (dir, store) = project("1.0.0");
    let kind: BumpKind = "2.0.0-rc.1+build.5".parse().unwrap();
    store.bump(&kind).unwrap();
    assert_eq!(version_in(&dir, "package.json"), "2.0.0-rc.1+build.5");

    for bad in ["1.2", "1.2.3.4", "v1.2.3", "banana"] {
        assert!(
            matches!(bad.parse::<BumpKind>(), Err(FlowError::Validation(_))),
            "{} should be rejected",
            bad
        );
    }
}

#[test]
fn test_dev_leaves_files_untouched() {
    let (dir, store) = project("1.0.0");
    let before = fs::read_to_string(dir.path().join("package.json")).unwrap();
    assert_eq!(store.bump(&BumpKind::Dev).unwrap(), Version::new(1, 0, 0));
    assert_eq!(
        fs::read_to_string(dir.path().join("package.json")).unwrap(),
        before
    );
}

#[test]
fn test_other_fields_survive() {
    let (dir, store) = project("1.0.0");
    store.bump(&BumpKind::Patch).unwrap();
    let text = fs::read_to_string(dir.path().join("package.json")).unwrap();
    assert_eq!(
        text,
        "{\n  \"name\": \"blurr\",\n  \"version\": \"1.0.1\",\n  \"private\": true\n}\n"
    );
    assert_eq!(store.project_name().unwrap().as_deref(), Some("blurr"));
}

#[test]
fn test_missing_manifest_is_read_error() {
    let (dir, store) = project("1.0.0");
    fs::remove_file(dir.path().join("bower.json")).unwrap();
    assert!(matches!(
        store.bump(&BumpKind::Minor),
        Err(FlowError::ManifestRead { .. })
    ));
    // Nothing was written to the file that still exists
    assert_eq!(version_in(&dir, "package.json"), "1.0.0");
}

#[test]
fn test_malformed_manifest_is_read_error() {
    let (dir, store) = project("1.0.0");
    fs::write(dir.path().join("package.json"), "{ not json").unwrap();
    assert!(matches!(
        store.current_version(),
        Err(FlowError::ManifestRead { .. })
    ));
}

#[test]
fn test_out_of_sync_manifests_follow_primary() {
    let (dir, store) = project("1.0.0");
    fs::write(dir.path().join("bower.json"), "{\"version\": \"0.9.0\"}").unwrap();
    assert_eq!(store.current_version().unwrap(), Version::new(1, 0, 0));
    store.bump(&BumpKind::Minor).unwrap();
    assert_eq!(version_in(&dir, "bower.json"), "1.1.0");
}
