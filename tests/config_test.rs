// tests/config_test.rs
use std::io::Write;
use std::path::{Path, PathBuf};

use gitflow::config::{load_config, BuildPolicy, Config};
use gitflow::forge::GitHubGateway;
use serial_test::serial;
use std::time::Duration;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_load_from_file() {
    let file = write_config(
        r#"
project_name = "Blurr"

[branches]
development = "develop"
master = "main"
remote = "upstream"

[manifests]
files = ["package.json"]

[forge]
owner = "acme"
repo = "widgets"
api_base = "https://github.example.com/api/v3"

[build]
command = ["npm", "test"]
policy = "skip"

[notifications]
command = ["notify-send"]

[timeouts]
git_secs = 60
"#,
    );

    let config = load_config(Some(file.path())).unwrap();
    assert_eq!(config.project_name.as_deref(), Some("Blurr"));
    assert_eq!(config.branches.development, "develop");
    assert_eq!(config.branches.master, "main");
    assert_eq!(config.branches.remote, "upstream");
    assert_eq!(config.manifests.files, vec![PathBuf::from("package.json")]);
    assert_eq!(config.forge.owner.as_deref(), Some("acme"));
    assert_eq!(config.forge.token_env, "GITFLOW_TOKEN");
    assert_eq!(config.build.command, vec!["npm", "test"]);
    assert_eq!(config.build.policy, BuildPolicy::Skip);
    assert!(config.notifications.enabled);
    assert_eq!(config.timeouts.git_secs, 60);
    assert_eq!(config.timeouts.http_secs, 30);
}

#[test]
fn test_partial_file_keeps_defaults() {
    let file = write_config("[branches]\nmaster = \"main\"\n");
    let config = load_config(Some(file.path())).unwrap();
    assert_eq!(config.branches.master, "main");
    assert_eq!(config.branches.development, "development");
    assert_eq!(config.manifests.files.len(), 2);
}

#[test]
fn test_invalid_file_is_config_error() {
    let file = write_config("[build]\npolicy = \"sometimes\"\n");
    let err = load_config(Some(file.path())).unwrap_err();
    assert!(err.to_string().starts_with("Configuration error"));
}

#[test]
fn test_missing_explicit_file_is_error() {
    assert!(load_config(Some(Path::new("/nonexistent/gitflow.toml"))).is_err());
}

#[test]
#[serial]
fn test_token_comes_from_environment() {
    let mut config = Config::default();
    config.forge.owner = Some("acme".to_string());
    config.forge.repo = Some("widgets".to_string());
    config.forge.token_env = "GITFLOW_TEST_TOKEN".to_string();

    std::env::remove_var("GITFLOW_TEST_TOKEN");
    assert!(config.forge.token().is_err());
    assert!(GitHubGateway::from_config(&config.forge, Duration::from_secs(5)).is_err());

    std::env::set_var("GITFLOW_TEST_TOKEN", "  abc123\n");
    assert_eq!(config.forge.token().unwrap(), "abc123");
    assert!(GitHubGateway::from_config(&config.forge, Duration::from_secs(5)).is_ok());
    std::env::remove_var("GITFLOW_TEST_TOKEN");
}

#[test]
#[serial]
fn test_repository_required_for_reviews() {
    std::env::set_var("GITFLOW_TOKEN", "abc123");
    let config = Config::default();
    assert!(config.forge.repository().is_err());
    assert!(GitHubGateway::from_config(&config.forge, Duration::from_secs(5)).is_err());
    std::env::remove_var("GITFLOW_TOKEN");
}
