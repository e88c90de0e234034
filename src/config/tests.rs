//! Tests for layered configuration.

use camino::Utf8PathBuf;
use rstest::rstest;
use std::time::Duration;

use super::AppConfig;

fn write_config(contents: &str) -> Utf8PathBuf {
    let dir = Utf8PathBuf::from_path_buf(std::env::temp_dir()).expect("utf-8 temp dir");
    let path = dir.join(format!("supabridge-{}.toml", uuid::Uuid::new_v4().simple()));
    std::fs::write(&path, contents).expect("write config");
    path
}

#[rstest]
fn defaults_apply_without_a_file() {
    let config = AppConfig::load(None).expect("defaults load");

    assert_eq!(config.poll_policy().interval(), Duration::from_secs(2));
    assert_eq!(config.poll_policy().max_attempts(), 90);
    assert_eq!(config.schema_cache_ttl(), Duration::from_secs(300));
    assert_eq!(config.credentials_dir.as_str(), ".supabridge");
    assert!(config.obfuscator().is_none());
}

#[rstest]
fn file_values_override_defaults() {
    let path = write_config(
        r#"
bind_address = "0.0.0.0:9000"
credentials_secret = "hunter2"

[poll]
interval_ms = 50
max_attempts = 3
"#,
    );

    let config = AppConfig::load(Some(&path)).expect("file loads");
    std::fs::remove_file(&path).expect("remove config");

    assert_eq!(config.bind_address.port(), 9000);
    assert_eq!(config.poll_policy().interval(), Duration::from_millis(50));
    assert_eq!(config.poll_policy().max_attempts(), 3);
    assert!(config.obfuscator().is_some());
    assert_eq!(
        config.oauth_urls().authorize_url.as_str(),
        "https://api.supabase.com/v1/oauth/authorize"
    );
}

#[rstest]
fn explicit_file_must_exist() {
    let missing = Utf8PathBuf::from("/nonexistent/supabridge-missing.toml");

    assert!(AppConfig::load(Some(&missing)).is_err());
}

#[rstest]
fn malformed_values_are_rejected() {
    let path = write_config("bind_address = \"not an address\"\n");

    let result = AppConfig::load(Some(&path));
    std::fs::remove_file(&path).expect("remove config");

    assert!(result.is_err());
}
