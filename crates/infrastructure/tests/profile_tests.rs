use anyhow::Result;
use domain::config::*;
use infrastructure::config::{ConfigLoader, ConfigSource};
use serial_test::serial;
use std::env;
use tempfile::TempDir;
use tokio::fs;

const PREFIX: &str = "DMS_SEARCH_PROFILE_TESTS_";

const VARS: &[&str] = &[
    "ENV",
    "BASE_URL",
    "TOKEN",
    "TIMEOUT_MS",
    "DEBOUNCE_MS",
    "MIN_QUERY_LEN",
    "LOG_LEVEL",
    "LOG_JSON",
];

fn var(name: &str) -> String {
    format!("{PREFIX}{name}")
}

fn clear_env() {
    for name in VARS {
        env::remove_var(var(name));
    }
}

fn loader(temp_dir: &TempDir) -> ConfigLoader {
    ConfigLoader::new()
        .with_paths(vec![temp_dir.path().join("config.toml")])
        .with_env_prefix(PREFIX)
}

#[test]
#[serial]
fn test_profile_detection() {
    clear_env();
    let loader = ConfigLoader::new().with_env_prefix(PREFIX);

    assert_eq!(loader.detect_profile(), None);

    env::set_var(var("ENV"), "prod");
    assert_eq!(loader.detect_profile(), Some(Profile::Prod));

    env::set_var(var("ENV"), "Production");
    assert_eq!(loader.detect_profile(), Some(Profile::Prod));

    env::set_var(var("ENV"), "development");
    assert_eq!(loader.detect_profile(), Some(Profile::Dev));

    env::set_var(var("ENV"), "staging");
    assert_eq!(
        loader.detect_profile(),
        Some(Profile::Custom("staging".to_string()))
    );

    env::set_var(var("ENV"), "  ");
    assert_eq!(loader.detect_profile(), None);

    clear_env();
}

#[tokio::test]
#[serial]
async fn test_prod_profile_quiets_logging() -> Result<()> {
    clear_env();
    let temp_dir = TempDir::new()?;

    env::set_var(var("ENV"), "prod");
    let loaded = loader(&temp_dir).load_with_sources().await?;
    clear_env();

    assert_eq!(loaded.config.profile, Profile::Prod);
    assert_eq!(loaded.config.logging.level, "warn");
    assert!(loaded.config.logging.json);
    assert!(loaded
        .sources
        .contains(&ConfigSource::Environment(var("ENV"))));

    Ok(())
}

#[tokio::test]
#[serial]
async fn test_dev_profile_keeps_file_settings() -> Result<()> {
    clear_env();
    let temp_dir = TempDir::new()?;
    fs::write(
        temp_dir.path().join("config.toml"),
        "profile = \"dev\"\n\n[logging]\nlevel = \"debug\"\n",
    )
    .await?;

    let config = loader(&temp_dir).load().await?;

    assert_eq!(config.profile, Profile::Dev);
    assert_eq!(config.logging.level, "debug");
    assert!(!config.logging.json);

    Ok(())
}

#[tokio::test]
#[serial]
async fn test_file_profile_config_overrides_builtin() -> Result<()> {
    clear_env();
    let temp_dir = TempDir::new()?;
    fs::write(
        temp_dir.path().join("config.toml"),
        r#"
profile = "prod"

[profile_config.logging]
level_override = "error"
structured_only = false
"#,
    )
    .await?;

    let config = loader(&temp_dir).load().await?;

    assert_eq!(config.profile, Profile::Prod);
    assert_eq!(config.logging.level, "error");
    assert!(!config.logging.json);

    Ok(())
}

#[tokio::test]
#[serial]
async fn test_env_overrides_win_over_profile_and_file() -> Result<()> {
    clear_env();
    let temp_dir = TempDir::new()?;
    fs::write(
        temp_dir.path().join("config.toml"),
        "[backend]\nbase_url = \"http://file.example.com\"\n\n[search]\ndebounce_ms = 100\n",
    )
    .await?;

    env::set_var(var("ENV"), "prod");
    env::set_var(var("BASE_URL"), "https://env.example.com");
    env::set_var(var("TOKEN"), "env-token");
    env::set_var(var("TIMEOUT_MS"), "1500");
    env::set_var(var("DEBOUNCE_MS"), "250");
    env::set_var(var("MIN_QUERY_LEN"), "4");
    env::set_var(var("LOG_LEVEL"), "trace");
    env::set_var(var("LOG_JSON"), "false");

    let loaded = loader(&temp_dir).load_with_sources().await?;
    clear_env();
    let config = loaded.config;

    assert_eq!(config.backend.base_url, "https://env.example.com");
    assert_eq!(config.backend.auth_token.as_deref(), Some("env-token"));
    assert_eq!(config.backend.timeout_ms, 1500);
    assert_eq!(config.search.debounce_ms, 250);
    assert_eq!(config.search.min_query_len, 4);
    assert_eq!(config.logging.level, "trace");
    assert!(!config.logging.json);
    assert!(loaded
        .sources
        .contains(&ConfigSource::Environment(var("LOG_LEVEL"))));

    Ok(())
}

#[tokio::test]
#[serial]
async fn test_non_numeric_env_values_are_ignored() -> Result<()> {
    clear_env();
    let temp_dir = TempDir::new()?;

    env::set_var(var("DEBOUNCE_MS"), "soon");
    env::set_var(var("MIN_QUERY_LEN"), "-1");
    let config = loader(&temp_dir).load().await?;
    clear_env();

    assert_eq!(config.search, SearchConfig::default());

    Ok(())
}

#[tokio::test]
#[serial]
async fn test_empty_token_env_clears_file_token() -> Result<()> {
    clear_env();
    let temp_dir = TempDir::new()?;
    fs::write(
        temp_dir.path().join("config.toml"),
        "[backend]\nauth_token = \"stale\"\n",
    )
    .await?;

    env::set_var(var("TOKEN"), "");
    let config = loader(&temp_dir).load().await?;
    clear_env();

    assert!(config.backend.auth_token.is_none());

    Ok(())
}
