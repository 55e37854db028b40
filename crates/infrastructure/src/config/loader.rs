use anyhow::{Context, Result};
use domain::config::*;
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio::fs;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    File(PathBuf),
    Environment(String),
    /// Flags passed by the caller after loading
    CommandLine,
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "file {}", path.display()),
            ConfigSource::Environment(var) => write!(f, "env {var}"),
            ConfigSource::CommandLine => f.write_str("command line"),
            ConfigSource::Default => f.write_str("built-in defaults"),
        }
    }
}

/// Effective configuration plus where each layer came from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: ClientConfig,
    pub sources: Vec<ConfigSource>,
}

pub struct ConfigLoader {
    config_paths: Vec<PathBuf>,
    env_prefix: String,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            config_paths: Self::default_config_paths(),
            env_prefix: "DMS_SEARCH_".to_string(),
        }
    }

    /// Check `path` before the standard locations
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.config_paths.insert(0, path);
        self
    }

    /// Replace the search list entirely
    pub fn with_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.config_paths = paths;
        self
    }

    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".dmssearchrc"),
            PathBuf::from(".dmssearchrc.toml"),
            PathBuf::from(".dmssearchrc.json"),
            PathBuf::from("dms-search.toml"),
            PathBuf::from("dms-search.json"),
        ];

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".dmssearchrc"));
            paths.push(home_dir.join(".dmssearchrc.toml"));
            paths.push(home_dir.join(".dmssearchrc.json"));
        }

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("dms-search").join("config.toml"));
            paths.push(config_dir.join("dms-search").join("config.json"));
        }

        paths
    }

    pub async fn load(&self) -> Result<ClientConfig> {
        Ok(self.load_with_sources().await?.config)
    }

    /// Defaults, then the first config file found, then the profile, then
    /// environment overrides. Later layers win.
    pub async fn load_with_sources(&self) -> Result<LoadedConfig> {
        let mut sources = vec![ConfigSource::Default];
        let mut config = ClientConfig::default();

        if let Some((path, file_config)) = self.load_base_config().await? {
            config = file_config;
            sources.push(ConfigSource::File(path));
        }

        if let Some(profile) = self.detect_profile() {
            config.profile = profile;
            sources.push(ConfigSource::Environment(self.env_var("ENV")));
        }
        debug!("Active profile: {}", config.profile.name());

        let profile_config = config
            .profile_config
            .clone()
            .unwrap_or_else(|| Self::builtin_profile_config(&config.profile));
        config.apply_profile(&profile_config);

        sources.extend(self.apply_env_overrides(&mut config));

        Ok(LoadedConfig { config, sources })
    }

    /// Profile requested through `<prefix>ENV`, if any
    pub fn detect_profile(&self) -> Option<Profile> {
        env::var(self.env_var("ENV"))
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(|value| Profile::from_str(value.trim()).unwrap_or_default())
    }

    fn builtin_profile_config(profile: &Profile) -> ProfileConfig {
        match profile {
            Profile::Dev => ProfileConfig::dev(),
            Profile::Prod => ProfileConfig::prod(),
            Profile::Custom(_) => ProfileConfig::default(),
        }
    }

    /// First readable config file on the search list
    async fn load_base_config(&self) -> Result<Option<(PathBuf, ClientConfig)>> {
        for path in &self.config_paths {
            if !path.exists() {
                continue;
            }
            match self.load_file(path).await {
                Ok(file_config) => {
                    info!("Loaded configuration from: {}", path.display());
                    return Ok(Some((path.clone(), file_config)));
                }
                Err(e) => {
                    warn!("Failed to load config from {}: {:#}", path.display(), e);
                }
            }
        }
        Ok(None)
    }

    pub async fn load_file(&self, path: &Path) -> Result<ClientConfig> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        match extension {
            "toml" => toml::from_str(&content).context("Failed to parse TOML config"),
            "json" => serde_json::from_str(&content).context("Failed to parse JSON config"),
            _ => toml::from_str(&content)
                .or_else(|_| serde_json::from_str(&content))
                .context("Failed to parse config file"),
        }
    }

    fn env_var(&self, name: &str) -> String {
        format!("{}{}", self.env_prefix, name)
    }

    fn apply_env_overrides(&self, config: &mut ClientConfig) -> Vec<ConfigSource> {
        let mut applied = Vec::new();
        let mut read = |name: &str| {
            let var = self.env_var(name);
            let value = env::var(&var).ok()?;
            applied.push(ConfigSource::Environment(var));
            Some(value)
        };

        if let Some(base_url) = read("BASE_URL") {
            config.backend.base_url = base_url;
        }

        if let Some(token) = read("TOKEN") {
            config.backend.auth_token = Some(token).filter(|t| !t.is_empty());
        }

        if let Some(value) = read("TIMEOUT_MS") {
            match value.parse() {
                Ok(ms) => config.backend.timeout_ms = ms,
                Err(_) => warn!("Ignoring non-numeric {}TIMEOUT_MS: {}", self.env_prefix, value),
            }
        }

        if let Some(value) = read("DEBOUNCE_MS") {
            match value.parse() {
                Ok(ms) => config.search.debounce_ms = ms,
                Err(_) => warn!("Ignoring non-numeric {}DEBOUNCE_MS: {}", self.env_prefix, value),
            }
        }

        if let Some(value) = read("MIN_QUERY_LEN") {
            match value.parse() {
                Ok(len) => config.search.min_query_len = len,
                Err(_) => warn!("Ignoring non-numeric {}MIN_QUERY_LEN: {}", self.env_prefix, value),
            }
        }

        if let Some(level) = read("LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Some(value) = read("LOG_JSON") {
            config.logging.json = matches!(value.to_lowercase().as_str(), "1" | "true" | "yes");
        }

        applied
    }

    pub async fn save_config(&self, config: &ClientConfig, path: &Path) -> Result<()> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("toml");

        let content = match extension {
            "json" => serde_json::to_string_pretty(config)?,
            _ => toml::to_string_pretty(config)?,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        fs::write(path, content).await?;
        info!("Configuration saved to: {}", path.display());

        Ok(())
    }

    pub fn generate_example_config() -> String {
        let config = ClientConfig {
            profile: Profile::Dev,
            profile_config: None,
            backend: BackendConfig {
                base_url: "http://localhost:8000".to_string(),
                timeout_ms: 10_000,
                auth_token: Some("your-token-here".to_string()),
            },
            search: SearchConfig {
                debounce_ms: 300,
                min_query_len: 2,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                json: false,
                color: true,
            },
        };

        toml::to_string_pretty(&config)
            .unwrap_or_else(|_| "Failed to generate example config".to_string())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
