use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Configuration profile for different environments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Development profile with verbose, human-readable logging
    #[default]
    Dev,
    /// Production profile with quiet, structured logging
    Prod,
    /// Custom profile with user-defined name
    Custom(String),
}

impl Profile {
    /// Get the profile name as a string
    pub fn name(&self) -> &str {
        match self {
            Profile::Dev => "dev",
            Profile::Prod => "prod",
            Profile::Custom(name) => name,
        }
    }
}

impl FromStr for Profile {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "dev" | "development" => Profile::Dev,
            "prod" | "production" => Profile::Prod,
            custom => Profile::Custom(custom.to_string()),
        })
    }
}

/// Profile-specific configuration overrides
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProfileConfig {
    /// Logging configuration for this profile
    #[serde(default)]
    pub logging: ProfileLoggingConfig,
}

/// Profile-specific logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProfileLoggingConfig {
    /// Log level override for this profile
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_override: Option<String>,

    /// Whether to emit JSON log lines only
    #[serde(default)]
    pub structured_only: bool,
}

impl ProfileConfig {
    pub fn dev() -> Self {
        Self::default()
    }

    pub fn prod() -> Self {
        Self {
            logging: ProfileLoggingConfig {
                level_override: Some("warn".to_string()),
                structured_only: true,
            },
        }
    }
}

/// Top-level configuration of the search client
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClientConfig {
    /// Active configuration profile
    #[serde(default)]
    pub profile: Profile,

    /// Profile-specific configuration overrides
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_config: Option<ProfileConfig>,

    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ClientConfig {
    /// Apply profile configuration to base config
    pub fn apply_profile(&mut self, profile_config: &ProfileConfig) {
        if let Some(level) = &profile_config.logging.level_override {
            self.logging.level = level.clone();
        }
        if profile_config.logging.structured_only {
            self.logging.json = true;
        }
    }
}

/// Where the document-management backend lives and how to talk to it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Bearer token; usually supplied through the environment instead
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            auth_token: None,
        }
    }
}

/// Tuning of the search coordinator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before suggestions are fetched
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Queries shorter than this (in characters) clear suggestions instead of fetching
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_len: default_min_query_len(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub json: bool,

    #[serde(default = "default_color")]
    pub color: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            color: default_color(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_min_query_len() -> usize {
    2
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_color() -> bool {
    true
}
