use anyhow::{Context, Result};
use clap::Args;
use domain::config::ClientConfig;
use infrastructure::config::{ConfigLoader, ConfigSource, ConfigValidator, LoadedConfig};
use infrastructure::{HttpSearchBackend, Session};
use std::path::PathBuf;
use std::sync::Arc;

/// Flags accepted by every subcommand; they win over files and environment
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Read configuration from this file before the standard locations
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Backend base URL
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Bearer token for the backend
    #[arg(long, global = true, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Emit JSON log lines on stderr
    #[arg(long, global = true)]
    pub json_logs: bool,
}

impl GlobalArgs {
    fn apply(&self, loaded: &mut LoadedConfig) {
        let config = &mut loaded.config;
        let mut touched = false;

        if let Some(url) = &self.base_url {
            config.backend.base_url = url.clone();
            touched = true;
        }
        if let Some(token) = &self.token {
            config.backend.auth_token = Some(token.clone()).filter(|t| !t.is_empty());
            touched = true;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
            touched = true;
        }
        if self.json_logs {
            config.logging.json = true;
            touched = true;
        }

        if touched {
            loaded.sources.push(ConfigSource::CommandLine);
        }
    }
}

/// Effective configuration for one invocation
pub struct AppContext {
    pub config: ClientConfig,
    pub sources: Vec<ConfigSource>,
}

impl AppContext {
    pub async fn load(args: &GlobalArgs) -> Result<Self> {
        let mut loader = ConfigLoader::new();
        if let Some(path) = &args.config {
            loader = loader.with_path(path.clone());
        }

        let mut loaded = loader
            .load_with_sources()
            .await
            .context("Failed to load configuration")?;
        args.apply(&mut loaded);

        Ok(Self {
            config: loaded.config,
            sources: loaded.sources,
        })
    }

    pub fn validate(&self) -> Result<()> {
        ConfigValidator::new()
            .validate(&self.config)
            .context("Configuration is invalid")
    }

    /// Backend client carrying a session seeded from the configured token
    pub fn backend(&self) -> Result<Arc<HttpSearchBackend>> {
        let session = Session::new(self.config.backend.auth_token.clone());
        let backend = HttpSearchBackend::new(&self.config.backend, session)?;
        Ok(Arc::new(backend))
    }
}
