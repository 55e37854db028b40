use anyhow::{bail, Context, Result};
use domain::config::*;
use reqwest::Url;
use tracing::warn;

/// Longest debounce window that still feels interactive
const MAX_DEBOUNCE_MS: u64 = 10_000;

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, config: &ClientConfig) -> Result<()> {
        self.validate_backend_config(&config.backend)?;
        self.validate_search_config(&config.search)?;
        self.validate_logging_config(&config.logging)?;
        Ok(())
    }

    fn validate_backend_config(&self, config: &BackendConfig) -> Result<()> {
        if config.base_url.trim().is_empty() {
            bail!("Backend base_url cannot be empty");
        }

        let url = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid backend base_url: {}", config.base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!(
                "Backend base_url must use http or https, got '{}'",
                url.scheme()
            );
        }

        if config.timeout_ms == 0 {
            bail!("Backend timeout_ms must be greater than 0");
        }

        match config.auth_token.as_deref() {
            None => warn!("No auth token configured, backend requests will be rejected"),
            Some(token) if token.trim().is_empty() => bail!("Auth token cannot be blank"),
            Some(_) => {}
        }

        Ok(())
    }

    fn validate_search_config(&self, config: &SearchConfig) -> Result<()> {
        if config.min_query_len == 0 {
            bail!("min_query_len must be greater than 0");
        }

        if config.debounce_ms > MAX_DEBOUNCE_MS {
            bail!(
                "debounce_ms must be at most {} ms, got {}",
                MAX_DEBOUNCE_MS,
                config.debounce_ms
            );
        }

        if config.debounce_ms == 0 {
            warn!("debounce_ms is 0, every keystroke will fetch suggestions");
        }

        Ok(())
    }

    fn validate_logging_config(&self, config: &LoggingConfig) -> Result<()> {
        if common::parse_level(&config.level).is_none() {
            bail!(
                "Invalid log level: {}. Must be one of: error, warn, info, debug, trace",
                config.level
            );
        }
        Ok(())
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}
