use crate::context::AppContext;
use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use console::style;
use domain::config::ClientConfig;
use infrastructure::config::ConfigLoader;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const TOKEN_MASK: &str = "********";

#[derive(Debug, Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Print an example configuration to stdout
    Example,

    /// Generate an example configuration file
    #[command(alias = "gen")]
    Generate {
        /// Output path for the configuration file
        #[arg(short, long, default_value = ".dmssearchrc.toml")]
        output: PathBuf,

        /// Output format (toml or json)
        #[arg(short, long, default_value = "toml")]
        format: String,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Validate the effective configuration
    #[command(alias = "check")]
    Validate,

    /// Show the effective configuration
    Show {
        /// Also list where each layer came from
        #[arg(short, long)]
        sources: bool,

        /// Print the auth token instead of masking it
        #[arg(long)]
        reveal_token: bool,
    },
}

impl ConfigCommand {
    pub async fn execute(&self, ctx: &AppContext) -> Result<()> {
        match &self.command {
            ConfigSubcommand::Example => {
                print!("{}", ConfigLoader::generate_example_config());
                Ok(())
            }
            ConfigSubcommand::Generate {
                output,
                format,
                force,
            } => generate_config(output, format, *force).await,
            ConfigSubcommand::Validate => validate_config(ctx),
            ConfigSubcommand::Show {
                sources,
                reveal_token,
            } => show_config(ctx, *sources, *reveal_token),
        }
    }
}

async fn generate_config(output: &Path, format: &str, force: bool) -> Result<()> {
    let example_config = ConfigLoader::generate_example_config();

    let content = match format {
        "toml" => example_config,
        "json" => {
            let config: ClientConfig = toml::from_str(&example_config)?;
            serde_json::to_string_pretty(&config)?
        }
        other => bail!("Unsupported format '{other}', expected toml or json"),
    };

    if output.exists() && !force {
        warn!("Configuration file already exists at: {}", output.display());
        bail!(
            "{} already exists, use --force to overwrite",
            output.display()
        );
    }

    tokio::fs::write(output, content).await?;
    info!("Configuration file generated at: {}", output.display());

    println!(
        "{} Configuration written to {}",
        style("[✓]").green().bold(),
        output.display()
    );
    println!("   Set backend.base_url and backend.auth_token, or use DMS_SEARCH_BASE_URL / DMS_SEARCH_TOKEN");

    Ok(())
}

fn validate_config(ctx: &AppContext) -> Result<()> {
    match ctx.validate() {
        Ok(()) => {
            println!("{} Configuration is valid", style("[✓]").green().bold());
            Ok(())
        }
        Err(e) => {
            println!("{} Configuration validation failed:", style("[✗]").red().bold());
            println!("   {e:#}");
            Err(e)
        }
    }
}

fn show_config(ctx: &AppContext, sources: bool, reveal_token: bool) -> Result<()> {
    let mut config = ctx.config.clone();
    if !reveal_token && config.backend.auth_token.is_some() {
        config.backend.auth_token = Some(TOKEN_MASK.to_string());
    }

    println!("# Effective configuration (profile: {})", config.profile.name());
    println!("{}", toml::to_string_pretty(&config)?);

    if sources {
        println!("# Sources, later entries win");
        for source in &ctx.sources {
            println!("#   {source}");
        }
    }
    Ok(())
}
