use anyhow::Result;
use application::{SearchCoordinator, SearchServices};
use clap::{Parser, Subcommand};
use cli::commands::{
    self, ConfigCommand, HistoryCommand, RelatedCommand, SearchCommand, SuggestCommand,
};
use cli::{interactive, AppContext, GlobalArgs};
use common::{init_structured_logging, LoggingConfig};
use console::style;
use tracing::debug;

#[derive(Parser)]
#[command(name = "dms-search")]
#[command(about = "Search documents in the document-management backend")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a search and print the results
    Search(SearchCommand),
    /// Print suggestions for a partial query
    Suggest(SuggestCommand),
    /// List documents related to a document
    Related(RelatedCommand),
    /// Show recent searches
    History(HistoryCommand),
    /// Check that the backend is up
    Health,
    /// Inspect or generate configuration
    Config(ConfigCommand),
    /// Type queries and pick suggestions interactively (default)
    Interactive,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let ctx = AppContext::load(&cli.global).await?;

    let logging = &ctx.config.logging;
    init_structured_logging(LoggingConfig::from_settings(
        &logging.level,
        logging.json,
        logging.color,
    ))?;
    debug!(profile = ctx.config.profile.name(), "Configuration loaded");

    if let Err(e) = run(cli.command.unwrap_or(Commands::Interactive), &ctx).await {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
    Ok(())
}

async fn run(command: Commands, ctx: &AppContext) -> Result<()> {
    if let Commands::Config(config) = &command {
        return config.execute(ctx).await;
    }

    ctx.validate()?;
    let backend = ctx.backend()?;

    match command {
        Commands::Search(cmd) => cmd.execute(&backend).await,
        Commands::Suggest(cmd) => cmd.execute(backend.clone(), &ctx.config.search).await,
        Commands::Related(cmd) => cmd.execute(&backend).await,
        Commands::History(cmd) => cmd.execute(&backend).await,
        Commands::Health => commands::health(&backend).await,
        Commands::Interactive => {
            let coordinator = SearchCoordinator::new(
                SearchServices::from_backend(backend),
                &ctx.config.search,
            );
            interactive::run(coordinator).await
        }
        Commands::Config(_) => Ok(()),
    }
}
