//! Line-oriented search session driven by the `SearchCoordinator`.
//!
//! Plain lines replace the query as if typed; suggestions arrive after the
//! debounce window. Lines starting with `:` are commands.

use crate::render;
use anyhow::Result;
use application::{SearchCoordinator, SearchError, SearchEvent};
use common::EventEnvelope;
use console::style;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub const HELP: &str = "\
  <text>        type a query (suggestions follow after a pause)
  :go           search for the current query
  :pick N       select suggestion N
  :focus N      focus result N and load its related documents
  :open N       jump to related document N, clearing the query
  :doc ID       jump to document ID, clearing the query
  :ext a, b     set caller-supplied suggestions
  :state        show the current state
  :help         show this help
  :quit         leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Type(String),
    Go,
    Pick(usize),
    Focus(usize),
    Open(usize),
    Document(String),
    External(Vec<String>),
    State,
    Help,
    Quit,
}

impl ReplCommand {
    /// Parse one input line; numbered references are 1-based
    pub fn parse(line: &str) -> Result<Self, String> {
        let Some(command) = line.strip_prefix(':') else {
            return Ok(Self::Type(line.to_string()));
        };

        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command.trim(), ""),
        };

        match name {
            "go" | "search" => Ok(Self::Go),
            "pick" => parse_index(arg).map(Self::Pick),
            "focus" => parse_index(arg).map(Self::Focus),
            "open" => parse_index(arg).map(Self::Open),
            "doc" if !arg.is_empty() => Ok(Self::Document(arg.to_string())),
            "doc" => Err("usage: :doc ID".to_string()),
            "ext" => Ok(Self::External(
                arg.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            )),
            "state" => Ok(Self::State),
            "help" | "?" => Ok(Self::Help),
            "quit" | "q" | "exit" => Ok(Self::Quit),
            other => Err(format!("unknown command ':{other}', try :help")),
        }
    }
}

fn parse_index(arg: &str) -> Result<usize, String> {
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(format!("expected a number starting at 1, got '{arg}'")),
    }
}

/// Run the session until `:quit` or end of input
pub async fn run(coordinator: SearchCoordinator) -> Result<()> {
    println!(
        "{} {}",
        style("[dms-search]").cyan().bold(),
        style("interactive search, :help for commands").dim()
    );

    let printer = spawn_printer(coordinator.subscribe());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let command = match ReplCommand::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{} {}", style("?").yellow(), message);
                continue;
            }
        };

        if command == ReplCommand::Quit {
            break;
        }
        if let Err(e) = execute(&coordinator, command).await {
            println!("{} {}", style("x").red().bold(), e);
        }
    }

    coordinator.close();
    drop(coordinator);
    printer.abort();
    Ok(())
}

async fn execute(coordinator: &SearchCoordinator, command: ReplCommand) -> Result<(), SearchError> {
    match command {
        ReplCommand::Type(text) => {
            let disposition = coordinator.set_query(text)?;
            debug!(?disposition, "Query updated");
        }
        ReplCommand::Go => {
            coordinator.submit().await?;
        }
        ReplCommand::Pick(index) => {
            match coordinator.snapshot().suggestions.get(index).cloned() {
                Some(suggestion) => {
                    coordinator.select_suggestion(suggestion).await?;
                }
                None => println!("{} no suggestion {}", style("?").yellow(), index + 1),
            }
        }
        ReplCommand::Focus(index) => match coordinator.snapshot().results.get(index) {
            Some(result) => coordinator.focus_document(&result.document.id)?,
            None => println!("{} no result {}", style("?").yellow(), index + 1),
        },
        ReplCommand::Open(index) => match coordinator.snapshot().related.get(index) {
            Some(related) => coordinator.clear_for_selection(&related.document.id)?,
            None => println!("{} no related document {}", style("?").yellow(), index + 1),
        },
        ReplCommand::Document(id) => coordinator.clear_for_selection(&id)?,
        ReplCommand::External(items) => coordinator.set_external_suggestions(items)?,
        ReplCommand::State => {
            for line in render::snapshot_lines(&coordinator.snapshot()) {
                println!("  {line}");
            }
        }
        ReplCommand::Help => println!("{HELP}"),
        ReplCommand::Quit => {}
    }
    Ok(())
}

fn spawn_printer(mut events: broadcast::Receiver<EventEnvelope<SearchEvent>>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(envelope) => {
                    for line in render::event_lines(&envelope.payload) {
                        println!("{line}");
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Terminal fell behind search events");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}
