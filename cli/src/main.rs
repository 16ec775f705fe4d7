mod list;
mod logging;
mod tui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use todolite_core::{
    join_words, FileKeyValueStore, LoadReport, Outcome, StoreConfig, TodoState, Variant,
};

const LOG_FILE_NAME: &str = "todolite.log";
const RECOVERED_MESSAGE: &str = "stored tasks were unreadable; starting with an empty list";

#[derive(Parser)]
#[command(name = "todolite")]
#[command(about = "A small local task list", long_about = None)]
struct Cli {
    /// Directory holding the task data (default: ~/.todolite)
    #[arg(long, global = true, env = "TODOLITE_HOME")]
    data_dir: Option<PathBuf>,

    /// Which persisted list to use: minimal or rich
    #[arg(long, global = true, default_value_t = Variant::Rich)]
    variant: Variant,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Add a new task (usage: add Buy milk)
    Add {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        words: Vec<String>,
    },
    /// List tasks
    List {
        /// all, active or completed
        #[arg(long, short, default_value = "all")]
        filter: String,
    },
    /// Flip a task between active and completed
    Toggle {
        /// Task id or unique prefix
        id: String,
    },
    /// Replace a task's text
    Edit {
        /// Task id or unique prefix
        id: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        words: Vec<String>,
    },
    /// Delete a task
    Delete {
        /// Task id or unique prefix
        id: String,
    },
    /// Delete every completed task
    ClearCompleted,
    /// Open the Terminal User Interface
    Tui,
}

fn open_state(config: &StoreConfig) -> Result<(TodoState<FileKeyValueStore>, LoadReport)> {
    let repo = FileKeyValueStore::new(&config.data_dir).with_context(|| {
        format!("failed to open data directory {}", config.data_dir.display())
    })?;
    TodoState::open(repo, config.variant)
        .with_context(|| format!("failed to load tasks under `{}`", config.storage_key()))
}

fn report_ignored<T>(outcome: Outcome<T>) -> Option<T> {
    match outcome {
        Outcome::Applied(value) => Some(value),
        Outcome::Ignored(reason) => {
            println!("Nothing changed: {}", reason);
            None
        }
    }
}

fn run_command(config: &StoreConfig, command: Commands) -> Result<()> {
    let (mut state, report) = open_state(config)?;
    if report == LoadReport::Recovered && !command_is_tui(&command) {
        eprintln!("Warning: {}", RECOVERED_MESSAGE);
    }

    match command {
        Commands::Add { words } => {
            if let Some(id) = report_ignored(state.add(&join_words(&words))?) {
                let task = state.store().get(&id).context("added task vanished")?;
                println!("Task added: {} (ID: {})", task.text, id.short());
            }
        }
        Commands::List { filter } => {
            state.set_filter_str(&filter)?;
            list::show_tasks(&state.visible(), state.filter(), state.store().counts());
        }
        Commands::Toggle { id } => {
            let id = state.store().resolve_prefix(&id)?;
            if let Some(completed) = report_ignored(state.toggle(&id)?) {
                let label = if completed { "completed" } else { "active" };
                println!("Marked {} as {}", id.short(), label);
            }
        }
        Commands::Edit { id, words } => {
            let id = state.store().resolve_prefix(&id)?;
            if report_ignored(state.update(&id, &join_words(&words))?).is_some() {
                println!("Task {} updated", id.short());
            }
        }
        Commands::Delete { id } => {
            let id = state.store().resolve_prefix(&id)?;
            if let Some(task) = report_ignored(state.delete(&id)?) {
                println!("Deleted: {}", task.text);
            }
        }
        Commands::ClearCompleted => {
            let removed = state.clear_completed()?;
            println!("Cleared {} completed task(s)", removed);
        }
        Commands::Tui => return tui::run(state, report),
    }
    Ok(())
}

fn command_is_tui(command: &Commands) -> bool {
    matches!(command, Commands::Tui)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = StoreConfig::resolve(cli.data_dir, cli.variant)?;
    // No subcommand opens the TUI.
    let command = cli.command.unwrap_or(Commands::Tui);

    if command_is_tui(&command) {
        logging::init_file(&config.data_dir.join(LOG_FILE_NAME), "info")?;
    } else {
        logging::init_stderr("warn")?;
    }
    run_command(&config, command)
}
