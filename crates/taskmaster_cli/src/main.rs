//! CLI driver for `taskmaster_core`.
//!
//! # Responsibility
//! - Exercise the controller against a local database file from a shell.
//! - Keep output deterministic for quick local sanity checks.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use taskmaster_core::{
    core_version, init_logging, open_controller, ping, AppController, ItemId, RepoResult,
    StorageBackend, StoreLocation,
};

const DEFAULT_DB_FILE_NAME: &str = "taskmaster.sqlite3";

/// TaskMaster - local to-do list
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// SQLite database file (default: <temp dir>/taskmaster.sqlite3)
    #[arg(long, env = "TASKMASTER_DB_PATH")]
    db: Option<PathBuf>,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, env = "TASKMASTER_LOG_DIR")]
    log_dir: Option<String>,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, default_value = taskmaster_core::default_log_level())]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print all items
    List,
    /// Add an item; blank text is ignored
    Add { text: String },
    /// Flip the done flag of an item
    Toggle { id: i64 },
    /// Replace the text of an item; blank text is ignored
    Rename { id: i64, text: String },
    /// Delete an item
    Remove { id: i64 },
    /// Print core linkage info
    Ping,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(log_dir) = args.log_dir.as_deref() {
        if let Err(err) = init_logging(&args.log_level, log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    if let Command::Ping = args.command {
        println!("taskmaster_core ping={}", ping());
        println!("taskmaster_core version={}", core_version());
        return ExitCode::SUCCESS;
    }

    let db_path = args
        .db
        .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));
    match run(&args.command, db_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: &Command, db_path: PathBuf) -> RepoResult<()> {
    let mut controller = open_controller(StorageBackend::detect(), &StoreLocation::File(db_path))?;

    match command {
        Command::List | Command::Ping => {}
        Command::Add { text } => controller.on_submit_draft_text(text.as_str())?,
        Command::Toggle { id } => controller.on_toggle(ItemId(*id))?,
        Command::Rename { id, text } => {
            controller.on_start_edit(ItemId(*id));
            controller.on_commit_edit(ItemId(*id), text)?;
        }
        Command::Remove { id } => controller.on_delete(ItemId(*id))?,
    }

    print_items(&controller);
    Ok(())
}

fn print_items(controller: &AppController) {
    for item in controller.items() {
        let mark = if item.done { "x" } else { " " };
        println!("{:>4} [{mark}] {}", item.id, item.value);
    }
}
