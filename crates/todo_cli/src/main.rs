//! Command-line front end for the todo store.
//!
//! # Responsibility
//! - Drive the same list/create/complete/delete flow as the mobile screen.
//! - Re-list the pending view after every mutating command.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info};
use std::path::PathBuf;
use std::time::Instant;
use todo_core::db::open_db;
use todo_core::{
    init_logging, parse_due_date, CoreConfig, SqliteTodoRepository, Todo, TodoFilter, TodoId,
    TodoService, TodoSnapshot,
};

#[derive(Parser)]
#[command(name = "todo")]
#[command(about = "Minimal local to-do list", long_about = None)]
#[command(version)]
struct Cli {
    /// Database file (defaults to $TODO_DB_PATH or <tmp>/todos.db)
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Absolute directory for rolling log files (defaults to $TODO_LOG_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show pending todos, or completed ones with --completed
    List {
        #[arg(long)]
        completed: bool,

        /// Print the visible records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a todo
    Add {
        #[arg(value_name = "TITLE")]
        title: String,

        /// Due date as YYYY-MM-DD or RFC 3339
        #[arg(long, value_name = "DATE")]
        due: Option<String>,
    },

    /// Mark a todo as completed
    Done {
        #[arg(value_name = "ID")]
        id: TodoId,
    },

    /// Delete a todo
    Rm {
        #[arg(value_name = "ID")]
        id: TodoId,
    },

    /// Print core version
    Version,
}

fn main() {
    let cli = Cli::parse();
    let command = command_name(&cli.command);
    let started_at = Instant::now();

    match run(cli) {
        Ok(()) => info!(
            "event=cli_command module=cli status=ok command={command} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => {
            error!(
                "event=cli_command module=cli status=error command={command} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::List { .. } => "list",
        Commands::Add { .. } => "add",
        Commands::Done { .. } => "done",
        Commands::Rm { .. } => "rm",
        Commands::Version => "version",
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli);

    if let Some(log_dir) = &config.log_dir {
        let log_dir = log_dir
            .to_str()
            .context("log directory must be valid UTF-8")?;
        init_logging(&config.log_level, log_dir).context("failed to initialize logging")?;
    }

    if let Commands::Version = cli.command {
        println!("todo_core version={}", todo_core::core_version());
        return Ok(());
    }

    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open `{}`", config.db_path.display()))?;
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn)?);

    match cli.command {
        Commands::List { completed, json } => {
            let snapshot = service.snapshot(TodoFilter::from_show_completed(completed))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot.items)?);
            } else {
                print_snapshot(&snapshot);
            }
            return Ok(());
        }
        Commands::Add { title, due } => {
            let due_date = due.as_deref().map(parse_due_date).transpose()?;
            let todo = service.create(&title, due_date)?;
            println!("added #{}", todo.id);
        }
        Commands::Done { id } => {
            service.complete(id)?;
            println!("completed #{id}");
        }
        Commands::Rm { id } => {
            service.delete(id)?;
            println!("deleted #{id}");
        }
        Commands::Version => {}
    }

    print_snapshot(&service.snapshot(TodoFilter::Pending)?);
    Ok(())
}

fn resolve_config(cli: &Cli) -> CoreConfig {
    let mut config = CoreConfig::from_env();
    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    if let Some(log_dir) = &cli.log_dir {
        config.log_dir = Some(log_dir.clone());
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    config
}

fn print_snapshot(snapshot: &TodoSnapshot) {
    let label = match snapshot.filter {
        TodoFilter::Pending => "pending",
        TodoFilter::Completed => "completed",
    };
    println!(
        "{label} ({} pending, {} completed)",
        snapshot.counts.pending, snapshot.counts.completed
    );
    if snapshot.items.is_empty() {
        println!("  no todos found");
    }
    for todo in &snapshot.items {
        println!("  {}", format_row(todo));
    }
}

fn format_row(todo: &Todo) -> String {
    let mark = if todo.completed { "x" } else { " " };
    match todo.due_date {
        Some(due) => format!(
            "[{mark}] #{} {} (due {})",
            todo.id,
            todo.title,
            due.format("%Y-%m-%d")
        ),
        None => format!("[{mark}] #{} {}", todo.id, todo.title),
    }
}
