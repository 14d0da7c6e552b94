use chrono::{Local, TimeZone};
use clap::{Parser, Subcommand};
use colored::{ColoredString, Colorize};
use eyre::Result;
use std::io::{self, Write};
use std::path::PathBuf;
use taskeasy::{
    Config, FileBackend, Priority, Status, Task, TaskDraft, TaskFilter, TaskPatch, TaskStore,
};

#[derive(Parser)]
#[command(name = "taskeasy")]
#[command(about = "TaskEasy CLI - priority to-do list with single-slot JSON persistence")]
#[command(version)]
struct Cli {
    /// Path to the config file (default: platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a task
    Add {
        title: String,

        #[arg(short, long, default_value = "")]
        description: String,

        /// high, medium or low (default from config)
        #[arg(short, long)]
        priority: Option<String>,

        /// to-do, in-progress or done (default from config)
        #[arg(short, long)]
        status: Option<String>,
    },

    /// List tasks, highest priority first
    List {
        /// Show only tasks matching a status or priority value
        #[arg(short, long, default_value = "all")]
        filter: String,

        /// Keep creation order instead of sorting by priority
        #[arg(long)]
        created: bool,
    },

    /// Show one task in full
    Show { id: String },

    /// Edit fields of a task
    Edit {
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short = 'd', long)]
        description: Option<String>,

        #[arg(short, long)]
        priority: Option<String>,

        #[arg(short, long)]
        status: Option<String>,
    },

    /// Mark a task done
    Done { id: String },

    /// Delete a task (asks for confirmation unless --force)
    Delete {
        id: String,

        #[arg(short, long)]
        force: bool,
    },

    /// Delete every task with status done
    ClearDone,

    /// Delete every task (asks for confirmation unless --force)
    ClearAll {
        #[arg(short, long)]
        force: bool,
    },

    /// Show aggregate counts
    Stats,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let backend = FileBackend::new(config.data_file());
    let mut store = TaskStore::open(backend);

    match cli.command {
        Commands::Add {
            title,
            description,
            priority,
            status,
        } => {
            let task = store.create(TaskDraft {
                title,
                description,
                priority: priority.unwrap_or_else(|| config.default_priority.clone()),
                status: status.unwrap_or_else(|| config.default_status.clone()),
            })?;
            println!("Created task {}", task.id.dimmed());
            print_row(&task);
        }

        Commands::List { filter, created } => {
            let filter = TaskFilter::parse(&filter);
            let mut tasks = store.filtered(filter);
            if !created {
                tasks = taskeasy::sorted_by_priority(&tasks);
            }

            if tasks.is_empty() {
                println!("No tasks yet. Create your first task with `taskeasy add`.");
            } else {
                for task in &tasks {
                    print_row(task);
                }
            }
        }

        Commands::Show { id } => {
            let task = store
                .get(&id)
                .ok_or_else(|| taskeasy::Error::NotFound(id.clone()))?;
            print_full(task);
        }

        Commands::Edit {
            id,
            title,
            description,
            priority,
            status,
        } => {
            store.begin_edit(&id)?;
            let result = store.update(
                &id,
                TaskPatch {
                    title,
                    description,
                    priority,
                    status,
                },
            );
            store.end_edit();
            let task = result?;
            println!("Updated task {}", task.id.dimmed());
            print_row(&task);
        }

        Commands::Done { id } => {
            let task = store.update(
                &id,
                TaskPatch {
                    status: Some("done".to_string()),
                    ..TaskPatch::default()
                },
            )?;
            println!("{} {}", "Done:".green(), task.title);
        }

        Commands::Delete { id, force } => {
            if force {
                store.delete(&id)?;
                println!("Deleted task {}", id.dimmed());
            } else {
                store.request_delete(&id)?;
                let title = store.get(&id).map(|t| t.title.clone()).unwrap_or_default();
                if confirm(&format!("Delete \"{}\"?", title))? {
                    store.confirm_delete()?;
                    println!("Deleted task {}", id.dimmed());
                } else {
                    store.cancel_delete();
                    println!("Cancelled");
                }
            }
        }

        Commands::ClearDone => {
            let removed = store.delete_completed();
            println!("Removed {} completed task(s)", removed);
        }

        Commands::ClearAll { force } => {
            let total = store.tasks().len();
            if total == 0 {
                println!("Nothing to delete");
            } else if force || confirm(&format!("Delete all {} task(s)?", total))? {
                let removed = store.delete_all();
                println!("Removed {} task(s)", removed);
            } else {
                println!("Cancelled");
            }
        }

        Commands::Stats => {
            let stats = store.stats();
            println!(
                "{} task{} • {} done • {} in progress • {} to do",
                stats.total,
                if stats.total == 1 { "" } else { "s" },
                stats.done,
                stats.in_progress,
                stats.todo
            );
            println!(
                "priority: {} high • {} medium • {} low",
                stats.high, stats.medium, stats.low
            );
        }
    }

    Ok(())
}

fn print_row(task: &Task) {
    println!(
        "{}  {}  {}  {}  {}",
        short_id(&task.id).dimmed(),
        priority_badge(task.priority),
        status_badge(task.status),
        task.title,
        format_ts(task.created_at).dimmed()
    );
}

fn print_full(task: &Task) {
    println!("{}", task.title.bold());
    if !task.description.is_empty() {
        println!("{}", task.description);
    }
    println!("id:       {}", task.id);
    println!("priority: {}", priority_badge(task.priority));
    println!("status:   {}", status_badge(task.status));
    println!("created:  {}", format_ts(task.created_at));
    println!("updated:  {}", format_ts(task.updated_at));
}

fn priority_badge(priority: Priority) -> ColoredString {
    match priority {
        Priority::High => "high  ".red(),
        Priority::Medium => "medium".yellow(),
        Priority::Low => "low   ".green(),
    }
}

fn status_badge(status: Status) -> ColoredString {
    match status {
        Status::Todo => "to-do      ".normal(),
        Status::InProgress => "in-progress".cyan(),
        Status::Done => "done       ".green(),
    }
}

fn format_ts(ms: i64) -> String {
    match Local.timestamp_millis_opt(ms).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => ms.to_string(),
    }
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}
