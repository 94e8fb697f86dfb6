//! Task management commands for CLI.

use clap::Subcommand;
use serde_json::json;
use vibedeck_core::{format_clock, Config};

use super::{open_deck, CliResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task to the front of the list
    Add {
        /// Task title
        title: String,
        /// Planned minutes (1-240)
        #[arg(long, short)]
        minutes: f64,
    },
    /// List pending tasks, newest first
    List,
    /// Mark a pending task as done
    Complete {
        /// Task ID
        id: String,
    },
    /// Show the planned total of all pending tasks
    Total,
}

pub fn run(config: &Config, action: TaskAction) -> CliResult {
    let mut deck = open_deck(config)?;

    match action {
        TaskAction::Add { title, minutes } => match deck.add_task(&title, minutes) {
            Ok(task) => {
                println!("Task created: {}", task.id);
                println!("{}", serde_json::to_string_pretty(&task)?);
            }
            Err(reason) => println!("rejected: {reason}"),
        },
        TaskAction::List => {
            println!("{}", serde_json::to_string_pretty(deck.tasks())?);
        }
        TaskAction::Complete { id } => match deck.complete_task(&id) {
            Ok(task) => {
                println!("Vibe check: {}", task.title);
                println!("{}", serde_json::to_string_pretty(deck.profile())?);
            }
            Err(reason) => println!("rejected: {reason}"),
        },
        TaskAction::Total => {
            let planned = deck.planned_seconds();
            let total = json!({
                "plannedSeconds": planned,
                "display": format_clock(planned),
                "pending": deck.tasks().len(),
            });
            println!("{}", serde_json::to_string_pretty(&total)?);
        }
    }
    Ok(())
}
