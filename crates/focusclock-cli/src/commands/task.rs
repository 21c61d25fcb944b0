use std::io::Read;
use std::path::PathBuf;

use chrono::Utc;
use clap::Subcommand;
use focusclock_core::{DeadlineUrgency, FocusDesk, Task, TaskList};
use serde::Serialize;

use super::print_pretty;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Sort a JSON array of tasks into display order
    Order {
        /// File to read; stdin when omitted
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Print the demonstration tasks in display order
    Sample,
}

#[derive(Serialize)]
struct ListedTask<'a> {
    #[serde(flatten)]
    task: &'a Task,
    urgency: DeadlineUrgency,
}

fn print_tasks(tasks: &[Task]) -> Result<(), Box<dyn std::error::Error>> {
    let today = Utc::now().date_naive();
    let listed: Vec<ListedTask<'_>> = tasks
        .iter()
        .map(|task| ListedTask {
            task,
            urgency: task.deadline_urgency(today),
        })
        .collect();
    print_pretty(&listed)
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TaskAction::Order { file } => {
            let input = match file {
                Some(path) => std::fs::read_to_string(path)?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let tasks: Vec<Task> = serde_json::from_str(&input)?;
            let list = TaskList::from_tasks(tasks)?;
            print_tasks(&list.ordered())?;
        }
        TaskAction::Sample => {
            let desk = FocusDesk::new().with_sample_tasks();
            print_tasks(&desk.ordered_tasks())?;
        }
    }
    Ok(())
}
