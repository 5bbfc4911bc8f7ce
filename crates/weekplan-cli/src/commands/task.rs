//! Task management commands for CLI.

use clap::Subcommand;
use weekplan_core::{PlanEdit, PlanError, TaskPatch};

use super::{day, open_session, persist, CmdResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task to a day
    Add {
        /// Day index, 0 (Saturday) to 6 (Friday)
        day: u8,
        /// Task text
        #[arg(long)]
        text: Option<String>,
    },
    /// Update a task
    Update {
        /// Day index
        day: u8,
        /// Task ID
        id: String,
        /// New text
        #[arg(long)]
        text: Option<String>,
        /// Set completed status
        #[arg(long)]
        completed: Option<bool>,
    },
    /// Flip a task's completed status
    Toggle {
        /// Day index
        day: u8,
        /// Task ID
        id: String,
    },
    /// Remove a task
    Remove {
        /// Day index
        day: u8,
        /// Task ID
        id: String,
    },
}

pub fn run(offset: i64, action: TaskAction) -> CmdResult {
    let mut session = open_session(offset)?;

    match action {
        TaskAction::Add { day: d, text } => {
            let d = day(d)?;
            let id = session.add_task(d)?;
            if let Some(text) = text {
                session.edit(PlanEdit::UpdateTask {
                    day: d,
                    id: id.clone(),
                    patch: TaskPatch { text: Some(text), completed: None },
                })?;
            }
            persist(&mut session)?;
            println!("{id}");
        }
        TaskAction::Update { day: d, id, text, completed } => {
            session.edit(PlanEdit::UpdateTask {
                day: day(d)?,
                id,
                patch: TaskPatch { text, completed },
            })?;
            persist(&mut session)?;
            println!("ok");
        }
        TaskAction::Toggle { day: d, id } => {
            let d = day(d)?;
            let completed = session
                .data()
                .day(d)
                .tasks
                .iter()
                .find(|t| t.id == id)
                .map(|t| t.completed)
                .ok_or_else(|| PlanError::NotFound { kind: "task", id: id.clone() })?;
            session.edit(PlanEdit::UpdateTask {
                day: d,
                id,
                patch: TaskPatch { text: None, completed: Some(!completed) },
            })?;
            persist(&mut session)?;
            println!("ok");
        }
        TaskAction::Remove { day: d, id } => {
            session.edit(PlanEdit::RemoveTask { day: day(d)?, id: id.clone() })?;
            persist(&mut session)?;
            println!("Task removed: {id}");
        }
    }
    Ok(())
}
