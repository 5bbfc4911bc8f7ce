use clap::Subcommand;
use weekplan_core::PlanEdit;

use super::{open_session, persist, CmdResult};

#[derive(Subcommand)]
pub enum ReminderAction {
    /// Add a reminder
    Add {
        /// Reminder text
        #[arg(long)]
        text: Option<String>,
    },
    /// Flip a reminder's completed status
    Toggle {
        /// Reminder ID
        id: String,
    },
    /// Set a reminder's text
    Text {
        /// Reminder ID
        id: String,
        /// New text
        #[arg(default_value = "")]
        text: String,
    },
    /// Remove a reminder
    Remove {
        /// Reminder ID
        id: String,
    },
}

pub fn run(offset: i64, action: ReminderAction) -> CmdResult {
    let mut session = open_session(offset)?;

    let out = match action {
        ReminderAction::Add { text } => {
            let id = session.add_reminder()?;
            if let Some(text) = text {
                session.edit(PlanEdit::SetReminderText { id: id.clone(), text })?;
            }
            id
        }
        ReminderAction::Toggle { id } => {
            session.edit(PlanEdit::ToggleReminder { id })?;
            "ok".to_string()
        }
        ReminderAction::Text { id, text } => {
            session.edit(PlanEdit::SetReminderText { id, text })?;
            "ok".to_string()
        }
        ReminderAction::Remove { id } => {
            session.edit(PlanEdit::RemoveReminder { id: id.clone() })?;
            format!("Reminder removed: {id}")
        }
    };

    persist(&mut session)?;
    println!("{out}");
    Ok(())
}
