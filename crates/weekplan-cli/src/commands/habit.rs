use clap::Subcommand;
use weekplan_core::PlanEdit;

use super::{day, open_session, persist, CmdResult};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Add a habit
    Add {
        /// Habit name
        #[arg(long)]
        name: Option<String>,
    },
    /// Rename a habit
    Rename {
        /// Habit ID
        id: String,
        /// New name
        name: String,
    },
    /// Flip a habit's check for one day
    Toggle {
        /// Habit ID
        id: String,
        /// Day index, 0 (Saturday) to 6 (Friday)
        day: u8,
    },
    /// Remove a habit
    Remove {
        /// Habit ID
        id: String,
    },
    /// Print this week's habit completion percentage
    Progress,
}

pub fn run(offset: i64, action: HabitAction) -> CmdResult {
    let mut session = open_session(offset)?;

    match action {
        HabitAction::Add { name } => {
            let id = session.add_habit()?;
            if let Some(name) = name {
                session.edit(PlanEdit::RenameHabit { id: id.clone(), name })?;
            }
            persist(&mut session)?;
            println!("{id}");
        }
        HabitAction::Rename { id, name } => {
            session.edit(PlanEdit::RenameHabit { id, name })?;
            persist(&mut session)?;
            println!("ok");
        }
        HabitAction::Toggle { id, day: d } => {
            session.edit(PlanEdit::ToggleHabitCheck { id, day: day(d)? })?;
            persist(&mut session)?;
            println!("{}%", session.progress());
        }
        HabitAction::Remove { id } => {
            session.edit(PlanEdit::RemoveHabit { id: id.clone() })?;
            persist(&mut session)?;
            println!("Habit removed: {id}");
        }
        HabitAction::Progress => {
            println!("{}", session.progress());
        }
    }
    Ok(())
}
