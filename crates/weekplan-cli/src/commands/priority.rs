use clap::Subcommand;
use weekplan_core::{PlanEdit, PrioritySlot};

use super::{day, open_session, persist, CmdResult};

#[derive(Subcommand)]
pub enum PriorityAction {
    /// Set one of the three priorities of a day
    Set {
        /// Day index, 0 (Saturday) to 6 (Friday)
        day: u8,
        /// Priority slot, 0 to 2
        slot: u8,
        /// Priority text (empty clears the slot)
        #[arg(default_value = "")]
        text: String,
    },
}

pub fn run(offset: i64, action: PriorityAction) -> CmdResult {
    let mut session = open_session(offset)?;

    match action {
        PriorityAction::Set { day: d, slot, text } => {
            session.edit(PlanEdit::SetPriority {
                day: day(d)?,
                slot: PrioritySlot::new(slot)?,
                text,
            })?;
        }
    }

    persist(&mut session)?;
    println!("ok");
    Ok(())
}
