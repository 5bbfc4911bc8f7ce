pub mod config;
pub mod habit;
pub mod priority;
pub mod quote;
pub mod reminder;
pub mod task;
pub mod week;

use weekplan_core::{CoreError, DayIndex, PlannerSession, SqliteKv};

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Open the week at `offset` from the configured store.
pub fn open_session(offset: i64) -> Result<PlannerSession<SqliteKv>, CoreError> {
    PlannerSession::open_default(offset)
}

/// Save after a mutating command, with a clear notice when storage refuses.
pub fn persist(session: &mut PlannerSession<SqliteKv>) -> CmdResult {
    if let Err(e) = session.save() {
        eprintln!(
            "warning: could not save {}; changes were not persisted",
            session.window().key
        );
        return Err(e.into());
    }
    Ok(())
}

pub fn day(index: u8) -> Result<DayIndex, Box<dyn std::error::Error>> {
    Ok(DayIndex::new(index)?)
}
