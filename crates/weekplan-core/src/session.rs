//! The active planning session: which week is open and what it holds.
//!
//! All state lives in one explicit value. Edits go through
//! [`crate::planner::apply`]; nothing touches storage until [`PlannerSession::save`]
//! or [`PlannerSession::reset`] is called.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{PlanError, QuoteRequestError, Result as CoreResult, StoreError};
use crate::model::{DayIndex, IdGenerator, UuidIds, WeekData};
use crate::planner::{self, PlanEdit};
use crate::quote::{quote_context, QuoteProvider, QuoteService};
use crate::storage::data_dir;
use crate::storage::kv::{KvStore, SqliteKv};
use crate::storage::week_store::{export_snapshot, WeekStore};
use crate::week::WeekWindow;

pub struct PlannerSession<S> {
    store: WeekStore<S>,
    today: NaiveDate,
    window: WeekWindow,
    data: WeekData,
    dirty: bool,
    /// The stored snapshot exists but could not be read; saving would
    /// replace it with whatever is in memory.
    unread: bool,
    ids: Box<dyn IdGenerator>,
}

impl PlannerSession<SqliteKv> {
    /// Open the week at `offset` from the config and database under `dir`.
    ///
    /// # Errors
    /// Fails if the config cannot be loaded, the database cannot be opened
    /// or the offset is out of range.
    pub fn open_in(dir: &Path, offset: i64) -> CoreResult<Self> {
        let config = Config::load_from(&dir.join("config.toml"))?;
        let db_path = config.db_path(dir);
        let session = Self::open(WeekStore::open(&db_path)?, offset)?;
        debug!(key = %session.window.key, db = %db_path.display(), "opened week");
        Ok(session)
    }

    /// [`Self::open_in`] over the default data directory.
    pub fn open_default(offset: i64) -> CoreResult<Self> {
        Self::open_in(&data_dir()?, offset)
    }
}

impl<S: KvStore> PlannerSession<S> {
    /// Open the week `offset` weeks from the current one.
    ///
    /// # Errors
    /// [`PlanError::OffsetOutOfRange`] when that week cannot be represented.
    pub fn open(store: WeekStore<S>, offset: i64) -> Result<Self, PlanError> {
        Self::open_at(store, Local::now().date_naive(), offset)
    }

    /// Open relative to a fixed `today`.
    pub fn open_at(store: WeekStore<S>, today: NaiveDate, offset: i64) -> Result<Self, PlanError> {
        let window = WeekWindow::resolve_from(today, offset)?;
        let (data, unread) = load_week(&store, &window);
        Ok(Self {
            store,
            today,
            window,
            data,
            dirty: false,
            unread,
            ids: Box::new(UuidIds),
        })
    }

    /// Replace the id source used by the `add_*` helpers.
    pub fn with_ids(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn window(&self) -> &WeekWindow {
        &self.window
    }

    pub fn data(&self) -> &WeekData {
        &self.data
    }

    /// Whether there are edits not yet saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Move `step` weeks and load that week. Unsaved edits of the week
    /// being left are dropped.
    ///
    /// # Errors
    /// [`PlanError::OffsetOutOfRange`] if the target week cannot be
    /// represented; the session stays on the current week.
    pub fn navigate(&mut self, step: i64) -> Result<(), PlanError> {
        let current = self.window.offset;
        let offset = current
            .checked_add(step)
            .ok_or(PlanError::OffsetOutOfRange(current.saturating_add(step)))?;
        let window = WeekWindow::resolve_from(self.today, offset)?;
        if self.dirty {
            debug!(key = %self.window.key, "leaving week with unsaved edits");
        }
        (self.data, self.unread) = load_week(&self.store, &window);
        self.window = window;
        self.dirty = false;
        Ok(())
    }

    /// Apply one edit to the open week.
    ///
    /// # Errors
    /// Propagates [`PlanError`]; the week is unchanged on error.
    pub fn edit(&mut self, edit: PlanEdit) -> Result<(), PlanError> {
        self.data = planner::apply(self.data.clone(), edit)?;
        self.dirty = true;
        Ok(())
    }

    /// Append a blank task to `day`, returning its id.
    pub fn add_task(&mut self, day: DayIndex) -> Result<String, PlanError> {
        let id = self.ids.next_id();
        self.edit(PlanEdit::AddTask { day, id: id.clone() })?;
        Ok(id)
    }

    /// Append an unnamed habit, returning its id.
    pub fn add_habit(&mut self) -> Result<String, PlanError> {
        let id = self.ids.next_id();
        self.edit(PlanEdit::AddHabit { id: id.clone() })?;
        Ok(id)
    }

    /// Append a blank reminder, returning its id.
    pub fn add_reminder(&mut self) -> Result<String, PlanError> {
        let id = self.ids.next_id();
        self.edit(PlanEdit::AddReminder { id: id.clone() })?;
        Ok(id)
    }

    pub fn progress(&self) -> u8 {
        planner::progress(&self.data.habits)
    }

    /// Persist the open week.
    ///
    /// # Errors
    /// Returns the store error; the in-memory week stays as is and remains dirty.
    /// Refuses with [`StoreError::Unavailable`] when the stored snapshot could
    /// not be read on open, so a transient read failure never overwrites it.
    pub fn save(&mut self) -> Result<(), StoreError> {
        if self.unread {
            return Err(StoreError::Unavailable(format!(
                "snapshot {} could not be read; refusing to overwrite it",
                self.window.key
            )));
        }
        self.store.save(&self.window.key, &self.data)?;
        self.dirty = false;
        Ok(())
    }

    /// Delete the open week's snapshot and return to the default week.
    /// Irreversible; callers should confirm first.
    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.store.clear(&self.window.key)?;
        self.data = WeekData::default();
        self.dirty = false;
        self.unread = false;
        info!(key = %self.window.key, "week reset");
        Ok(())
    }

    /// The snapshot bytes of the open week, as `save` would write them.
    pub fn export_snapshot(&self) -> Result<Vec<u8>, StoreError> {
        export_snapshot(&self.data)
    }

    /// Write `planner_{key}.json` into `dir`.
    pub fn export_to_dir(&self, dir: &Path) -> Result<PathBuf, StoreError> {
        self.store.export_to_dir(dir, &self.window.key, &self.data)
    }

    /// Fetch a new quote for this week's tasks and store it on the week.
    ///
    /// # Errors
    /// Only [`QuoteRequestError::Busy`]; provider failures become fallbacks.
    pub async fn refresh_quote<P: QuoteProvider>(
        &mut self,
        quotes: &QuoteService<P>,
    ) -> Result<String, QuoteRequestError> {
        let quote = quotes.request(&quote_context(&self.data)).await?;
        self.data.quote = quote.clone();
        self.dirty = true;
        Ok(quote)
    }

    /// [`Self::refresh_quote`] on a current-thread runtime.
    pub fn refresh_quote_blocking<P: QuoteProvider>(
        &mut self,
        quotes: &QuoteService<P>,
    ) -> Result<String, QuoteRequestError> {
        let quote = quotes.request_blocking(&quote_context(&self.data))?;
        self.data.quote = quote.clone();
        self.dirty = true;
        Ok(quote)
    }
}

/// Load the window's week, flagging a snapshot that exists but could not be read.
fn load_week<S: KvStore>(store: &WeekStore<S>, window: &WeekWindow) -> (WeekData, bool) {
    match store.try_load(&window.key) {
        Ok(data) => (data, false),
        Err(e) => {
            warn!(key = %window.key, error = %e, "failed to read snapshot, saving is disabled for this week");
            (WeekData::default(), true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuoteError;
    use crate::model::PrioritySlot;
    use crate::planner::TaskPatch;
    use crate::quote::FALLBACK_WITH_TASKS;
    use crate::storage::kv::FaultyKv;
    use crate::storage::MemoryKv;

    struct Counter(u32);

    impl IdGenerator for Counter {
        fn next_id(&mut self) -> String {
            self.0 += 1;
            format!("id-{}", self.0)
        }
    }

    struct Down;

    impl QuoteProvider for Down {
        async fn generate(&self, _tasks: &[String]) -> Result<String, QuoteError> {
            Err(QuoteError::Status(503))
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn day(i: u8) -> DayIndex {
        DayIndex::new(i).unwrap()
    }

    #[test]
    fn edits_are_not_persisted_until_save() {
        let kv = MemoryKv::new();
        let mut session =
            PlannerSession::open_at(WeekStore::new(kv.clone()), today(), 0).unwrap().with_ids(Counter(0));
        let id = session.add_task(day(2)).unwrap();
        assert_eq!(id, "id-1");
        assert!(session.is_dirty());
        assert!(kv.get("week_2026_10_10").unwrap().is_none());

        session.save().unwrap();
        assert!(!session.is_dirty());
        let reopened = PlannerSession::open_at(WeekStore::new(kv), today(), 0).unwrap();
        assert_eq!(reopened.data(), session.data());
    }

    #[test]
    fn navigate_loads_each_week_independently() {
        let kv = MemoryKv::new();
        let mut session = PlannerSession::open_at(WeekStore::new(kv), today(), 0).unwrap();
        session
            .edit(PlanEdit::SetQuote { text: "this week".into() })
            .unwrap();
        session.save().unwrap();

        session.navigate(-1).unwrap();
        assert_eq!(session.window().key.as_str(), "week_2026_10_3");
        assert_eq!(session.data(), &WeekData::default());

        session.navigate(1).unwrap();
        assert_eq!(session.data().quote, "this week");
    }

    #[test]
    fn navigate_drops_unsaved_edits() {
        let mut session = PlannerSession::open_at(WeekStore::new(MemoryKv::new()), today(), 0).unwrap();
        session.add_reminder().unwrap();
        session.navigate(1).unwrap();
        session.navigate(-1).unwrap();
        assert!(session.data().reminders.is_empty());
    }

    #[test]
    fn failed_edit_leaves_week_untouched() {
        let mut session = PlannerSession::open_at(WeekStore::new(MemoryKv::new()), today(), 0).unwrap();
        let before = session.data().clone();
        assert!(session.edit(PlanEdit::RemoveHabit { id: "nope".into() }).is_err());
        assert_eq!(session.data(), &before);
        assert!(!session.is_dirty());
    }

    #[test]
    fn reset_clears_store_and_memory_for_active_week_only() {
        let kv = MemoryKv::new();
        let mut session = PlannerSession::open_at(WeekStore::new(kv.clone()), today(), 0).unwrap();
        session.add_habit().unwrap();
        session.save().unwrap();
        session.navigate(1).unwrap();
        session.add_habit().unwrap();
        session.save().unwrap();

        session.reset().unwrap();
        assert_eq!(session.data(), &WeekData::default());
        assert!(kv.get("week_2026_10_17").unwrap().is_none());
        assert!(kv.get("week_2026_10_10").unwrap().is_some());
    }

    #[test]
    fn concurrent_writers_last_write_wins() {
        let kv = MemoryKv::new();
        let mut tab_a = PlannerSession::open_at(WeekStore::new(kv.clone()), today(), 0).unwrap();
        let mut tab_b = PlannerSession::open_at(WeekStore::new(kv.clone()), today(), 0).unwrap();

        tab_a.edit(PlanEdit::SetQuote { text: "from a".into() }).unwrap();
        tab_a
            .edit(PlanEdit::SetPriority { day: day(0), slot: PrioritySlot::new(0).unwrap(), text: "a".into() })
            .unwrap();
        tab_b.edit(PlanEdit::SetQuote { text: "from b".into() }).unwrap();

        tab_a.save().unwrap();
        tab_b.save().unwrap();

        let reopened = PlannerSession::open_at(WeekStore::new(kv), today(), 0).unwrap();
        assert_eq!(reopened.data().quote, "from b");
        // tab a's priority is gone entirely
        assert!(reopened.data().day(day(0)).is_blank());
    }

    #[test]
    fn export_matches_saved_snapshot() {
        let kv = MemoryKv::new();
        let mut session = PlannerSession::open_at(WeekStore::new(kv.clone()), today(), 0).unwrap();
        session.add_task(day(6)).unwrap();
        session.save().unwrap();
        let saved = kv.get("week_2026_10_10").unwrap().unwrap();
        assert_eq!(session.export_snapshot().unwrap(), saved.into_bytes());
    }

    #[test]
    fn quote_failure_stores_fallback_on_week() {
        let mut session =
            PlannerSession::open_at(WeekStore::new(MemoryKv::new()), today(), 0).unwrap().with_ids(Counter(0));
        let id = session.add_task(day(1)).unwrap();
        session
            .edit(PlanEdit::UpdateTask {
                day: day(1),
                id,
                patch: TaskPatch { text: Some("بخر شیر".into()), completed: None },
            })
            .unwrap();

        let quotes = QuoteService::new(Down);
        let quote = session.refresh_quote_blocking(&quotes).unwrap();
        assert_eq!(quote, FALLBACK_WITH_TASKS);
        assert_eq!(session.data().quote, FALLBACK_WITH_TASKS);
    }

    #[test]
    fn progress_of_default_week_is_zero() {
        let session = PlannerSession::open_at(WeekStore::new(MemoryKv::new()), today(), 0).unwrap();
        assert_eq!(session.progress(), 0);
    }

    #[test]
    fn failed_save_keeps_week_in_memory_and_dirty() {
        let store = WeekStore::new(FaultyKv { fail_writes: true, ..Default::default() });
        let mut session = PlannerSession::open_at(store, today(), 0).unwrap();
        session.edit(PlanEdit::SetQuote { text: "unsaved".into() }).unwrap();
        let before = session.data().clone();

        assert!(matches!(session.save(), Err(StoreError::Unavailable(_))));
        assert!(session.is_dirty());
        assert_eq!(session.data(), &before);
    }

    #[test]
    fn unreadable_snapshot_is_never_overwritten() {
        let inner = MemoryKv::new();
        let mut first = PlannerSession::open_at(WeekStore::new(inner.clone()), today(), 0).unwrap();
        first.edit(PlanEdit::SetQuote { text: "stored".into() }).unwrap();
        first.save().unwrap();
        let stored = inner.get("week_2026_10_10").unwrap();

        let store = WeekStore::new(FaultyKv { inner: inner.clone(), fail_reads: true, ..Default::default() });
        let mut session = PlannerSession::open_at(store, today(), 0).unwrap();
        assert_eq!(session.data(), &WeekData::default());
        session.edit(PlanEdit::SetQuote { text: "clobber".into() }).unwrap();

        assert!(matches!(session.save(), Err(StoreError::Unavailable(_))));
        assert!(session.is_dirty());
        assert_eq!(inner.get("week_2026_10_10").unwrap(), stored);
    }

    #[test]
    fn reset_allows_saving_over_unreadable_snapshot() {
        let store = WeekStore::new(FaultyKv { fail_reads: true, ..Default::default() });
        let mut session = PlannerSession::open_at(store, today(), 0).unwrap();
        assert!(session.save().is_err());
        session.reset().unwrap();
        session.add_reminder().unwrap();
        session.save().unwrap();
    }

    #[test]
    fn out_of_range_offset_is_rejected() {
        let result = PlannerSession::open_at(WeekStore::new(MemoryKv::new()), today(), i64::MAX);
        assert!(matches!(result, Err(PlanError::OffsetOutOfRange(i64::MAX))));
    }

    #[test]
    fn navigate_out_of_range_keeps_current_week() {
        let mut session = PlannerSession::open_at(WeekStore::new(MemoryKv::new()), today(), 0).unwrap();
        session.add_habit().unwrap();
        let before = session.window().clone();

        assert_eq!(
            session.navigate(100_000_000),
            Err(PlanError::OffsetOutOfRange(100_000_000))
        );
        assert_eq!(session.window(), &before);
        assert!(session.is_dirty());
        assert_eq!(session.data().habits.len(), 4);
    }

    #[test]
    fn open_in_uses_config_and_database_in_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut session = PlannerSession::open_in(dir.path(), 0).unwrap();
        session.edit(PlanEdit::SetQuote { text: "on disk".into() }).unwrap();
        session.save().unwrap();

        assert!(dir.path().join("config.toml").exists());
        assert!(dir.path().join("weekplan.db").exists());
        let reopened = PlannerSession::open_in(dir.path(), 0).unwrap();
        assert_eq!(reopened.data().quote, "on disk");
    }

    #[test]
    fn open_in_reports_bad_offset_as_plan_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = PlannerSession::open_in(dir.path(), i64::MIN).err().unwrap();
        assert!(matches!(err, crate::error::CoreError::Plan(PlanError::OffsetOutOfRange(_))));
    }
}
