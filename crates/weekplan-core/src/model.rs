//! Week planning data model.
//!
//! [`WeekData`] is the persisted unit: one snapshot per calendar week.
//! Field names serialize exactly as the snapshot format expects
//! (`quote`, `reminders`, `habits`, `days`), with day indices as string
//! keys `"0"`..`"6"`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

use crate::error::PlanError;

/// Quote shown for a week nobody has edited yet.
pub const DEFAULT_QUOTE: &str =
    "در زمان سخت به یاد بیاور، چالش‌ها راهی دیگر و سازگارتر را نشان می‌دهند";

/// Names of the habits seeded into a fresh week, with ids "1".."3".
pub const DEFAULT_HABITS: [&str; 3] = ["📚 مطالعه روزانه", "💧 نوشیدن آب", "🧘 مدیتیشن"];

/// A checklist item. Used for both day tasks and week reminders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: String::new(),
            completed: false,
        }
    }
}

/// A timed entry on a day card. Stored and round-tripped, never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DayData {
    #[serde(default)]
    pub priorities: [String; 3],
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl DayData {
    /// True when the day carries nothing worth storing.
    pub fn is_blank(&self) -> bool {
        self.priorities.iter().all(String::is_empty)
            && self.events.is_empty()
            && self.tasks.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub checks: [bool; 7],
}

impl Habit {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            checks: [false; 7],
        }
    }

    pub fn checked_count(&self) -> usize {
        self.checks.iter().filter(|c| **c).count()
    }
}

/// Everything planned for one week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekData {
    #[serde(default)]
    pub quote: String,
    #[serde(default)]
    pub reminders: Vec<Task>,
    #[serde(default)]
    pub habits: Vec<Habit>,
    /// Sparse: a missing index means an empty [`DayData`].
    #[serde(default)]
    pub days: BTreeMap<DayIndex, DayData>,
}

impl Default for WeekData {
    fn default() -> Self {
        Self {
            quote: DEFAULT_QUOTE.to_string(),
            reminders: Vec::new(),
            habits: DEFAULT_HABITS
                .iter()
                .enumerate()
                .map(|(i, name)| Habit::new((i + 1).to_string(), *name))
                .collect(),
            days: BTreeMap::new(),
        }
    }
}

impl WeekData {
    /// The day at `index`, or an empty day when none is stored.
    pub fn day(&self, index: DayIndex) -> DayData {
        self.days.get(&index).cloned().unwrap_or_default()
    }

    /// Mutable access to a day, materializing the empty default if absent.
    pub fn day_mut(&mut self, index: DayIndex) -> &mut DayData {
        self.days.entry(index).or_default()
    }

    /// All tasks across the week in day order.
    pub fn all_tasks(&self) -> impl Iterator<Item = &Task> {
        self.days.values().flat_map(|d| d.tasks.iter())
    }
}

/// Weekday index, 0 (Saturday) through 6 (Friday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DayIndex(u8);

impl DayIndex {
    pub const COUNT: u8 = 7;

    pub fn new(index: u8) -> Result<Self, PlanError> {
        if index < Self::COUNT {
            Ok(Self(index))
        } else {
            Err(PlanError::DayOutOfRange(index))
        }
    }

    pub fn all() -> impl Iterator<Item = DayIndex> {
        (0..Self::COUNT).map(DayIndex)
    }

    pub fn get(self) -> usize {
        usize::from(self.0)
    }
}

impl TryFrom<u8> for DayIndex {
    type Error = PlanError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DayIndex> for u8 {
    fn from(value: DayIndex) -> Self {
        value.0
    }
}

impl fmt::Display for DayIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the three fixed priority slots of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrioritySlot(u8);

impl PrioritySlot {
    pub fn new(slot: u8) -> Result<Self, PlanError> {
        if slot < 3 {
            Ok(Self(slot))
        } else {
            Err(PlanError::SlotOutOfRange(slot))
        }
    }

    pub fn get(self) -> usize {
        usize::from(self.0)
    }
}

/// Source of ids for new tasks, habits and reminders.
pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

/// Random UUID v4 ids.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}
