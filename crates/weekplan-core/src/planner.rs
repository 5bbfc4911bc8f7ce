//! Pure update operations over [`WeekData`].
//!
//! Every edit is a value: [`apply`] consumes the week, applies one
//! [`PlanEdit`] and hands back the new week. Ids for added items are chosen
//! by the caller (see [`crate::model::IdGenerator`]) so that `apply` stays
//! deterministic.

use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::model::{DayIndex, Habit, PrioritySlot, Task, WeekData};

/// Partial update for a task: only the `Some` fields change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    pub text: Option<String>,
    pub completed: Option<bool>,
}

impl TaskPatch {
    fn apply_to(self, task: &mut Task) {
        if let Some(text) = self.text {
            task.text = text;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
    }
}

/// A single change to a week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanEdit {
    SetQuote { text: String },
    SetPriority { day: DayIndex, slot: PrioritySlot, text: String },
    AddTask { day: DayIndex, id: String },
    UpdateTask { day: DayIndex, id: String, patch: TaskPatch },
    RemoveTask { day: DayIndex, id: String },
    AddHabit { id: String },
    RenameHabit { id: String, name: String },
    ToggleHabitCheck { id: String, day: DayIndex },
    RemoveHabit { id: String },
    AddReminder { id: String },
    ToggleReminder { id: String },
    SetReminderText { id: String, text: String },
    RemoveReminder { id: String },
}

/// Apply one edit, returning the updated week.
///
/// # Errors
/// [`PlanError::NotFound`] when the edit targets an unknown id, and
/// [`PlanError::DuplicateId`] when an add would reuse an id already present
/// in its collection. The input week is consumed either way.
pub fn apply(mut week: WeekData, edit: PlanEdit) -> Result<WeekData, PlanError> {
    match edit {
        PlanEdit::SetQuote { text } => week.quote = text,
        PlanEdit::SetPriority { day, slot, text } => {
            week.day_mut(day).priorities[slot.get()] = text;
        }
        PlanEdit::AddTask { day, id } => {
            let tasks = &mut week.day_mut(day).tasks;
            ensure_unique(tasks.iter().map(|t| t.id.as_str()), &id, "task")?;
            tasks.push(Task::new(id));
        }
        PlanEdit::UpdateTask { day, id, patch } => {
            let task = week
                .days
                .get_mut(&day)
                .and_then(|d| d.tasks.iter_mut().find(|t| t.id == id))
                .ok_or_else(|| not_found("task", &id))?;
            patch.apply_to(task);
        }
        PlanEdit::RemoveTask { day, id } => {
            let day = week.days.get_mut(&day).ok_or_else(|| not_found("task", &id))?;
            remove_by_id(&mut day.tasks, &id, |t| &t.id, "task")?;
        }
        PlanEdit::AddHabit { id } => {
            ensure_unique(week.habits.iter().map(|h| h.id.as_str()), &id, "habit")?;
            week.habits.push(Habit::new(id, ""));
        }
        PlanEdit::RenameHabit { id, name } => {
            find_habit(&mut week.habits, &id)?.name = name;
        }
        PlanEdit::ToggleHabitCheck { id, day } => {
            let check = &mut find_habit(&mut week.habits, &id)?.checks[day.get()];
            *check = !*check;
        }
        PlanEdit::RemoveHabit { id } => {
            remove_by_id(&mut week.habits, &id, |h| &h.id, "habit")?;
        }
        PlanEdit::AddReminder { id } => {
            ensure_unique(week.reminders.iter().map(|r| r.id.as_str()), &id, "reminder")?;
            week.reminders.push(Task::new(id));
        }
        PlanEdit::ToggleReminder { id } => {
            let reminder = find_reminder(&mut week.reminders, &id)?;
            reminder.completed = !reminder.completed;
        }
        PlanEdit::SetReminderText { id, text } => {
            find_reminder(&mut week.reminders, &id)?.text = text;
        }
        PlanEdit::RemoveReminder { id } => {
            remove_by_id(&mut week.reminders, &id, |r| &r.id, "reminder")?;
        }
    }
    Ok(week)
}

/// Share of habit checks set this week, as a rounded percentage.
/// Zero when there are no habits.
pub fn progress(habits: &[Habit]) -> u8 {
    let possible = habits.len() * 7;
    if possible == 0 {
        return 0;
    }
    let checked: usize = habits.iter().map(Habit::checked_count).sum();
    // checked <= possible, so the result fits in 0..=100
    ((checked as f64 / possible as f64) * 100.0).round() as u8
}

fn not_found(kind: &'static str, id: &str) -> PlanError {
    PlanError::NotFound { kind, id: id.to_string() }
}

fn ensure_unique<'a>(
    mut existing: impl Iterator<Item = &'a str>,
    id: &str,
    kind: &'static str,
) -> Result<(), PlanError> {
    if existing.any(|e| e == id) {
        return Err(PlanError::DuplicateId { kind, id: id.to_string() });
    }
    Ok(())
}

fn remove_by_id<T>(
    items: &mut Vec<T>,
    id: &str,
    id_of: impl Fn(&T) -> &String,
    kind: &'static str,
) -> Result<(), PlanError> {
    let before = items.len();
    items.retain(|item| id_of(item) != id);
    if items.len() == before {
        return Err(not_found(kind, id));
    }
    Ok(())
}

fn find_habit<'a>(habits: &'a mut [Habit], id: &str) -> Result<&'a mut Habit, PlanError> {
    habits
        .iter_mut()
        .find(|h| h.id == id)
        .ok_or_else(|| not_found("habit", id))
}

fn find_reminder<'a>(reminders: &'a mut [Task], id: &str) -> Result<&'a mut Task, PlanError> {
    reminders
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or_else(|| not_found("reminder", id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(i: u8) -> DayIndex {
        DayIndex::new(i).unwrap()
    }

    fn add_task(week: WeekData, d: u8, id: &str) -> WeekData {
        apply(week, PlanEdit::AddTask { day: day(d), id: id.into() }).unwrap()
    }

    #[test]
    fn set_priority_touches_one_slot() {
        let week = apply(
            WeekData::default(),
            PlanEdit::SetPriority {
                day: day(3),
                slot: PrioritySlot::new(1).unwrap(),
                text: "ship".into(),
            },
        )
        .unwrap();
        assert_eq!(week.day(day(3)).priorities, ["", "ship", ""]);
    }

    #[test]
    fn add_then_remove_task_leaves_other_days_alone() {
        let week = add_task(WeekData::default(), 0, "keep");
        let original_day0 = week.day(day(0));

        let week = add_task(week, 2, "t1");
        assert_eq!(week.day(day(2)).tasks.len(), 1);

        let week = apply(week, PlanEdit::RemoveTask { day: day(2), id: "t1".into() }).unwrap();
        assert!(week.day(day(2)).tasks.is_empty());
        assert_eq!(week.day(day(0)), original_day0);
    }

    #[test]
    fn tasks_append_at_end() {
        let week = add_task(add_task(WeekData::default(), 1, "a"), 1, "b");
        let ids: Vec<_> = week.day(day(1)).tasks.into_iter().map(|t| t.id).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn duplicate_task_id_rejected_within_day_only() {
        let week = add_task(WeekData::default(), 1, "a");
        let err = apply(week.clone(), PlanEdit::AddTask { day: day(1), id: "a".into() });
        assert_eq!(err, Err(PlanError::DuplicateId { kind: "task", id: "a".into() }));
        assert!(apply(week, PlanEdit::AddTask { day: day(2), id: "a".into() }).is_ok());
    }

    #[test]
    fn update_task_applies_partial_fields() {
        let week = add_task(WeekData::default(), 5, "t");
        let week = apply(
            week,
            PlanEdit::UpdateTask {
                day: day(5),
                id: "t".into(),
                patch: TaskPatch { text: Some("buy milk".into()), completed: None },
            },
        )
        .unwrap();
        let week = apply(
            week,
            PlanEdit::UpdateTask {
                day: day(5),
                id: "t".into(),
                patch: TaskPatch { text: None, completed: Some(true) },
            },
        )
        .unwrap();
        let task = &week.day(day(5)).tasks[0];
        assert_eq!(task.text, "buy milk");
        assert!(task.completed);
    }

    #[test]
    fn unknown_ids_are_reported() {
        let week = WeekData::default();
        assert!(matches!(
            apply(week.clone(), PlanEdit::RemoveTask { day: day(0), id: "x".into() }),
            Err(PlanError::NotFound { kind: "task", .. })
        ));
        assert!(matches!(
            apply(week.clone(), PlanEdit::ToggleHabitCheck { id: "x".into(), day: day(0) }),
            Err(PlanError::NotFound { kind: "habit", .. })
        ));
        assert!(matches!(
            apply(week, PlanEdit::ToggleReminder { id: "x".into() }),
            Err(PlanError::NotFound { kind: "reminder", .. })
        ));
    }

    #[test]
    fn toggle_habit_check_flips_exactly_one() {
        let week = WeekData::default();
        let before = week.habits[1].checks;
        let week = apply(week, PlanEdit::ToggleHabitCheck { id: "2".into(), day: day(4) }).unwrap();
        let after = week.habits[1].checks;
        for i in 0..7 {
            assert_eq!(after[i], if i == 4 { !before[i] } else { before[i] });
        }
        let week = apply(week, PlanEdit::ToggleHabitCheck { id: "2".into(), day: day(4) }).unwrap();
        assert_eq!(week.habits[1].checks, before);
    }

    #[test]
    fn habit_lifecycle() {
        let week = apply(WeekData::default(), PlanEdit::AddHabit { id: "h".into() }).unwrap();
        assert_eq!(week.habits.len(), 4);
        assert_eq!(week.habits[3].name, "");
        let week = apply(week, PlanEdit::RenameHabit { id: "h".into(), name: "walk".into() }).unwrap();
        assert_eq!(week.habits[3].name, "walk");
        let week = apply(week, PlanEdit::RemoveHabit { id: "1".into() }).unwrap();
        assert_eq!(week.habits.len(), 3);
        assert!(week.habits.iter().all(|h| h.id != "1"));
    }

    #[test]
    fn reminder_lifecycle() {
        let week = apply(WeekData::default(), PlanEdit::AddReminder { id: "r".into() }).unwrap();
        let week = apply(week, PlanEdit::SetReminderText { id: "r".into(), text: String::new() }).unwrap();
        let week = apply(week, PlanEdit::ToggleReminder { id: "r".into() }).unwrap();
        assert!(week.reminders[0].completed);
        let week = apply(week, PlanEdit::ToggleReminder { id: "r".into() }).unwrap();
        assert!(!week.reminders[0].completed);
        let week = apply(week, PlanEdit::RemoveReminder { id: "r".into() }).unwrap();
        assert!(week.reminders.is_empty());
    }

    #[test]
    fn progress_bounds() {
        assert_eq!(progress(&[]), 0);
        assert_eq!(progress(&WeekData::default().habits), 0);

        let mut full = Habit::new("a", "a");
        full.checks = [true; 7];
        assert_eq!(progress(&[full.clone(), full]), 100);
    }

    #[test]
    fn progress_rounds() {
        let mut h = Habit::new("a", "a");
        h.checks[0] = true;
        // 1/7 = 14.28..%
        assert_eq!(progress(&[h.clone()]), 14);
        h.checks[1] = true;
        h.checks[2] = true;
        h.checks[3] = true;
        // 4/7 = 57.14..%
        assert_eq!(progress(&[h]), 57);
    }

    #[test]
    fn progress_is_monotonic() {
        let mut week = WeekData::default();
        let mut last = progress(&week.habits);
        for id in ["1", "2", "3"] {
            for d in DayIndex::all() {
                week = apply(week, PlanEdit::ToggleHabitCheck { id: id.into(), day: d }).unwrap();
                let now = progress(&week.habits);
                assert!(now >= last);
                last = now;
            }
        }
        assert_eq!(last, 100);
    }
}
