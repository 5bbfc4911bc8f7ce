//! Week offset resolution.
//!
//! A week starts on Saturday (weekday index 0) and runs through Friday.
//! Offsets are signed week counts relative to the week containing "today".
//! All computations have a `_from` form taking `today` explicitly; the
//! plain forms read the local clock.

use chrono::{Datelike, Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PlanError;

/// Persian weekday names, Saturday first.
pub const WEEKDAY_NAMES_FA: [&str; 7] = [
    "شنبه",
    "یکشنبه",
    "دوشنبه",
    "سه‌شنبه",
    "چهارشنبه",
    "پنجشنبه",
    "جمعه",
];

/// Storage key for one calendar week, e.g. `week_2026_10_10`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeekKey(String);

impl WeekKey {
    const PREFIX: &'static str = "week_";

    /// Key for the week starting on `start`.
    pub fn for_start(start: NaiveDate) -> Self {
        Self(format!(
            "{}{}_{}_{}",
            Self::PREFIX,
            start.year(),
            start.month(),
            start.day()
        ))
    }

    /// Accept an already-formatted key (e.g. read back from storage).
    /// Returns `None` unless it has the `week_Y_M_D` shape.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::date_of(raw).map(Self::for_start)
    }

    /// Start date encoded in the key.
    pub fn start(&self) -> Option<NaiveDate> {
        Self::date_of(&self.0)
    }

    fn date_of(raw: &str) -> Option<NaiveDate> {
        let rest = raw.strip_prefix(Self::PREFIX)?;
        let mut parts = rest.split('_');
        let y: i32 = parts.next()?.parse().ok()?;
        let m: u32 = parts.next()?.parse().ok()?;
        let d: u32 = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        NaiveDate::from_ymd_opt(y, m, d)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Days elapsed since the most recent Saturday (0 when `date` is a Saturday).
fn days_since_anchor(date: NaiveDate) -> u64 {
    u64::from((date.weekday().num_days_from_sunday() + 1) % 7)
}

fn shift_weeks(date: NaiveDate, offset: i64) -> Option<NaiveDate> {
    let days = Days::new(offset.unsigned_abs().checked_mul(7)?);
    if offset >= 0 {
        date.checked_add_days(days)
    } else {
        date.checked_sub_days(days)
    }
}

/// First day (Saturday) of the week `offset` weeks from the week containing `today`.
///
/// `None` when that week does not fit in the calendar `chrono` can represent.
pub fn start_of_week_from(today: NaiveDate, offset: i64) -> Option<NaiveDate> {
    let anchor = today.checked_sub_days(Days::new(days_since_anchor(today)))?;
    let start = shift_weeks(anchor, offset)?;
    // the whole week must be representable, not just its first day
    start.checked_add_days(Days::new(6))?;
    Some(start)
}

/// The seven consecutive dates of the week, Saturday first.
pub fn week_days_from(today: NaiveDate, offset: i64) -> Option<[NaiveDate; 7]> {
    let start = start_of_week_from(today, offset)?;
    Some(std::array::from_fn(|i| start + Days::new(i as u64)))
}

pub fn week_key_from(today: NaiveDate, offset: i64) -> Option<WeekKey> {
    start_of_week_from(today, offset).map(WeekKey::for_start)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// [`start_of_week_from`] against the local clock.
pub fn start_of_week(offset: i64) -> Option<NaiveDate> {
    start_of_week_from(today(), offset)
}

pub fn week_days(offset: i64) -> Option<[NaiveDate; 7]> {
    week_days_from(today(), offset)
}

pub fn week_key(offset: i64) -> Option<WeekKey> {
    week_key_from(today(), offset)
}

/// Header label for an offset.
pub fn offset_label(offset: i64) -> String {
    match offset {
        0 => "this week".to_string(),
        1 => "1 week later".to_string(),
        -1 => "1 week ago".to_string(),
        n if n > 0 => format!("{n} weeks later"),
        n => format!("{} weeks ago", n.unsigned_abs()),
    }
}

/// A resolved week: offset, key and dates, computed once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekWindow {
    pub offset: i64,
    pub key: WeekKey,
    pub start: NaiveDate,
    pub days: [NaiveDate; 7],
}

impl WeekWindow {
    /// # Errors
    /// [`PlanError::OffsetOutOfRange`] when the target week falls outside the
    /// supported date range.
    pub fn resolve_from(today: NaiveDate, offset: i64) -> Result<Self, PlanError> {
        let days = week_days_from(today, offset).ok_or(PlanError::OffsetOutOfRange(offset))?;
        Ok(Self {
            offset,
            key: WeekKey::for_start(days[0]),
            start: days[0],
            days,
        })
    }

    pub fn resolve(offset: i64) -> Result<Self, PlanError> {
        Self::resolve_from(today(), offset)
    }

    pub fn label(&self) -> String {
        offset_label(self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn saturday_is_its_own_week_start() {
        // 2026-10-10 is a Saturday
        assert_eq!(start_of_week_from(date(2026, 10, 10), 0), Some(date(2026, 10, 10)));
    }

    #[test]
    fn friday_belongs_to_previous_saturday() {
        assert_eq!(start_of_week_from(date(2026, 10, 16), 0), Some(date(2026, 10, 10)));
    }

    #[test]
    fn sunday_goes_back_one_day() {
        assert_eq!(start_of_week_from(date(2026, 10, 11), 0), Some(date(2026, 10, 10)));
    }

    #[test]
    fn negative_offset_crosses_year_boundary() {
        assert_eq!(start_of_week_from(date(2026, 1, 5), -1), Some(date(2025, 12, 27)));
    }

    #[test]
    fn key_format_has_no_zero_padding() {
        assert_eq!(week_key_from(date(2026, 1, 5), 0).unwrap().as_str(), "week_2026_1_3");
    }

    #[test]
    fn key_parse_normalizes() {
        let key = WeekKey::parse("week_2026_01_03").unwrap();
        assert_eq!(key.as_str(), "week_2026_1_3");
        assert!(WeekKey::parse("week_2026_13_1").is_none());
        assert!(WeekKey::parse("planner_2026_1_3").is_none());
        assert!(WeekKey::parse("week_2026_1_3_4").is_none());
    }

    #[test]
    fn labels() {
        assert_eq!(offset_label(0), "this week");
        assert_eq!(offset_label(2), "2 weeks later");
        assert_eq!(offset_label(-3), "3 weeks ago");
    }

    #[test]
    fn window_is_consistent() {
        let w = WeekWindow::resolve_from(date(2026, 10, 16), 1).unwrap();
        assert_eq!(w.start, date(2026, 10, 17));
        assert_eq!(w.days[6], date(2026, 10, 23));
        assert_eq!(w.key.as_str(), "week_2026_10_17");
        assert_eq!(w.label(), "1 week later");
    }

    #[test]
    fn huge_offsets_are_rejected() {
        let today = date(2026, 10, 16);
        assert_eq!(start_of_week_from(today, -100_000_000), None);
        assert_eq!(week_days_from(today, 100_000_000), None);
        assert_eq!(week_key_from(today, i64::MIN), None);
        assert_eq!(
            WeekWindow::resolve_from(today, i64::MAX),
            Err(PlanError::OffsetOutOfRange(i64::MAX))
        );
    }

    #[test]
    fn last_representable_week_resolves() {
        let last = NaiveDate::MAX - Days::new(6);
        let start = start_of_week_from(last, 0).unwrap();
        assert_eq!(start.weekday(), Weekday::Sat);
        assert_eq!(week_days_from(last, 0).unwrap()[6], start + Days::new(6));
        assert!(start_of_week_from(last, 1).is_none());
    }

    fn any_date() -> impl Strategy<Value = NaiveDate> {
        (1900i32..2200, 1u32..=12, 1u32..=28).prop_map(|(y, m, d)| date(y, m, d))
    }

    fn any_representable_date() -> impl Strategy<Value = NaiveDate> {
        let lo = NaiveDate::MIN.num_days_from_ce();
        let hi = NaiveDate::MAX.num_days_from_ce();
        (lo..=hi).prop_map(|n| NaiveDate::from_num_days_from_ce_opt(n).unwrap())
    }

    proptest! {
        #[test]
        fn start_is_always_saturday(today in any_date(), offset in -500i64..500) {
            prop_assert_eq!(start_of_week_from(today, offset).unwrap().weekday(), Weekday::Sat);
        }

        #[test]
        fn any_offset_resolves_or_is_rejected(today in any_representable_date(), offset in any::<i64>()) {
            match WeekWindow::resolve_from(today, offset) {
                Ok(window) => {
                    prop_assert_eq!(window.start.weekday(), Weekday::Sat);
                    prop_assert_eq!(window.days[6], window.start + Days::new(6));
                }
                Err(e) => prop_assert_eq!(e, PlanError::OffsetOutOfRange(offset)),
            }
        }

        #[test]
        fn current_week_contains_today(today in any_date()) {
            prop_assert!(week_days_from(today, 0).unwrap().contains(&today));
        }

        #[test]
        fn days_are_consecutive(today in any_date(), offset in -500i64..500) {
            let days = week_days_from(today, offset).unwrap();
            prop_assert_eq!(days.len(), 7);
            for i in 0..6 {
                prop_assert_eq!(days[i + 1], days[i] + Days::new(1));
            }
        }

        #[test]
        fn keys_equal_iff_starts_equal(today in any_date(), a in -200i64..200, b in -200i64..200) {
            let same_start = start_of_week_from(today, a) == start_of_week_from(today, b);
            let same_key = week_key_from(today, a) == week_key_from(today, b);
            prop_assert_eq!(same_start, same_key);
            prop_assert_eq!(week_key_from(today, a), week_key_from(today, a));
        }

        #[test]
        fn same_week_same_key(today in any_date()) {
            let start = start_of_week_from(today, 0).unwrap();
            for i in 0..7 {
                prop_assert_eq!(week_key_from(start + Days::new(i), 0), week_key_from(today, 0));
            }
        }
    }
}
