use std::{fmt, str::FromStr};

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::calendar::{clamped_date, date_from_month_index, month_index};
use crate::errors::EngineError;

/// Recurrence unit of a subscription.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Schedule {
    Monthly,
    Yearly,
}

impl Schedule {
    pub fn label(&self) -> &'static str {
        match self {
            Schedule::Monthly => "Monthly",
            Schedule::Yearly => "Yearly",
        }
    }

    /// Position of `date` on this schedule's period axis (months or years).
    fn period_of(&self, date: NaiveDate) -> i32 {
        match self {
            Schedule::Monthly => month_index(date),
            Schedule::Yearly => date.year(),
        }
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Schedule {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "monthly" | "month" => Ok(Schedule::Monthly),
            "yearly" | "year" | "annual" => Ok(Schedule::Yearly),
            other => Err(EngineError::InvalidSchedule(other.to_string())),
        }
    }
}

/// Schedule plus the immutable first-payment date that seeds every occurrence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecurrenceRule {
    pub schedule: Schedule,
    pub anchor_date: NaiveDate,
}

impl RecurrenceRule {
    pub fn new(schedule: Schedule, anchor_date: NaiveDate) -> Self {
        Self {
            schedule,
            anchor_date,
        }
    }

    pub fn monthly(anchor_date: NaiveDate) -> Self {
        Self::new(Schedule::Monthly, anchor_date)
    }

    pub fn yearly(anchor_date: NaiveDate) -> Self {
        Self::new(Schedule::Yearly, anchor_date)
    }

    /// The occurrence falling in `period`, with the anchor day clamped to the
    /// length of the target month.
    fn occurrence_in(&self, period: i32) -> NaiveDate {
        let anchor = self.anchor_date;
        match self.schedule {
            Schedule::Monthly => date_from_month_index(period, anchor.day()),
            Schedule::Yearly => clamped_date(period, anchor.month(), anchor.day()),
        }
    }
}

/// Payment dates around a reference date.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CycleOccurrences {
    /// `None` when `next` is the first payment itself.
    pub previous: Option<NaiveDate>,
    pub next: NaiveDate,
    pub second_next: NaiveDate,
}

/// Derives the previous, next, and second-next payment dates of `rule`
/// relative to `reference`.
///
/// A payment due on `reference` counts as `next`. Occurrences are always
/// rebuilt from the anchor day, so a subscription anchored on the 31st lands
/// on the last day of short months and returns to the 31st afterwards.
pub fn compute_occurrences(rule: &RecurrenceRule, reference: NaiveDate) -> CycleOccurrences {
    let schedule = rule.schedule;

    if rule.anchor_date > reference {
        let period = schedule.period_of(rule.anchor_date);
        return CycleOccurrences {
            previous: None,
            next: rule.anchor_date,
            second_next: rule.occurrence_in(period + 1),
        };
    }

    let mut period = schedule.period_of(reference);
    if rule.occurrence_in(period) < reference {
        period += 1;
    }
    let next = rule.occurrence_in(period);
    let previous = Some(rule.occurrence_in(period - 1)).filter(|date| *date >= rule.anchor_date);

    CycleOccurrences {
        previous,
        next,
        second_next: rule.occurrence_in(period + 1),
    }
}

/// How close the next payment is, used to flag subscriptions for reminders.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DueStatus {
    DueToday,
    DueSoon,
    Upcoming,
}

impl DueStatus {
    pub fn classify(next: NaiveDate, reference: NaiveDate, notify_days_before: u32) -> DueStatus {
        if next <= reference {
            return DueStatus::DueToday;
        }
        // A window reaching past the calendar's end covers every later date.
        match reference.checked_add_days(Days::new(u64::from(notify_days_before))) {
            Some(cutoff) if next > cutoff => DueStatus::Upcoming,
            _ => DueStatus::DueSoon,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DueStatus::DueToday => "due today",
            DueStatus::DueSoon => "due soon",
            DueStatus::Upcoming => "upcoming",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn monthly_due_today_is_next() {
        let rule = RecurrenceRule::monthly(date(2020, 3, 14));
        let occ = compute_occurrences(&rule, date(2020, 5, 14));
        assert_eq!(occ.previous, Some(date(2020, 4, 14)));
        assert_eq!(occ.next, date(2020, 5, 14));
        assert_eq!(occ.second_next, date(2020, 6, 14));
    }

    #[test]
    fn monthly_rolls_forward_when_day_has_passed() {
        let rule = RecurrenceRule::monthly(date(2020, 3, 14));
        let occ = compute_occurrences(&rule, date(2020, 5, 20));
        assert_eq!(occ.previous, Some(date(2020, 5, 14)));
        assert_eq!(occ.next, date(2020, 6, 14));
        assert_eq!(occ.second_next, date(2020, 7, 14));
    }

    #[test]
    fn monthly_rolls_across_year_end() {
        let rule = RecurrenceRule::monthly(date(2021, 1, 10));
        let occ = compute_occurrences(&rule, date(2023, 12, 11));
        assert_eq!(occ.previous, Some(date(2023, 12, 10)));
        assert_eq!(occ.next, date(2024, 1, 10));
        assert_eq!(occ.second_next, date(2024, 2, 10));
    }

    #[test]
    fn monthly_clamps_day_31_into_february() {
        let rule = RecurrenceRule::monthly(date(2023, 1, 31));
        let occ = compute_occurrences(&rule, date(2023, 2, 10));
        assert_eq!(occ.previous, Some(date(2023, 1, 31)));
        assert_eq!(occ.next, date(2023, 2, 28));
        assert_eq!(occ.second_next, date(2023, 3, 31));

        let leap = compute_occurrences(&rule, date(2024, 2, 1));
        assert_eq!(leap.next, date(2024, 2, 29));
    }

    #[test]
    fn monthly_clamped_candidate_in_past_moves_to_full_day() {
        let rule = RecurrenceRule::monthly(date(2023, 1, 31));
        let occ = compute_occurrences(&rule, date(2023, 4, 30));
        assert_eq!(occ.next, date(2023, 4, 30));
        let occ = compute_occurrences(&rule, date(2023, 2, 28));
        assert_eq!(occ.next, date(2023, 2, 28));
        assert_eq!(occ.previous, Some(date(2023, 1, 31)));
        let occ = compute_occurrences(&rule, date(2023, 3, 1));
        assert_eq!(occ.previous, Some(date(2023, 2, 28)));
        assert_eq!(occ.next, date(2023, 3, 31));
        assert_eq!(occ.second_next, date(2023, 4, 30));
    }

    #[test]
    fn future_anchor_has_no_previous() {
        let rule = RecurrenceRule::monthly(date(2024, 7, 31));
        let occ = compute_occurrences(&rule, date(2024, 5, 1));
        assert_eq!(occ.previous, None);
        assert_eq!(occ.next, date(2024, 7, 31));
        assert_eq!(occ.second_next, date(2024, 8, 31));
    }

    #[test]
    fn anchor_on_reference_has_no_previous() {
        let rule = RecurrenceRule::yearly(date(2024, 5, 1));
        let occ = compute_occurrences(&rule, date(2024, 5, 1));
        assert_eq!(occ.previous, None);
        assert_eq!(occ.next, date(2024, 5, 1));
        assert_eq!(occ.second_next, date(2025, 5, 1));
    }

    #[test]
    fn yearly_matches_month_and_day() {
        let rule = RecurrenceRule::yearly(date(2019, 9, 5));
        let before = compute_occurrences(&rule, date(2022, 9, 4));
        assert_eq!(before.previous, Some(date(2021, 9, 5)));
        assert_eq!(before.next, date(2022, 9, 5));
        assert_eq!(before.second_next, date(2023, 9, 5));

        let after = compute_occurrences(&rule, date(2022, 9, 6));
        assert_eq!(after.previous, Some(date(2022, 9, 5)));
        assert_eq!(after.next, date(2023, 9, 5));
    }

    #[test]
    fn yearly_leap_day_anchor_clamps_in_common_years() {
        let rule = RecurrenceRule::yearly(date(2020, 2, 29));
        let occ = compute_occurrences(&rule, date(2021, 1, 15));
        assert_eq!(occ.previous, Some(date(2020, 2, 29)));
        assert_eq!(occ.next, date(2021, 2, 28));
        assert_eq!(occ.second_next, date(2022, 2, 28));

        let leap = compute_occurrences(&rule, date(2023, 3, 1));
        assert_eq!(leap.next, date(2024, 2, 29));
    }

    #[test]
    fn parses_schedule_labels() {
        assert_eq!("Monthly".parse::<Schedule>().unwrap(), Schedule::Monthly);
        assert_eq!(" yearly ".parse::<Schedule>().unwrap(), Schedule::Yearly);
        assert!(matches!(
            "weekly".parse::<Schedule>(),
            Err(EngineError::InvalidSchedule(_))
        ));
    }

    #[test]
    fn classify_due_status_windows() {
        let reference = date(2024, 3, 10);
        assert_eq!(
            DueStatus::classify(reference, reference, 3),
            DueStatus::DueToday
        );
        assert_eq!(
            DueStatus::classify(date(2024, 3, 13), reference, 3),
            DueStatus::DueSoon
        );
        assert_eq!(
            DueStatus::classify(date(2024, 3, 14), reference, 3),
            DueStatus::Upcoming
        );
        assert_eq!(
            DueStatus::classify(date(2024, 3, 11), reference, 0),
            DueStatus::Upcoming
        );
    }

    #[test]
    fn classify_with_oversized_window_marks_due_soon() {
        let reference = date(2024, 3, 10);
        assert_eq!(
            DueStatus::classify(date(2024, 3, 15), reference, u32::MAX),
            DueStatus::DueSoon
        );
        let last = NaiveDate::MAX;
        let day_before = last.pred_opt().unwrap();
        assert_eq!(
            DueStatus::classify(last, day_before, 5),
            DueStatus::DueSoon
        );
    }
}
