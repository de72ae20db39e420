//! Calendar arithmetic shared by the cycle calculator and the aggregator.

use chrono::{Datelike, Duration, NaiveDate};

/// Number of days in the given month, accounting for leap years.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    match NaiveDate::from_ymd_opt(next_year, next_month, 1) {
        Some(first_next) => (first_next - Duration::days(1)).day(),
        None => 31,
    }
}

/// Builds a date with `day` clamped to the last valid day of the month.
///
/// Saturates at chrono's representable range instead of failing.
pub fn clamped_date(year: i32, month: u32, day: u32) -> NaiveDate {
    let day = day.clamp(1, days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(if year < 0 {
        NaiveDate::MIN
    } else {
        NaiveDate::MAX
    })
}

/// Zero-based month counter: `year * 12 + (month - 1)`.
pub fn month_index(date: NaiveDate) -> i32 {
    date.year() * 12 + date.month0() as i32
}

/// Inverse of [`month_index`] for a given day-of-month, with clamping.
pub fn date_from_month_index(index: i32, day: u32) -> NaiveDate {
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    clamped_date(year, month, day)
}

pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    clamped_date(date.year(), date.month(), 1)
}

pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    clamped_date(date.year(), date.month(), 31)
}

/// Inclusive calendar-month window, used for "this month" and "next month"
/// reporting buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl MonthWindow {
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            start: start_of_month(date),
            end: end_of_month(date),
        }
    }

    pub fn following(date: NaiveDate) -> Self {
        Self::containing(date_from_month_index(month_index(date) + 1, 1))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}
