//! Billing cycle calculator: recurrence rules and the payment dates they
//! produce around a reference date.

pub mod calendar;
pub mod occurrences;

pub use calendar::{days_in_month, end_of_month, start_of_month, MonthWindow};
pub use occurrences::{
    compute_occurrences, CycleOccurrences, DueStatus, RecurrenceRule, Schedule,
};
