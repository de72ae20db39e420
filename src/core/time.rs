use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

/// Clock abstracts access to the current date so report computations stay
/// deterministic. The engine itself never calls it; only the outermost layer
/// turns "now" into an explicit reference date.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;

    /// Returns the current UTC calendar date. Defaults to `now().date_naive()`.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Real-time clock backed by the system UTC time source, optionally shifted
/// by a fixed offset so "today" matches the user's calendar.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock {
    offset_minutes: i32,
}

impl SystemClock {
    pub fn with_offset_minutes(offset_minutes: i32) -> Self {
        Self { offset_minutes }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        (self.now() + Duration::minutes(i64::from(self.offset_minutes))).date_naive()
    }
}

/// Clock pinned to a single date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.0.and_time(NaiveTime::default()), Utc)
    }

    fn today(&self) -> NaiveDate {
        self.0
    }
}
