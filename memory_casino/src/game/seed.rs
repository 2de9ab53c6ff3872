//! Date-derived seeds for the Daily Challenge.

use chrono::{Datelike, Local, NaiveDate};

/// Seed shared by every Daily Challenge played on `date`, as `yyyymmdd`.
pub fn daily_seed(date: NaiveDate) -> u64 {
    let year = u64::try_from(date.year()).unwrap_or_default();
    year * 10_000 + u64::from(date.month()) * 100 + u64::from(date.day())
}

/// Seed for today's Daily Challenge in local time.
pub fn today_seed() -> u64 {
    daily_seed(Local::now().date_naive())
}
