//! Business-day offsets.

use chrono::{Datelike, NaiveDate, TimeDelta};

/// Returns the date `delay` business days after `start`, skipping weekends.
///
/// With `d` the weekday of `start` (0 for Sunday through 6 for Saturday),
/// the offset is `delay + floor((delay + d - 1) / 5) * 2` calendar days. A
/// zero delay always returns `start`. Dates past the calendar range
/// saturate at [`NaiveDate::MAX`].
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use fleetscope::schedule::domain::horizon;
///
/// let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// assert_eq!(horizon(monday, 5), NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
/// assert_eq!(horizon(monday, 0), monday);
/// ```
#[must_use]
pub fn horizon(start: NaiveDate, delay: u32) -> NaiveDate {
    if delay == 0 {
        return start;
    }
    let days = i64::from(delay);
    let weekday = i64::from(start.weekday().num_days_from_sunday());
    let weekends = (days + weekday - 1).div_euclid(5);
    let offset = days + weekends * 2;
    TimeDelta::try_days(offset)
        .and_then(|delta| start.checked_add_signed(delta))
        .unwrap_or(NaiveDate::MAX)
}
