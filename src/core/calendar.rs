//! Calendar helpers for day-based bucketing.
//!
//! Completions are stored as UTC instants but counted per *local* calendar day:
//! a day starts at local midnight. [`DayWindow`] captures one such day as a
//! half-open `[start, end)` UTC interval, which keeps the query engine free of
//! timezone arithmetic and handles days that are 23 or 25 hours long.

use chrono::{DateTime, Duration, Local, Months, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};

/// One local calendar day expressed as a UTC interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    /// The local calendar date
    pub day: NaiveDate,
    /// First instant of the day (inclusive)
    pub start: DateTime<Utc>,
    /// First instant of the following day (exclusive)
    pub end: DateTime<Utc>,
}

impl DayWindow {
    /// Builds the window for `day` in the given timezone.
    pub fn new<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> Self {
        let start = start_of_day(day, tz);
        let end = day
            .succ_opt()
            .map_or_else(|| start + Duration::days(1), |next| start_of_day(next, tz));
        Self { day, start, end }
    }

    /// Builds the window for `day` in the system's local timezone.
    #[must_use]
    pub fn local(day: NaiveDate) -> Self {
        Self::new(day, &Local)
    }

    /// The local day containing the current moment.
    #[must_use]
    pub fn today() -> Self {
        Self::local(Local::now().date_naive())
    }

    /// The local day (in `tz`) that contains `instant`.
    pub fn containing<Tz: TimeZone>(instant: DateTime<Utc>, tz: &Tz) -> Self {
        Self::new(local_day(instant, tz), tz)
    }

    /// Whether `instant` falls inside this day.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// The local calendar date of a UTC instant.
pub fn local_day<Tz: TimeZone>(instant: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

/// First instant of `day` in `tz`, as UTC.
///
/// When local midnight does not exist (a DST gap at midnight) the day starts at
/// the first valid local time an hour later. When it is ambiguous the earlier
/// instant wins.
pub fn start_of_day<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let midnight = day.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(midnight + Duration::hours(1))).earliest())
        .map_or_else(|| midnight.and_utc(), |dt| dt.with_timezone(&Utc))
}

/// The Monday-first week containing `day`.
#[must_use]
pub fn week_of(day: NaiveDate) -> Vec<NaiveDate> {
    day.week(Weekday::Mon).first_day().iter_days().take(7).collect()
}

/// Number of days in the given month, or `None` for an invalid month.
#[must_use]
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = first.checked_add_months(Months::new(1))?;
    u32::try_from(next.signed_duration_since(first).num_days()).ok()
}

/// `[start, end)` UTC bounds of a local calendar month.
pub fn month_bounds<Tz: TimeZone>(
    year: i32,
    month: u32,
    tz: &Tz,
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = first.checked_add_months(Months::new(1))?;
    Some((start_of_day(first, tz), start_of_day(next, tz)))
}
