//! Tick-based date and time values.
//!
//! Dates are stored as ticks (100 ns intervals since `0001-01-01T00:00:00`),
//! which is the form the constant folder writes back into constructor calls
//! (`new DateTime(ticks)`). Calendar fields are computed with `chrono`.

use std::fmt;

use chrono::{DateTime as ChronoDateTime, Datelike, Local, NaiveDateTime, Timelike, Utc};

/// Ticks in one second.
pub const TICKS_PER_SECOND: i64 = 10_000_000;
/// Ticks in one day.
pub const TICKS_PER_DAY: i64 = TICKS_PER_SECOND * 86_400;
/// Ticks at `1970-01-01T00:00:00`.
pub const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;

/// A signed duration in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TimeSpan {
    pub ticks: i64,
}

impl TimeSpan {
    pub const ZERO: TimeSpan = TimeSpan { ticks: 0 };

    pub const fn from_ticks(ticks: i64) -> Self {
        Self { ticks }
    }

    pub fn from_seconds(seconds: f64) -> Self {
        Self {
            ticks: (seconds * TICKS_PER_SECOND as f64) as i64,
        }
    }

    pub fn total_seconds(&self) -> f64 {
        self.ticks as f64 / TICKS_PER_SECOND as f64
    }

    pub fn total_days(&self) -> f64 {
        self.ticks as f64 / TICKS_PER_DAY as f64
    }
}

impl fmt::Display for TimeSpan {
    /// `[-][d.]hh:mm:ss[.fffffff]`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.ticks < 0 { "-" } else { "" };
        let ticks = self.ticks.unsigned_abs();
        let day = TICKS_PER_DAY as u64;
        let second = TICKS_PER_SECOND as u64;
        let days = ticks / day;
        let rem = ticks % day;
        let hours = rem / (3600 * second);
        let minutes = rem / (60 * second) % 60;
        let seconds = rem / second % 60;
        let fraction = rem % second;
        write!(f, "{}", sign)?;
        if days > 0 {
            write!(f, "{}.", days)?;
        }
        write!(f, "{:02}:{:02}:{:02}", hours, minutes, seconds)?;
        if fraction > 0 {
            write!(f, ".{:07}", fraction)?;
        }
        Ok(())
    }
}

/// A calendar date and time without zone information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct DateTime {
    pub ticks: i64,
}

impl DateTime {
    pub const MIN: DateTime = DateTime { ticks: 0 };

    pub const fn from_ticks(ticks: i64) -> Self {
        Self { ticks }
    }

    /// Current local time.
    pub fn now() -> Self {
        Self::from_naive(Local::now().naive_local())
    }

    /// Current UTC time.
    pub fn utc_now() -> Self {
        Self::from_naive(Utc::now().naive_utc())
    }

    /// Local midnight of the current day.
    pub fn today() -> Self {
        Self::now().date()
    }

    pub fn from_naive(naive: NaiveDateTime) -> Self {
        let utc = naive.and_utc();
        let ticks = UNIX_EPOCH_TICKS
            + utc.timestamp() * TICKS_PER_SECOND
            + i64::from(utc.timestamp_subsec_nanos() / 100);
        Self { ticks }
    }

    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        let since_epoch = self.ticks - UNIX_EPOCH_TICKS;
        let secs = since_epoch.div_euclid(TICKS_PER_SECOND);
        let nanos = (since_epoch.rem_euclid(TICKS_PER_SECOND) * 100) as u32;
        ChronoDateTime::from_timestamp(secs, nanos).map(|dt| dt.naive_utc())
    }

    /// Midnight of the same day.
    pub fn date(&self) -> Self {
        Self {
            ticks: self.ticks - self.ticks.rem_euclid(TICKS_PER_DAY),
        }
    }

    pub fn year(&self) -> Option<i32> {
        self.to_naive().map(|d| d.year())
    }

    pub fn month(&self) -> Option<u32> {
        self.to_naive().map(|d| d.month())
    }

    pub fn day(&self) -> Option<u32> {
        self.to_naive().map(|d| d.day())
    }

    pub fn hour(&self) -> Option<u32> {
        self.to_naive().map(|d| d.hour())
    }

    pub fn minute(&self) -> Option<u32> {
        self.to_naive().map(|d| d.minute())
    }

    pub fn second(&self) -> Option<u32> {
        self.to_naive().map(|d| d.second())
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_naive() {
            Some(naive) => write!(f, "{}", naive.format("%Y-%m-%d %H:%M:%S")),
            None => write!(f, "DateTime({})", self.ticks),
        }
    }
}

/// A date and time with an offset from UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct DateTimeOffset {
    /// Local ticks (the clock time at `offset`).
    pub ticks: i64,
    pub offset: TimeSpan,
}

impl DateTimeOffset {
    pub const fn new(ticks: i64, offset: TimeSpan) -> Self {
        Self { ticks, offset }
    }

    /// Current time with the local offset.
    pub fn now() -> Self {
        let now = Local::now();
        let offset = TimeSpan::from_ticks(
            i64::from(now.offset().local_minus_utc()) * TICKS_PER_SECOND,
        );
        Self {
            ticks: DateTime::from_naive(now.naive_local()).ticks,
            offset,
        }
    }

    /// The local clock time.
    pub fn date_time(&self) -> DateTime {
        DateTime::from_ticks(self.ticks)
    }

    /// The same instant as a UTC clock time.
    pub fn utc_date_time(&self) -> DateTime {
        DateTime::from_ticks(self.ticks - self.offset.ticks)
    }
}

impl fmt::Display for DateTimeOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minutes = self.offset.ticks / (TICKS_PER_SECOND * 60);
        let sign = if minutes < 0 { '-' } else { '+' };
        let minutes = minutes.abs();
        write!(
            f,
            "{} {}{:02}:{:02}",
            self.date_time(),
            sign,
            minutes / 60,
            minutes % 60
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_epoch_round_trip() {
        let epoch = DateTime::from_ticks(UNIX_EPOCH_TICKS);
        assert_eq!(epoch.year(), Some(1970));
        assert_eq!(epoch.month(), Some(1));
        assert_eq!(epoch.day(), Some(1));

        let naive = epoch.to_naive().unwrap();
        assert_eq!(DateTime::from_naive(naive), epoch);
    }

    #[test]
    fn date_truncates_to_midnight() {
        let noon = DateTime::from_ticks(UNIX_EPOCH_TICKS + TICKS_PER_DAY / 2);
        assert_eq!(noon.hour(), Some(12));
        assert_eq!(noon.date(), DateTime::from_ticks(UNIX_EPOCH_TICKS));
    }

    #[test]
    fn time_span_display() {
        assert_eq!(TimeSpan::from_seconds(90.0).to_string(), "00:01:30");
        assert_eq!(
            TimeSpan::from_ticks(TICKS_PER_DAY + TICKS_PER_SECOND).to_string(),
            "1.00:00:01"
        );
        assert_eq!(TimeSpan::from_seconds(-60.0).to_string(), "-00:01:00");
    }

    #[test]
    fn offset_display_and_utc() {
        let offset = TimeSpan::from_seconds(2.0 * 3600.0);
        let value = DateTimeOffset::new(UNIX_EPOCH_TICKS + offset.ticks, offset);
        assert_eq!(value.to_string(), "1970-01-01 02:00:00 +02:00");
        assert_eq!(value.utc_date_time(), DateTime::from_ticks(UNIX_EPOCH_TICKS));
    }
}
