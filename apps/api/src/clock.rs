// Clock / civil calendar adapter.
//
// "Today" is always computed in a fixed civil offset (UTC+8 by default),
// never from the host's local timezone. The wall clock is injected through
// the `Clock` trait so handlers and tests can pin "now".

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant.
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

#[cfg(test)]
impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

/// Fixed-offset civil calendar. No DST rules apply at a fixed offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CivilCalendar {
    offset: FixedOffset,
}

impl CivilCalendar {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Wall-clock reading at `instant` in this calendar.
    pub fn local(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.with_timezone(&self.offset).naive_local()
    }

    /// Civil date of `instant`: instant + offset, truncated to the day.
    pub fn date_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        self.local(instant).date()
    }

    pub fn today(&self, clock: &dyn Clock) -> NaiveDate {
        self.date_of(clock.now())
    }

    /// The UTC instant of civil midnight starting `date`.
    pub fn start_of_day(&self, date: NaiveDate) -> Option<DateTime<Utc>> {
        let midnight = date.and_hms_opt(0, 0, 0)?;
        self.offset
            .from_local_datetime(&midnight)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Whole days from `b` to `a` (`a - b`), midnight to midnight.
///
/// Both sides are civil dates, so the difference is already integral and the
/// ceiling convention (partial days count as a full day) is exact here.
pub fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    a.signed_duration_since(b).num_days()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;

    use super::*;

    fn utc8() -> CivilCalendar {
        CivilCalendar::new(FixedOffset::east_opt(8 * 3600).unwrap())
    }

    fn instant(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_today_rolls_over_at_utc_16() {
        let cal = utc8();
        let before = FixedClock::new(instant("2024-06-09T15:59:59Z"));
        let after = FixedClock::new(instant("2024-06-09T16:00:00Z"));
        assert_eq!(cal.today(&before), date(2024, 6, 9));
        assert_eq!(cal.today(&after), date(2024, 6, 10));
    }

    #[test]
    fn test_today_crosses_year_boundary() {
        let clock = FixedClock::new(instant("2023-12-31T20:30:00Z"));
        assert_eq!(utc8().today(&clock), date(2024, 1, 1));
    }

    #[test]
    fn test_local_time_is_shifted() {
        let local = utc8().local(instant("2024-06-10T01:15:30Z"));
        assert_eq!(local.time(), NaiveTime::from_hms_opt(9, 15, 30).unwrap());
    }

    #[test]
    fn test_start_of_day_maps_back_to_same_date() {
        let cal = utc8();
        let start = cal.start_of_day(date(2024, 6, 10)).unwrap();
        assert_eq!(start, instant("2024-06-09T16:00:00Z"));
        assert_eq!(cal.date_of(start), date(2024, 6, 10));
    }

    #[test]
    fn test_days_between_signs() {
        let today = date(2024, 6, 10);
        assert_eq!(days_between(date(2024, 6, 17), today), 7);
        assert_eq!(days_between(date(2024, 6, 8), today), -2);
        assert_eq!(days_between(today, today), 0);
    }

    #[test]
    fn test_days_between_spans_leap_day() {
        assert_eq!(days_between(date(2024, 3, 1), date(2024, 2, 28)), 2);
        assert_eq!(days_between(date(2023, 3, 1), date(2023, 2, 28)), 1);
    }
}
