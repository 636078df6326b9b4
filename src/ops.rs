use std::fmt::{Debug, Formatter};

use chrono::{DateTime, Days, NaiveDate, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

use crate::prelude::*;

/// Half-open `[start, end)` span of UTC instants.
#[derive(Copy, Clone, Eq, PartialEq)]
#[must_use]
pub struct Interval {
    /// Inclusive.
    pub start: DateTime<Utc>,

    /// Exclusive.
    pub end: DateTime<Utc>,
}

impl Debug for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}..{:?}", self.start, self.end)
    }
}

impl Interval {
    pub const fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Span covering `n_days` whole civil days in the time zone, starting at the local midnight of `date`.
    pub fn local_days(date: NaiveDate, n_days: u64, time_zone: Tz) -> Result<Self> {
        let end_date = date
            .checked_add_days(Days::new(n_days))
            .with_context(|| format!("`{date}` + {n_days} days is out of range"))?;
        Ok(Self::new(local_midnight(date, time_zone)?, local_midnight(end_date, time_zone)?))
    }

    /// The whole civil day of `date` in the time zone.
    pub fn local_day(date: NaiveDate, time_zone: Tz) -> Result<Self> {
        Self::local_days(date, 1, time_zone)
    }

    #[must_use]
    pub fn duration(self) -> TimeDelta {
        self.end - self.start
    }

    /// Consecutive steps of the given length, the last one may stick out past the end.
    pub fn steps(self, step: TimeDelta) -> impl Iterator<Item = Self> {
        std::iter::successors(Some(self.start), move |start| Some(*start + step))
            .take_while(move |start| *start < self.end)
            .map(move |start| Self::new(start, start + step))
    }
}

/// First instant of the civil day in the time zone.
///
/// Midnight may be skipped by a DST transition, then the earliest existing instant of that day wins.
pub fn local_midnight(date: NaiveDate, time_zone: Tz) -> Result<DateTime<Utc>> {
    let midnight = date.and_hms_opt(0, 0, 0).context("invalid midnight")?;
    (0..=120)
        .step_by(30)
        .find_map(|minutes| {
            time_zone.from_local_datetime(&(midnight + TimeDelta::minutes(minutes))).earliest()
        })
        .map(|instant| instant.with_timezone(&Utc))
        .with_context(|| format!("no local midnight on `{date}` in `{time_zone}`"))
}

#[cfg(test)]
mod tests {
    use chrono_tz::Europe::London;

    use super::*;

    #[test]
    fn test_local_day_winter() -> Result {
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let day = Interval::local_day(date, London)?;
        assert_eq!(day.start, Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap());
        assert_eq!(day.duration(), TimeDelta::hours(24));
        Ok(())
    }

    #[test]
    fn test_local_day_summer() -> Result {
        let date = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        let day = Interval::local_day(date, London)?;
        assert_eq!(day.start, Utc.with_ymd_and_hms(2025, 6, 30, 23, 0, 0).unwrap());
        Ok(())
    }

    #[test]
    fn test_local_day_spring_forward() -> Result {
        let date = NaiveDate::from_ymd_opt(2025, 3, 30).unwrap();
        assert_eq!(Interval::local_day(date, London)?.duration(), TimeDelta::hours(23));
        Ok(())
    }

    #[test]
    fn test_steps() {
        let start = Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap();
        let interval = Interval::new(start, start + TimeDelta::hours(2));
        let steps: Vec<_> = interval.steps(TimeDelta::minutes(30)).collect();
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[3].end, interval.end);
    }
}
