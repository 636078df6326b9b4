use chrono::{DateTime, NaiveTime, Utc};
use chrono_tz::Tz;

use crate::core::plan::{Tier, TimeBand};

/// Check whether the local time falls into `[start, end)`, wrapping past midnight when `start >= end`.
#[must_use]
pub fn is_within(time: NaiveTime, start: NaiveTime, end: NaiveTime) -> bool {
    if start < end { (start <= time) && (time < end) } else { (time >= start) || (time < end) }
}

/// Resolve the local time to its tier.
///
/// Peak bands are checked first, then the rest in their catalog order.
/// Anything not covered by a band is [`Tier::Day`].
#[must_use]
pub fn classify(time: NaiveTime, bands: &[TimeBand]) -> Tier {
    let (peak, rest): (Vec<&TimeBand>, Vec<&TimeBand>) =
        bands.iter().partition(|band| band.tier == Tier::Peak);
    peak.into_iter()
        .chain(rest)
        .find(|band| is_within(time, band.start, band.end))
        .map_or(Tier::Day, |band| band.tier)
}

/// Resolve the instant to its tier according to the local clock.
#[must_use]
pub fn classify_at(instant: DateTime<Utc>, time_zone: Tz, bands: &[TimeBand]) -> Tier {
    classify(instant.with_timezone(&time_zone).time(), bands)
}
