use chrono::{DateTime, TimeDelta, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::{
    core::{policy::timeline_candidates, rate::RateInterval, schedule::RateSchedule},
    ops::Interval,
    prelude::*,
};

/// Half-hourly display slot.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimelineSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,

    /// Major currency units per kilowatt-hour.
    pub value_inc_vat: f64,

    pub is_capped: bool,
}

pub const SLOT: TimeDelta = TimeDelta::minutes(30);

/// Expand the published rate changes into a gapless half-hourly timeline.
///
/// The timeline covers the current local day, and also the next one as soon as any of its rates is published.
#[instrument(skip_all, fields(n_rates = rates.len()))]
pub fn normalize(
    rates: &[RateInterval],
    now: DateTime<Utc>,
    time_zone: Tz,
) -> Result<Vec<TimelineSlot>> {
    let schedule: RateSchedule = timeline_candidates(rates, now).into_iter().collect();
    if schedule.is_empty() {
        return Ok(Vec::new());
    }

    let today = now.with_timezone(&time_zone).date_naive();
    let mut window = Interval::local_day(today, time_zone)?;
    if schedule.starts().any(|start| start >= window.end) {
        window = Interval::local_days(today, 2, time_zone)?;
    }

    let timeline: Vec<_> = window
        .steps(SLOT)
        .filter_map(|slot| {
            schedule.for_period_starting_at(slot.start).map(|price| TimelineSlot {
                start: slot.start,
                end: slot.end,
                value_inc_vat: price.to_pounds(),
                is_capped: false,
            })
        })
        .collect();
    debug!(n_slots = timeline.len(), ?window, duration = %window.duration());
    Ok(timeline)
}
