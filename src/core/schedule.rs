use std::collections::{BTreeMap, btree_map::Entry};

use chrono::{DateTime, Utc};

use crate::{core::rate::RateInterval, quantity::price::PencePerKilowattHour};

/// Rate change points in ascending order of their start instants.
#[derive(Clone, Debug, Default, PartialEq)]
#[must_use]
pub struct RateSchedule(Vec<(DateTime<Utc>, PencePerKilowattHour)>);

impl<'a> FromIterator<&'a RateInterval> for RateSchedule {
    /// Build the schedule, the direct-debit rate wins when several rates share a start.
    fn from_iter<T: IntoIterator<Item = &'a RateInterval>>(intervals: T) -> Self {
        let mut starts = BTreeMap::new();
        for interval in intervals {
            match starts.entry(interval.valid_from) {
                Entry::Vacant(entry) => {
                    entry.insert(interval.value_inc_vat);
                }
                Entry::Occupied(mut entry) if interval.is_direct_debit() => {
                    *entry.get_mut() = interval.value_inc_vat;
                }
                Entry::Occupied(_) => {}
            }
        }
        Self(starts.into_iter().collect())
    }
}

impl RateSchedule {
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn starts(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        self.0.iter().map(|(start, _)| *start)
    }

    #[must_use]
    pub fn earliest(&self) -> Option<PencePerKilowattHour> {
        self.0.first().map(|(_, price)| *price)
    }

    /// Price of the latest rate started strictly before the instant.
    #[must_use]
    pub fn latest_before(&self, instant: DateTime<Utc>) -> Option<PencePerKilowattHour> {
        self.price_preceding(self.0.partition_point(|(start, _)| *start < instant))
    }

    /// Price of the latest rate started at or before the instant.
    #[must_use]
    pub fn latest_at_or_before(&self, instant: DateTime<Utc>) -> Option<PencePerKilowattHour> {
        self.price_preceding(self.0.partition_point(|(start, _)| *start <= instant))
    }

    /// Price applicable to a reading which ends at the instant.
    ///
    /// Falls back to the earliest rate when nothing precedes the reading.
    #[must_use]
    pub fn for_reading_ending_at(&self, read_end: DateTime<Utc>) -> Option<PencePerKilowattHour> {
        self.latest_before(read_end).or_else(|| self.earliest())
    }

    /// Price applicable to a period which starts at the instant.
    ///
    /// Falls back to the earliest rate when nothing precedes the period.
    #[must_use]
    pub fn for_period_starting_at(&self, start: DateTime<Utc>) -> Option<PencePerKilowattHour> {
        self.latest_at_or_before(start).or_else(|| self.earliest())
    }

    fn price_preceding(&self, index: usize) -> Option<PencePerKilowattHour> {
        index.checked_sub(1).map(|index| self.0[index].1)
    }
}
