use chrono::{DateTime, TimeDelta, Utc};

use crate::quantity::energy::KilowattHours;

/// Half-hourly smart meter reading.
#[derive(Copy, Clone, Debug, PartialEq, Eq, derive_more::Constructor, serde::Serialize)]
pub struct ConsumptionReading {
    /// End of the measurement interval.
    pub read_end: DateTime<Utc>,

    pub delta: KilowattHours,
}

impl ConsumptionReading {
    /// Length of the measurement interval.
    pub const PERIOD: TimeDelta = TimeDelta::minutes(30);

    #[must_use]
    pub fn from_watt_hours(read_end: DateTime<Utc>, watt_hours: f64) -> Self {
        Self::new(read_end, KilowattHours::from_watt_hours(watt_hours))
    }

    /// Start of the measurement interval.
    #[must_use]
    pub fn read_start(&self) -> DateTime<Utc> {
        self.read_end - Self::PERIOD
    }
}

/// Total consumption rounded to watt-hours.
pub fn total_consumption(readings: &[ConsumptionReading]) -> KilowattHours {
    readings.iter().map(|reading| reading.delta).sum::<KilowattHours>().round_to(3)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_total_consumption() {
        let at = Utc.with_ymd_and_hms(2025, 1, 15, 0, 30, 0).unwrap();
        let readings = [
            ConsumptionReading::from_watt_hours(at, 123.4),
            ConsumptionReading::from_watt_hours(at, 0.0),
            ConsumptionReading::from_watt_hours(at, 876.65),
        ];
        assert_abs_diff_eq!(total_consumption(&readings).get(), 1.0);
    }
}
