use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use crate::core::reading::ConsumptionReading;

#[derive(Serialize)]
pub struct TelemetryVariables<'a> {
    #[serde(rename = "deviceId")]
    pub device_id: &'a str,

    pub start: DateTime<Utc>,

    pub end: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct TelemetryData {
    #[serde(rename = "smartMeterTelemetry", default)]
    pub smart_meter_telemetry: Option<Vec<TelemetryRecord>>,
}

#[serde_as]
#[derive(Deserialize)]
pub struct TelemetryRecord {
    #[serde(rename = "readAt")]
    pub read_at: DateTime<Utc>,

    /// Watt-hours consumed within the half-hour, unparsable deltas count as zero.
    #[serde_as(as = "serde_with::DefaultOnError<serde_with::PickFirst<(_, serde_with::DisplayFromStr)>>")]
    #[serde(rename = "consumptionDelta", default)]
    pub consumption_delta: f64,
}

impl From<TelemetryRecord> for ConsumptionReading {
    fn from(record: TelemetryRecord) -> Self {
        Self::from_watt_hours(record.read_at, record.consumption_delta)
    }
}
