use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    core::rate::RateInterval,
    ops::Interval,
    prelude::*,
    quantity::price::PencePerKilowattHour,
};

/// Paginated REST listing.
#[derive(Deserialize)]
pub struct Page<T> {
    /// Absolute URL of the next page, if any.
    #[serde(default)]
    pub next: Option<String>,

    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

#[derive(Serialize)]
pub struct ProductsQuery {
    pub brand: &'static str,
    pub is_business: bool,
}

impl Default for ProductsQuery {
    fn default() -> Self {
        Self { brand: "OCTOPUS_ENERGY", is_business: false }
    }
}

#[derive(Serialize)]
pub struct PeriodQuery {
    pub period_from: String,
    pub period_to: String,
}

impl From<Interval> for PeriodQuery {
    fn from(interval: Interval) -> Self {
        Self {
            period_from: interval.start.to_rfc3339_opts(SecondsFormat::Secs, true),
            period_to: interval.end.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

#[derive(Deserialize)]
pub struct UnitRate {
    pub value_inc_vat: PencePerKilowattHour,
    pub valid_from: DateTime<Utc>,
    pub valid_to: Option<DateTime<Utc>>,

    #[serde(default)]
    pub payment_method: Option<String>,
}

impl UnitRate {
    /// Convert into the engine's rate, rejecting empty or inverted validity.
    pub fn try_into_rate(self) -> Result<RateInterval> {
        if let Some(valid_to) = self.valid_to {
            ensure!(
                self.valid_from < valid_to,
                "rate validity is empty: {} to {valid_to}",
                self.valid_from,
            );
        }
        Ok(RateInterval::builder()
            .valid_from(self.valid_from)
            .maybe_valid_to(self.valid_to)
            .value_inc_vat(self.value_inc_vat)
            .payment_method(self.payment_method.into())
            .build())
    }
}
