use chrono::{DateTime, Utc};

use crate::{ops::Interval, quantity::price::PencePerKilowattHour};

/// Payment method qualifier of a published rate.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum PaymentMethod {
    DirectDebit,
    NonDirectDebit,
    Other(String),

    #[default]
    Unspecified,
}

impl From<Option<String>> for PaymentMethod {
    fn from(payment_method: Option<String>) -> Self {
        let Some(payment_method) = payment_method else {
            return Self::Unspecified;
        };
        match payment_method.as_str() {
            "DIRECT_DEBIT" => Self::DirectDebit,
            "NON_DIRECT_DEBIT" => Self::NonDirectDebit,
            _ => Self::Other(payment_method),
        }
    }
}

/// Published unit price holding over `[valid_from, valid_to)`.
#[derive(Clone, Debug, PartialEq, bon::Builder)]
pub struct RateInterval {
    pub valid_from: DateTime<Utc>,

    /// Open-ended when absent.
    pub valid_to: Option<DateTime<Utc>>,

    pub value_inc_vat: PencePerKilowattHour,

    #[builder(default)]
    pub payment_method: PaymentMethod,
}

impl RateInterval {
    #[must_use]
    pub fn is_direct_debit(&self) -> bool {
        self.payment_method == PaymentMethod::DirectDebit
    }

    /// Not yet ended at the instant.
    #[must_use]
    pub fn is_unexpired_at(&self, now: DateTime<Utc>) -> bool {
        self.valid_to.is_none_or(|valid_to| valid_to > now)
    }

    #[must_use]
    pub fn has_started_by(&self, now: DateTime<Utc>) -> bool {
        self.valid_from <= now
    }

    /// Started and not yet ended at the instant.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.has_started_by(now) && self.is_unexpired_at(now)
    }

    /// Active at any point of the interval.
    #[must_use]
    pub fn overlaps(&self, interval: Interval) -> bool {
        self.valid_from < interval.end && self.is_unexpired_at(interval.start)
    }
}
