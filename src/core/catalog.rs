//! Product catalog as published by the provider.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::quantity::cost::Pence;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Import,
    Export,

    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Link {
    pub href: String,

    #[serde(default)]
    pub rel: String,
}

/// Find the first link with the relation, ignoring case.
#[must_use]
pub fn find_link<'a>(links: &'a [Link], rel: &str) -> Option<&'a str> {
    links.iter().find(|link| link.rel.eq_ignore_ascii_case(rel)).map(|link| link.href.as_str())
}

#[derive(Clone, Debug, Deserialize)]
pub struct Product {
    pub code: String,

    pub direction: Direction,

    pub display_name: String,

    #[serde(default)]
    pub links: Vec<Link>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProductDetail {
    /// Keyed by the region code prefixed with an underscore.
    #[serde(default)]
    pub single_register_electricity_tariffs: BTreeMap<String, RegionTariffs>,
}

/// Regional tariff variants per payment method.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RegionTariffs {
    pub direct_debit_monthly: Option<PaymentTariff>,
    pub varying: Option<PaymentTariff>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct PaymentTariff {
    pub code: Option<String>,

    pub standing_charge_inc_vat: Option<Pence>,

    #[serde(default)]
    pub links: Vec<Link>,
}
