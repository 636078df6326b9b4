//! Capabilities the engine consumes from the provider.

use async_trait::async_trait;

use crate::{
    core::{
        catalog::{Product, ProductDetail},
        rate::RateInterval,
        reading::ConsumptionReading,
    },
    ops::Interval,
    prelude::*,
    quantity::cost::Pence,
};

/// Configured account and metering point.
#[derive(Clone, Debug)]
pub struct AccountIdentity {
    pub account_number: String,

    /// Meter point administration number of the import meter.
    pub mpan: String,
}

/// Active import metering point of the account.
#[derive(Clone, Debug, PartialEq)]
pub struct Account {
    pub tariff_code: String,
    pub standing_charge: Option<Pence>,
    pub region_code: String,
    pub device_id: String,
}

#[async_trait]
pub trait AccountSource: Sync {
    async fn get_account(&self, identity: &AccountIdentity) -> Result<Account>;
}

#[async_trait]
pub trait TelemetrySource: Sync {
    /// Half-hourly readings within the window.
    async fn get_readings(
        &self,
        device_id: &str,
        window: Interval,
    ) -> Result<Vec<ConsumptionReading>>;
}

#[async_trait]
pub trait CatalogSource: Sync {
    /// Import and export products available to households.
    async fn get_products(&self) -> Result<Vec<Product>>;

    async fn get_product_detail(&self, url: &str) -> Result<ProductDetail>;

    /// Rates published within the window.
    async fn get_unit_rates(&self, url: &str, window: Interval) -> Result<Vec<RateInterval>>;
}
