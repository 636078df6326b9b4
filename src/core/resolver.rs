use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::{
    core::{
        catalog::{Direction, PaymentTariff, Product, ProductDetail, find_link},
        error::ResolutionError,
        rate::RateInterval,
        source::CatalogSource,
    },
    ops::Interval,
    prelude::*,
    quantity::cost::Pence,
};

/// Plan pricing located in the provider catalog.
#[derive(Clone, Debug)]
pub struct ResolvedPlan {
    pub product_code: String,
    pub standing_charge: Pence,

    /// Rates for the analysis day and the day after.
    pub rates: Vec<RateInterval>,
}

pub struct Resolver<'a, S> {
    source: &'a S,
    time_zone: Tz,
}

impl<'a, S: CatalogSource> Resolver<'a, S> {
    pub const fn new(source: &'a S, time_zone: Tz) -> Self {
        Self { source, time_zone }
    }

    #[instrument(skip_all, fields(display_name = display_name, region_code = region_code))]
    pub async fn resolve(
        &self,
        display_name: &str,
        region_code: &str,
        analysis_date: NaiveDate,
    ) -> Result<ResolvedPlan> {
        let products = self.source.get_products().await.context("failed to fetch the products")?;
        let product = find_product(&products, display_name)?;
        debug!(product_code = %product.code, "found the product");

        let detail_url = find_link(&product.links, "self")
            .ok_or_else(|| ResolutionError::SelfLinkMissing(product.code.clone()))?;
        let detail = self
            .source
            .get_product_detail(detail_url)
            .await
            .with_context(|| format!("failed to fetch the product `{}`", product.code))?;
        let tariff = select_payment_tariff(&detail, region_code)?;
        let (standing_charge, unit_rates_url) = extract_pricing(tariff, region_code)?;

        // Tomorrow's prices are included as soon as they are published:
        let window = Interval::local_days(analysis_date, 2, self.time_zone)?;
        let rates = self
            .source
            .get_unit_rates(unit_rates_url, window)
            .await
            .with_context(|| format!("failed to fetch the unit rates of `{}`", product.code))?;
        info!(product_code = %product.code, n_rates = rates.len(), %standing_charge, "resolved");

        Ok(ResolvedPlan { product_code: product.code.clone(), standing_charge, rates })
    }
}

/// Find the import product by its exact display name, or else by a case-insensitive substring.
pub fn find_product<'p>(
    products: &'p [Product],
    display_name: &str,
) -> Result<&'p Product, ResolutionError> {
    let imports = || products.iter().filter(|product| product.direction == Direction::Import);
    let needle = display_name.to_lowercase();
    imports()
        .find(|product| product.display_name == display_name)
        .or_else(|| imports().find(|product| product.display_name.to_lowercase().contains(&needle)))
        .ok_or_else(|| ResolutionError::PlanNotFound(display_name.to_string()))
}

/// Select the regional direct-debit tariff, falling back to the varying one.
pub fn select_payment_tariff<'d>(
    detail: &'d ProductDetail,
    region_code: &str,
) -> Result<&'d PaymentTariff, ResolutionError> {
    let region_key = format!("_{region_code}");
    let region = detail
        .single_register_electricity_tariffs
        .get(&region_key)
        .ok_or_else(|| ResolutionError::RegionNotFound(region_key.clone()))?;
    region
        .direct_debit_monthly
        .as_ref()
        .or(region.varying.as_ref())
        .ok_or(ResolutionError::PaymentMethodNotFound(region_key))
}

/// Extract the tax-inclusive standing charge and the standard unit rates link.
pub fn extract_pricing<'t>(
    tariff: &'t PaymentTariff,
    region_code: &str,
) -> Result<(Pence, &'t str), ResolutionError> {
    let standing_charge = tariff
        .standing_charge_inc_vat
        .ok_or_else(|| ResolutionError::StandingChargeMissing(format!("_{region_code}")))?;
    let unit_rates_url = find_link(&tariff.links, "standard_unit_rates")
        .ok_or_else(|| ResolutionError::UnitRatesLinkMissing(format!("_{region_code}")))?;
    Ok((standing_charge, unit_rates_url))
}
