//! [Octopus Energy](https://developer.octopus.energy/) client.
//!
//! Account and telemetry go through the Kraken GraphQL API and require a token,
//! the product catalog is served by the public REST API.

mod account;
mod graphql;
mod rest;
mod telemetry;

use async_trait::async_trait;
use reqwest::{Client, header::AUTHORIZATION};
use serde::{Serialize, de::DeserializeOwned};

use self::{
    account::{AccountData, AccountVariables},
    graphql::{ObtainKrakenTokenData, ObtainKrakenTokenInput, ObtainKrakenTokenVariables, Request},
    rest::{Page, PeriodQuery, ProductsQuery, UnitRate},
    telemetry::{TelemetryData, TelemetryVariables},
};
use crate::{
    api::client,
    core::{
        catalog::{Product, ProductDetail},
        error::AuthenticationError,
        rate::RateInterval,
        reading::ConsumptionReading,
        source::{Account, AccountIdentity, AccountSource, CatalogSource, TelemetrySource},
    },
    ops::Interval,
    prelude::*,
};

const GRAPHQL_URL: &str = "https://api.octopus.energy/v1/graphql/";
const REST_URL: &str = "https://api.octopus.energy/v1";

/// Upper bound on followed `next` links of a single listing.
const MAX_PAGES: usize = 100;

pub struct Api {
    client: Client,
    api_key: String,
}

/// Authenticated GraphQL session.
pub struct Session<'a> {
    api: &'a Api,
    token: String,
}

impl Api {
    pub fn try_new(api_key: String) -> Result<Self> {
        Ok(Self { client: client::try_new()?, api_key })
    }

    /// Exchange the API key for a Kraken token.
    #[instrument(skip_all)]
    pub async fn login(&self) -> Result<Session<'_>> {
        info!("Obtaining a token…");
        let variables =
            ObtainKrakenTokenVariables { input: ObtainKrakenTokenInput { api_key: &self.api_key } };
        let token = self
            .graphql::<_, ObtainKrakenTokenData>(None, graphql::OBTAIN_KRAKEN_TOKEN, variables)
            .await
            .map_err(|error| AuthenticationError(format!("{error:#}")))?
            .obtain_kraken_token
            .map(|token| token.token)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AuthenticationError("no token in the response".to_string()))?;
        Ok(Session { api: self, token })
    }

    #[instrument(skip_all, level = Level::DEBUG)]
    async fn graphql<V: Serialize + Sync, R: DeserializeOwned>(
        &self,
        token: Option<&str>,
        query: &'static str,
        variables: V,
    ) -> Result<R> {
        let mut request = self.client.post(GRAPHQL_URL).json(&Request { query, variables });
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, token);
        }
        let response = request
            .send()
            .await
            .context("failed to call")?
            .error_for_status()
            .context("request failed")?
            .json::<graphql::Response<R>>()
            .await
            .context("failed to deserialize the response")?;
        Result::from(response)
    }

    #[instrument(skip_all, level = Level::DEBUG, fields(url = url))]
    async fn get<Q: Serialize + ?Sized + Sync, R: DeserializeOwned>(
        &self,
        url: &str,
        query: &Q,
    ) -> Result<R> {
        self.client
            .get(url)
            .basic_auth(&self.api_key, None::<&str>)
            .query(query)
            .send()
            .await
            .context("failed to call")?
            .error_for_status()
            .context("request failed")?
            .json::<R>()
            .await
            .context("failed to deserialize the response")
    }

    /// Collect all pages of a REST listing.
    async fn get_all<Q: Serialize + Sync, T: DeserializeOwned>(
        &self,
        url: &str,
        query: &Q,
    ) -> Result<Vec<T>> {
        let mut page = self.get::<_, Page<T>>(url, query).await?;
        let mut results = page.results;
        for _ in 1..MAX_PAGES {
            let Some(next) = page.next else {
                return Ok(results);
            };
            // The `next` link already carries the query.
            page = self.get::<_, Page<T>>(&next, &()).await?;
            results.append(&mut page.results);
        }
        bail!("too many pages at `{url}`")
    }
}

#[async_trait]
impl CatalogSource for Api {
    #[instrument(skip_all)]
    async fn get_products(&self) -> Result<Vec<Product>> {
        info!("Fetching…");
        let products = self
            .get_all(&format!("{REST_URL}/products/"), &ProductsQuery::default())
            .await
            .context("failed to fetch the products")?;
        info!(n_products = products.len(), "Fetched");
        Ok(products)
    }

    #[instrument(skip_all, fields(url = url))]
    async fn get_product_detail(&self, url: &str) -> Result<ProductDetail> {
        self.get(url, &()).await.context("failed to fetch the product detail")
    }

    #[instrument(skip_all, fields(url = url, window = ?window))]
    async fn get_unit_rates(&self, url: &str, window: Interval) -> Result<Vec<RateInterval>> {
        let rates: Vec<UnitRate> = self
            .get_all(url, &PeriodQuery::from(window))
            .await
            .context("failed to fetch the unit rates")?;
        let rates: Vec<RateInterval> = rates
            .into_iter()
            .filter_map(|rate| {
                rate.try_into_rate().inspect_err(|error| warn!("skipped: {error:#}")).ok()
            })
            .collect();
        debug!(n_rates = rates.len(), "Fetched");
        Ok(rates)
    }
}

#[async_trait]
impl AccountSource for Session<'_> {
    #[instrument(skip_all, fields(account_number = %identity.account_number))]
    async fn get_account(&self, identity: &AccountIdentity) -> Result<Account> {
        info!("Fetching…");
        let variables = AccountVariables { account_number: &identity.account_number };
        let account = self
            .api
            .graphql::<_, AccountData>(Some(&self.token), graphql::ACCOUNT, variables)
            .await
            .context("failed to fetch the account")?
            .into_account(&identity.mpan)?;
        info!(tariff_code = %account.tariff_code, region_code = %account.region_code, "Fetched");
        Ok(account)
    }
}

#[async_trait]
impl TelemetrySource for Session<'_> {
    #[instrument(skip_all, fields(device_id = device_id, window = ?window))]
    async fn get_readings(
        &self,
        device_id: &str,
        window: Interval,
    ) -> Result<Vec<ConsumptionReading>> {
        info!("Fetching…");
        let variables = TelemetryVariables { device_id, start: window.start, end: window.end };
        let readings: Vec<ConsumptionReading> = self
            .api
            .graphql::<_, TelemetryData>(Some(&self.token), graphql::SMART_METER_TELEMETRY, variables)
            .await
            .context("failed to fetch the telemetry")?
            .smart_meter_telemetry
            .unwrap_or_default()
            .into_iter()
            .map(ConsumptionReading::from)
            .collect();
        info!(n_readings = readings.len(), "Fetched");
        Ok(readings)
    }
}
