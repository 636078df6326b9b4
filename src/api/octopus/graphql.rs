use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::prelude::*;

pub const OBTAIN_KRAKEN_TOKEN: &str = "mutation ObtainKrakenToken($input: ObtainJSONWebTokenInput!) { obtainKrakenToken(input: $input) { token } }";

pub const ACCOUNT: &str = "query Account($accountNumber: String!) { account(accountNumber: $accountNumber) { electricityAgreements(active: true) { validFrom validTo meterPoint { meters(includeInactive: false) { smartDevices { deviceId } } mpan direction } tariff { ... on HalfHourlyTariff { id productCode tariffCode standingCharge } ... on StandardTariff { id productCode tariffCode standingCharge } } } } }";

pub const SMART_METER_TELEMETRY: &str = "query SmartMeterTelemetry($deviceId: String!, $start: DateTime!, $end: DateTime!) { smartMeterTelemetry(deviceId: $deviceId, grouping: HALF_HOURLY, start: $start, end: $end) { readAt consumptionDelta costDeltaWithTax } }";

#[derive(Serialize)]
pub struct Request<V> {
    pub query: &'static str,
    pub variables: V,
}

/// Generic GraphQL response.
#[derive(Deserialize)]
pub struct Response<D> {
    data: Option<D>,

    #[serde(default)]
    errors: Vec<ResponseError>,
}

#[derive(Deserialize)]
struct ResponseError {
    message: String,

    #[serde(default)]
    extensions: Option<ErrorExtensions>,
}

#[derive(Deserialize)]
struct ErrorExtensions {
    #[serde(rename = "errorCode")]
    error_code: Option<String>,
}

impl<D> From<Response<D>> for Result<D> {
    fn from(response: Response<D>) -> Self {
        if !response.errors.is_empty() {
            let messages = response
                .errors
                .into_iter()
                .map(|error| match error.extensions.and_then(|extensions| extensions.error_code) {
                    Some(error_code) => format!("{} ({error_code})", error.message),
                    None => error.message,
                })
                .join("; ");
            bail!("GraphQL errors: {messages}");
        }
        response.data.context("GraphQL response contains no data")
    }
}

#[derive(Serialize)]
pub struct ObtainKrakenTokenVariables<'a> {
    pub input: ObtainKrakenTokenInput<'a>,
}

#[derive(Serialize)]
pub struct ObtainKrakenTokenInput<'a> {
    #[serde(rename = "APIKey")]
    pub api_key: &'a str,
}

#[derive(Deserialize)]
pub struct ObtainKrakenTokenData {
    /// Absent when the mutation failed, the reason is in the response errors.
    #[serde(rename = "obtainKrakenToken")]
    pub obtain_kraken_token: Option<KrakenToken>,
}

#[derive(Deserialize)]
pub struct KrakenToken {
    pub token: String,
}
