use serde::{Deserialize, Serialize};

use crate::{
    core::{error::AccountError, source::Account},
    quantity::cost::Pence,
};

#[derive(Serialize)]
pub struct AccountVariables<'a> {
    #[serde(rename = "accountNumber")]
    pub account_number: &'a str,
}

#[derive(Deserialize)]
pub struct AccountData {
    /// Absent when the account is not accessible with the token.
    pub account: Option<AccountNode>,
}

#[derive(Deserialize)]
pub struct AccountNode {
    #[serde(rename = "electricityAgreements", default)]
    pub electricity_agreements: Vec<Agreement>,
}

#[derive(Deserialize)]
pub struct Agreement {
    #[serde(rename = "meterPoint")]
    pub meter_point: Option<MeterPoint>,

    pub tariff: Option<Tariff>,
}

#[derive(Deserialize)]
pub struct MeterPoint {
    pub mpan: Option<String>,

    pub direction: Option<String>,

    #[serde(default)]
    pub meters: Vec<Meter>,
}

#[derive(Deserialize)]
pub struct Meter {
    #[serde(rename = "smartDevices", default)]
    pub smart_devices: Vec<SmartDevice>,
}

#[derive(Deserialize)]
pub struct SmartDevice {
    #[serde(rename = "deviceId")]
    pub device_id: Option<String>,
}

#[derive(Deserialize)]
pub struct Tariff {
    #[serde(rename = "tariffCode")]
    pub tariff_code: Option<String>,

    #[serde(rename = "standingCharge")]
    pub standing_charge: Option<Pence>,
}

impl AccountData {
    /// Pick the active import agreement of the metering point.
    pub fn into_account(self, mpan: &str) -> Result<Account, AccountError> {
        let (meter_point, tariff) = self
            .account
            .ok_or(AccountError::AccountNotFound)?
            .electricity_agreements
            .into_iter()
            .find_map(|agreement| {
                let meter_point = agreement.meter_point?;
                (meter_point.direction.as_deref() == Some("IMPORT")
                    && meter_point.mpan.as_deref() == Some(mpan))
                .then_some((meter_point, agreement.tariff))
            })
            .ok_or(AccountError::NoMatchingMeterPoint)?;

        let tariff = tariff.ok_or(AccountError::NoTariffInfo)?;
        let tariff_code =
            tariff.tariff_code.filter(|code| !code.is_empty()).ok_or(AccountError::NoTariffInfo)?;

        let device_id = meter_point
            .meters
            .into_iter()
            .flat_map(|meter| meter.smart_devices)
            .find_map(|device| device.device_id)
            .ok_or(AccountError::NoDeviceId)?;

        // The region is encoded as the last letter of the tariff code:
        let region_code = tariff_code.chars().last().map(String::from).unwrap_or_default();

        Ok(Account { tariff_code, standing_charge: tariff.standing_charge, region_code, device_id })
    }
}
