use chrono::Utc;
use chrono_tz::Tz;
use clap::Parser;

use crate::{
    api::octopus::Api,
    core::{
        comparison::{ComparisonResult, fetch_comparison},
        plan::Plan,
        source::AccountIdentity,
    },
    prelude::*,
};

#[derive(Parser)]
pub struct OctopusArgs {
    #[clap(long = "octopus-api-key", env = "OCTOPUS_API_KEY")]
    pub api_key: String,

    #[clap(long = "octopus-account-number", env = "OCTOPUS_ACCOUNT_NUMBER")]
    pub account_number: String,

    /// Meter point administration number of the import meter.
    #[clap(long = "octopus-mpan", env = "OCTOPUS_MPAN")]
    pub mpan: String,

    /// Time zone of the civil day.
    #[clap(long = "octopus-timezone", env = "OCTOPUS_TIMEZONE", default_value = "Europe/London")]
    pub time_zone: Tz,
}

impl OctopusArgs {
    #[must_use]
    pub fn identity(&self) -> AccountIdentity {
        AccountIdentity { account_number: self.account_number.clone(), mpan: self.mpan.clone() }
    }

    /// Log in and run a single comparison as of now.
    pub async fn compare(&self, catalog: &[Plan]) -> Result<Option<ComparisonResult>> {
        let api = Api::try_new(self.api_key.clone())?;
        let session = api.login().await?;
        fetch_comparison(&session, &api, &self.identity(), catalog, self.time_zone, Utc::now())
            .await
    }
}
