use std::time::Duration;

use reqwest::Client;

use crate::prelude::*;

/// Build a default client, every request is bounded by the timeout.
pub fn try_new() -> Result<Client> {
    Ok(Client::builder()
        .user_agent(concat!("octopus-compare/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(30))
        .build()?)
}
