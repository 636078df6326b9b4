use std::time::Duration;

use clap::Parser;
use reqwest::{Client, Url};

use crate::prelude::*;

/// Optional dead man's switch pinged after every successful comparison.
#[derive(Parser)]
pub struct HeartbeatArgs {
    #[clap(long = "heartbeat-url", env = "HEARTBEAT_URL")]
    pub url: Option<Url>,
}

impl HeartbeatArgs {
    pub async fn send(&self) {
        let Some(url) = &self.url else {
            return;
        };
        if let Err(error) = Self::send_fallible(url.clone()).await {
            warn!("failed to send the heartbeat: {error:#}");
        }
    }

    #[instrument(skip_all, level = Level::DEBUG)]
    async fn send_fallible(url: Url) -> Result {
        debug!("sending a heartbeat…");
        Client::builder()
            .timeout(Duration::from_secs(3))
            .build()?
            .post(url)
            .send()
            .await
            .context("failed to call")?
            .error_for_status()
            .context("request failed")?;
        Ok(())
    }
}
