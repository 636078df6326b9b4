use std::time::Duration;

use clap::Parser;
use tokio::time::{MissedTickBehavior, interval};

use crate::{
    cli::{compare::OutputArgs, heartbeat::HeartbeatArgs, octopus::OctopusArgs},
    core::{comparison::ComparisonResult, plan::catalog},
    prelude::*,
};

#[derive(Parser)]
pub struct WatchArgs {
    #[clap(flatten)]
    pub octopus: OctopusArgs,

    #[clap(flatten)]
    pub output: OutputArgs,

    #[clap(flatten)]
    pub heartbeat: HeartbeatArgs,

    #[clap(long = "polling-interval-minutes", default_value = "5", env = "POLLING_INTERVAL_MINUTES")]
    pub polling_interval_minutes: u64,
}

impl WatchArgs {
    pub const fn polling_interval(&self) -> Duration {
        Duration::from_secs(self.polling_interval_minutes * 60)
    }

    /// Poll until interrupted, a failed run keeps showing the last known result.
    #[instrument(skip_all, fields(polling_interval_minutes = self.polling_interval_minutes))]
    pub async fn run(self) -> Result {
        ensure!(self.polling_interval_minutes != 0, "the polling interval must be positive");
        let catalog = catalog();
        let mut last_known: Option<ComparisonResult> = None;
        let mut ticker = interval(self.polling_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                result = tokio::signal::ctrl_c() => {
                    result.context("failed to listen for the interrupt")?;
                    info!("interrupted");
                    return Ok(());
                }
            }

            if update_last_known(&mut last_known, self.octopus.compare(&catalog).await) {
                self.heartbeat.send().await;
            }

            if let Some(result) = &last_known {
                self.output.print(&catalog, result, self.octopus.time_zone)?;
            }
        }
    }
}

/// Apply the run outcome, returns whether the run succeeded.
fn update_last_known(
    last_known: &mut Option<ComparisonResult>,
    outcome: Result<Option<ComparisonResult>>,
) -> bool {
    match outcome {
        Ok(Some(result)) => {
            *last_known = Some(result);
            true
        }
        Ok(None) => {
            // Yesterday's figures are not today's:
            warn!("no consumption data yet");
            *last_known = None;
            true
        }
        Err(error) => {
            error!("failed to compare, keeping the last known result: {error:#}");
            false
        }
    }
}
