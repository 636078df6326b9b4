use chrono_tz::Tz;
use clap::Parser;

use crate::{
    cli::{heartbeat::HeartbeatArgs, octopus::OctopusArgs},
    core::{
        comparison::ComparisonResult,
        plan::{Plan, catalog},
    },
    prelude::*,
    tables::{build_comparison_table, build_summary_table, build_timeline_table},
};

#[derive(Parser)]
pub struct CompareArgs {
    #[clap(flatten)]
    pub octopus: OctopusArgs,

    #[clap(flatten)]
    pub output: OutputArgs,

    #[clap(flatten)]
    pub heartbeat: HeartbeatArgs,
}

#[derive(Copy, Clone, Parser)]
pub struct OutputArgs {
    /// Print the result as JSON instead of tables.
    #[clap(long)]
    pub json: bool,

    /// Also print the per-plan half-hourly rate timelines.
    #[clap(long)]
    pub timelines: bool,
}

impl OutputArgs {
    pub fn print(self, catalog: &[Plan], result: &ComparisonResult, time_zone: Tz) -> Result {
        if self.json {
            println!("{}", serde_json::to_string_pretty(result)?);
            return Ok(());
        }
        println!("{}", build_summary_table(result));
        println!("{}", build_comparison_table(catalog, result));
        if self.timelines {
            for plan in catalog {
                if let Some(timeline) = result.timelines.get(&plan.id) {
                    println!("{}", plan.display_name);
                    println!("{}", build_timeline_table(timeline, time_zone));
                }
            }
        }
        Ok(())
    }
}

impl CompareArgs {
    #[instrument(skip_all)]
    pub async fn run(self) -> Result {
        let catalog = catalog();
        match self.octopus.compare(&catalog).await? {
            Some(result) => self.output.print(&catalog, &result, self.octopus.time_zone)?,
            None => warn!("no consumption data yet, try again later"),
        }
        self.heartbeat.send().await;
        Ok(())
    }
}
