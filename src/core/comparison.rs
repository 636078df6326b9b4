use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::{
    core::{
        calculator::Calculator,
        plan::{Plan, PlanId, identify_current_plan},
        policy::current_rate,
        reading::{ConsumptionReading, total_consumption},
        resolver::Resolver,
        source::{Account, AccountIdentity, AccountSource, CatalogSource, TelemetrySource},
        timeline::{TimelineSlot, normalize},
    },
    ops::Interval,
    prelude::*,
    quantity::{cost::Pence, energy::KilowattHours, price::PencePerKilowattHour},
};

/// Outcome of a single comparison run.
///
/// Plans which failed to resolve are absent from the maps.
#[derive(Clone, Debug, Serialize)]
pub struct ComparisonResult {
    pub current_plan_name: String,
    pub total_consumption: KilowattHours,
    pub reading_count: usize,
    pub costs: BTreeMap<PlanId, Pence>,
    pub current_flexible_rate: Option<PencePerKilowattHour>,
    pub timelines: BTreeMap<PlanId, Vec<TimelineSlot>>,
}

struct PlanOutcome {
    cost: Pence,
    timeline: Vec<TimelineSlot>,
    current_rate: Option<PencePerKilowattHour>,
}

/// Runs the plan catalog against the day's readings.
pub struct Comparator<'a, S> {
    source: &'a S,
    catalog: &'a [Plan],
    time_zone: Tz,
}

impl<'a, S: CatalogSource> Comparator<'a, S> {
    pub const fn new(source: &'a S, catalog: &'a [Plan], time_zone: Tz) -> Self {
        Self { source, catalog, time_zone }
    }

    /// Compare the plans, a failing plan is logged and left out.
    ///
    /// Returns [`None`] when there are no readings yet.
    #[instrument(skip_all, fields(n_readings = readings.len(), analysis_date = %analysis_date))]
    pub async fn compare(
        &self,
        account: &Account,
        readings: &[ConsumptionReading],
        analysis_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Option<ComparisonResult> {
        if readings.is_empty() {
            return None;
        }

        let mut result = ComparisonResult {
            current_plan_name: identify_current_plan(&account.tariff_code),
            total_consumption: total_consumption(readings),
            reading_count: readings.len(),
            costs: BTreeMap::new(),
            current_flexible_rate: None,
            timelines: BTreeMap::new(),
        };

        for plan in self.catalog {
            match self.compare_plan(plan, account, readings, analysis_date, now).await {
                Ok(outcome) => {
                    info!(plan = %plan.id, cost = %outcome.cost, "calculated");
                    result.costs.insert(plan.id, outcome.cost);
                    result.timelines.insert(plan.id, outcome.timeline);
                    if outcome.current_rate.is_some() {
                        result.current_flexible_rate = outcome.current_rate;
                    }
                }
                Err(error) => {
                    warn!(plan = %plan.id, "failed to analyze the plan: {error:#}");
                }
            }
        }

        Some(result)
    }

    async fn compare_plan(
        &self,
        plan: &Plan,
        account: &Account,
        readings: &[ConsumptionReading],
        analysis_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<PlanOutcome> {
        let resolved = Resolver::new(self.source, self.time_zone)
            .resolve(plan.display_name, &account.region_code, analysis_date)
            .await?;
        ensure!(
            !resolved.rates.is_empty(),
            "no rate data available for `{}` on {analysis_date}",
            resolved.product_code,
        );

        let cost = Calculator::builder()
            .plan(plan)
            .readings(readings)
            .rates(&resolved.rates)
            .standing_charge(resolved.standing_charge)
            .analysis_date(analysis_date)
            .time_zone(self.time_zone)
            .build()
            .calculate()?;
        let timeline = normalize(&resolved.rates, now, self.time_zone)?;
        let current_rate =
            if plan.reports_current_rate { current_rate(&resolved.rates, now) } else { None };

        Ok(PlanOutcome { cost, timeline, current_rate })
    }
}

/// Fetch the account and today's readings, then compare the plans.
///
/// Account and telemetry failures abort the run, plan failures only drop the plan.
#[instrument(skip_all, fields(account_number = %identity.account_number))]
pub async fn fetch_comparison(
    session: &(impl AccountSource + TelemetrySource),
    catalog_source: &impl CatalogSource,
    identity: &AccountIdentity,
    catalog: &[Plan],
    time_zone: Tz,
    now: DateTime<Utc>,
) -> Result<Option<ComparisonResult>> {
    let account = session.get_account(identity).await.context("failed to fetch the account")?;
    info!(tariff_code = %account.tariff_code, region_code = %account.region_code, "fetched the account");

    let analysis_date = now.with_timezone(&time_zone).date_naive();
    let window = Interval::local_day(analysis_date, time_zone)?;
    let readings = session
        .get_readings(&account.device_id, window)
        .await
        .context("failed to fetch the consumption readings")?;
    if readings.is_empty() {
        warn!("no consumption data found");
        return Ok(None);
    }
    info!(n_readings = readings.len(), "fetched the readings");

    Ok(Comparator::new(catalog_source, catalog, time_zone)
        .compare(&account, &readings, analysis_date, now)
        .await)
}
