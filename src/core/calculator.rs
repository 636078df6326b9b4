use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::{
    core::{
        classifier::classify_at,
        plan::{Plan, PlanKind, Tier, TimeBand},
        policy::{active_during, prefer_direct_debit},
        rate::RateInterval,
        reading::ConsumptionReading,
        schedule::RateSchedule,
    },
    ops::Interval,
    prelude::*,
    quantity::{cost::Pence, price::PencePerKilowattHour},
};

/// Same-day cost of the readings under a plan.
#[derive(bon::Builder)]
pub struct Calculator<'a> {
    plan: &'a Plan,
    readings: &'a [ConsumptionReading],
    rates: &'a [RateInterval],
    standing_charge: Pence,
    analysis_date: NaiveDate,
    time_zone: Tz,
}

impl Calculator<'_> {
    /// Total cost in pence: the consumption priced at the applicable unit rates plus the standing charge.
    #[instrument(skip_all, fields(plan = %self.plan.id))]
    pub fn calculate(&self) -> Result<Pence> {
        let energy_cost = match &self.plan.kind {
            PlanKind::TimeOfDayBanded { bands } => match self.tier_prices(bands) {
                Some(tier_prices) => self.banded_cost(bands, &tier_prices),
                None => self.timestamped_cost()?,
            },
            PlanKind::Timestamped => self.timestamped_cost()?,
        };
        debug!(?energy_cost, standing_charge = ?self.standing_charge);
        Ok(energy_cost + self.standing_charge)
    }

    /// Assign the distinct published prices to the plan tiers by their rank.
    ///
    /// The cheapest price goes to the cheapest tier, and so on.
    /// Returns [`None`] when the price count does not match the tier count.
    fn tier_prices(&self, bands: &[TimeBand]) -> Option<BTreeMap<Tier, PencePerKilowattHour>> {
        let tiers: BTreeSet<Tier> =
            bands.iter().map(|band| band.tier).chain([Tier::Day]).collect();
        let prices: BTreeSet<PencePerKilowattHour> =
            prefer_direct_debit(self.rates).into_iter().map(|rate| rate.value_inc_vat).collect();
        if prices.len() == tiers.len() {
            Some(tiers.into_iter().zip(prices).collect())
        } else {
            warn!(
                n_tiers = tiers.len(),
                n_prices = prices.len(),
                "unexpected number of distinct prices, falling back to the timestamped rates",
            );
            None
        }
    }

    fn banded_cost(
        &self,
        bands: &[TimeBand],
        tier_prices: &BTreeMap<Tier, PencePerKilowattHour>,
    ) -> Pence {
        self.consuming_readings()
            .filter_map(|reading| {
                // The band which the consumption happened in:
                let tier = classify_at(reading.read_start(), self.time_zone, bands);
                let price = tier_prices.get(&tier).copied();
                trace!(read_start = %reading.read_start(), %tier, ?price);
                price.map(|price| reading.delta * price)
            })
            .sum()
    }

    fn timestamped_cost(&self) -> Result<Pence> {
        let day = Interval::local_day(self.analysis_date, self.time_zone)?;
        let schedule: RateSchedule =
            prefer_direct_debit(active_during(self.rates, day)).into_iter().collect();
        if schedule.is_empty() {
            warn!("no applicable rates, the consumption is not priced");
        }
        Ok(self
            .consuming_readings()
            .filter_map(|reading| {
                schedule.for_reading_ending_at(reading.read_end).map(|price| reading.delta * price)
            })
            .sum())
    }

    /// Readings with non-zero consumption, the others never need a rate.
    fn consuming_readings(&self) -> impl Iterator<Item = &ConsumptionReading> {
        self.readings.iter().filter(|reading| !reading.delta.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};
    use chrono_tz::Europe::London;

    use super::*;
    use crate::core::{
        plan::{PlanId, catalog},
        rate::PaymentMethod,
    };

    fn plan(id: PlanId) -> Plan {
        catalog().into_iter().find(|plan| plan.id == id).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    fn midnight() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap()
    }

    fn rate(
        from: DateTime<Utc>,
        to: Option<DateTime<Utc>>,
        price: f64,
        payment_method: PaymentMethod,
    ) -> RateInterval {
        RateInterval::builder()
            .valid_from(from)
            .maybe_valid_to(to)
            .value_inc_vat(price.into())
            .payment_method(payment_method)
            .build()
    }

    fn calculate(
        plan: &Plan,
        readings: &[ConsumptionReading],
        rates: &[RateInterval],
        standing_charge: f64,
    ) -> Result<Pence> {
        Calculator::builder()
            .plan(plan)
            .readings(readings)
            .rates(rates)
            .standing_charge(standing_charge.into())
            .analysis_date(date())
            .time_zone(London)
            .build()
            .calculate()
    }

    #[test]
    fn test_single_reading_flat_rate() -> Result {
        let readings =
            [ConsumptionReading::from_watt_hours(midnight() + TimeDelta::minutes(30), 500.0)];
        let rates = [rate(midnight(), None, 20.0, PaymentMethod::DirectDebit)];
        let cost = calculate(&plan(PlanId::FlexibleOctopus), &readings, &rates, 45.0)?;
        assert_abs_diff_eq!(cost.get(), 55.0);
        Ok(())
    }

    #[test]
    fn test_flat_rate_full_day() -> Result {
        let readings = (1..=48)
            .map(|index| {
                ConsumptionReading::from_watt_hours(midnight() + TimeDelta::minutes(30 * index), 250.0)
            })
            .collect::<Vec<_>>();
        let rates = [rate(
            midnight() - TimeDelta::days(10),
            Some(midnight() + TimeDelta::days(10)),
            24.5,
            PaymentMethod::DirectDebit,
        )];
        let cost = calculate(&plan(PlanId::FlexibleOctopus), &readings, &rates, 46.36)?;
        assert_abs_diff_eq!(cost.get(), 48.0 * 0.25 * 24.5 + 46.36, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn test_reading_end_uses_strictly_preceding_rate() -> Result {
        let change = midnight() + TimeDelta::minutes(30);
        let readings = [ConsumptionReading::from_watt_hours(change, 1000.0)];
        let rates = [
            rate(midnight(), Some(change), 10.0, PaymentMethod::DirectDebit),
            rate(change, None, 30.0, PaymentMethod::DirectDebit),
        ];
        let cost = calculate(&plan(PlanId::AgileOctopus), &readings, &rates, 0.0)?;
        assert_abs_diff_eq!(cost.get(), 10.0);
        Ok(())
    }

    #[test]
    fn test_reading_at_day_start_falls_back_to_earliest_rate() -> Result {
        let readings = [ConsumptionReading::from_watt_hours(midnight(), 1000.0)];
        let rates = [
            rate(midnight() + TimeDelta::minutes(30), None, 30.0, PaymentMethod::DirectDebit),
            rate(midnight(), Some(midnight() + TimeDelta::minutes(30)), 10.0, PaymentMethod::DirectDebit),
        ];
        let cost = calculate(&plan(PlanId::AgileOctopus), &readings, &rates, 0.0)?;
        assert_abs_diff_eq!(cost.get(), 10.0);
        Ok(())
    }

    #[test]
    fn test_timestamped_prefers_direct_debit() -> Result {
        let readings =
            [ConsumptionReading::from_watt_hours(midnight() + TimeDelta::hours(1), 1000.0)];
        let rates = [
            rate(midnight(), None, 99.0, PaymentMethod::NonDirectDebit),
            rate(midnight() - TimeDelta::hours(1), None, 20.0, PaymentMethod::DirectDebit),
        ];
        let cost = calculate(&plan(PlanId::FlexibleOctopus), &readings, &rates, 0.0)?;
        assert_abs_diff_eq!(cost.get(), 20.0);
        Ok(())
    }

    #[test]
    fn test_timestamped_ignores_rates_outside_of_the_day() -> Result {
        let readings = [ConsumptionReading::from_watt_hours(midnight() + TimeDelta::hours(1), 1000.0)];
        let rates = [
            rate(midnight() - TimeDelta::days(1), Some(midnight()), 99.0, PaymentMethod::DirectDebit),
            rate(midnight(), Some(midnight() + TimeDelta::days(1)), 20.0, PaymentMethod::DirectDebit),
            rate(midnight() + TimeDelta::days(1), None, 77.0, PaymentMethod::DirectDebit),
        ];
        let cost = calculate(&plan(PlanId::AgileOctopus), &readings, &rates, 0.0)?;
        assert_abs_diff_eq!(cost.get(), 20.0);
        Ok(())
    }

    #[test]
    fn test_zero_consumption_never_needs_a_rate() -> Result {
        let readings = [
            ConsumptionReading::from_watt_hours(midnight() + TimeDelta::minutes(30), 0.0),
            ConsumptionReading::from_watt_hours(midnight() + TimeDelta::minutes(60), 0.0),
        ];
        for plan in catalog() {
            let cost = calculate(&plan, &readings, &[], 45.0)?;
            assert_abs_diff_eq!(cost.get(), 45.0);
        }
        Ok(())
    }

    #[test]
    fn test_no_rates_prices_nothing() -> Result {
        let readings = [ConsumptionReading::from_watt_hours(midnight() + TimeDelta::minutes(30), 500.0)];
        let cost = calculate(&plan(PlanId::AgileOctopus), &readings, &[], 45.0)?;
        assert_abs_diff_eq!(cost.get(), 45.0);
        Ok(())
    }

    fn go_rates(first: f64, second: f64) -> Vec<RateInterval> {
        // The order is deliberately unrelated to the tiers:
        vec![
            rate(midnight() + TimeDelta::minutes(30), Some(midnight() + TimeDelta::minutes(330)), first, PaymentMethod::DirectDebit),
            rate(midnight() + TimeDelta::minutes(330), Some(midnight() + TimeDelta::days(1)), second, PaymentMethod::DirectDebit),
            rate(midnight(), Some(midnight() + TimeDelta::minutes(30)), second, PaymentMethod::DirectDebit),
        ]
    }

    #[test]
    fn test_go_night_and_day() -> Result {
        let go = plan(PlanId::OctopusGo);
        let night = [ConsumptionReading::from_watt_hours(midnight() + TimeDelta::hours(3), 1000.0)];
        let day = [ConsumptionReading::from_watt_hours(midnight() + TimeDelta::hours(12), 1000.0)];
        for rates in [go_rates(7.5, 30.0), go_rates(30.0, 7.5)] {
            assert_abs_diff_eq!(calculate(&go, &night, &rates, 0.0)?.get(), 7.5);
            assert_abs_diff_eq!(calculate(&go, &day, &rates, 0.0)?.get(), 30.0);
        }
        Ok(())
    }

    #[test]
    fn test_go_band_edges_agree_with_timestamped_rates() -> Result {
        let rates = go_rates(7.5, 30.0);
        let cost = |plan: &Plan, minutes| {
            let reading = ConsumptionReading::from_watt_hours(
                midnight() + TimeDelta::minutes(minutes),
                1000.0,
            );
            calculate(plan, &[reading], &rates, 0.0).map(|cost| cost.get())
        };
        let go = plan(PlanId::OctopusGo);
        let agile = plan(PlanId::AgileOctopus);

        // 00:00-00:30 is still the day rate:
        assert_abs_diff_eq!(cost(&go, 30)?, 30.0);
        assert_abs_diff_eq!(cost(&agile, 30)?, 30.0);

        // 05:00-05:30 is still the night rate:
        assert_abs_diff_eq!(cost(&go, 330)?, 7.5);
        assert_abs_diff_eq!(cost(&agile, 330)?, 7.5);

        // 05:30-06:00 is the day rate again:
        assert_abs_diff_eq!(cost(&go, 360)?, 30.0);
        Ok(())
    }

    #[test]
    fn test_go_uses_local_clock_in_summer() -> Result {
        let go = plan(PlanId::OctopusGo);
        let rates = go_rates(7.5, 30.0);
        // Ending at 05:00 UTC in January means 04:30-05:00 GMT, inside of the night band:
        let reading = ConsumptionReading::from_watt_hours(
            Utc.with_ymd_and_hms(2025, 1, 15, 5, 0, 0).unwrap(),
            1000.0,
        );
        assert_abs_diff_eq!(calculate(&go, &[reading], &rates, 0.0)?.get(), 7.5);

        // Ending at 05:00 UTC in July means 05:30-06:00 BST, outside of the night band:
        let summer = Calculator::builder()
            .plan(&go)
            .readings(&[ConsumptionReading::from_watt_hours(
                Utc.with_ymd_and_hms(2025, 7, 1, 5, 0, 0).unwrap(),
                1000.0,
            )])
            .rates(&rates)
            .standing_charge(Pence::ZERO)
            .analysis_date(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap())
            .time_zone(London)
            .build()
            .calculate()?;
        assert_abs_diff_eq!(summer.get(), 30.0);
        Ok(())
    }

    #[test]
    fn test_cosy_three_tiers() -> Result {
        let cosy = plan(PlanId::CosyOctopus);
        let rates = [
            rate(midnight(), None, 40.0, PaymentMethod::DirectDebit),
            rate(midnight(), None, 13.0, PaymentMethod::DirectDebit),
            rate(midnight(), None, 27.0, PaymentMethod::DirectDebit),
            rate(midnight(), None, 1.0, PaymentMethod::NonDirectDebit),
        ];
        let reading_at = |hour| {
            [ConsumptionReading::from_watt_hours(midnight() + TimeDelta::hours(hour), 1000.0)]
        };
        assert_abs_diff_eq!(calculate(&cosy, &reading_at(5), &rates, 0.0)?.get(), 13.0);
        assert_abs_diff_eq!(calculate(&cosy, &reading_at(10), &rates, 0.0)?.get(), 27.0);
        assert_abs_diff_eq!(calculate(&cosy, &reading_at(17), &rates, 0.0)?.get(), 40.0);
        assert_abs_diff_eq!(calculate(&cosy, &reading_at(23), &rates, 0.0)?.get(), 13.0);
        Ok(())
    }

    #[test]
    fn test_banded_falls_back_to_timestamped_on_missing_tier() -> Result {
        // Only two distinct prices for a three-tier plan:
        let cosy = plan(PlanId::CosyOctopus);
        let change = midnight() + TimeDelta::hours(12);
        let rates = [
            rate(midnight(), Some(change), 13.0, PaymentMethod::DirectDebit),
            rate(change, None, 27.0, PaymentMethod::DirectDebit),
        ];
        // 17:00 would be the peak, but the timestamped rates say 27.0:
        let readings = [ConsumptionReading::from_watt_hours(midnight() + TimeDelta::hours(17), 1000.0)];
        assert_abs_diff_eq!(calculate(&cosy, &readings, &rates, 0.0)?.get(), 27.0);
        Ok(())
    }

    #[test]
    fn test_banded_tie_falls_back_to_timestamped() -> Result {
        // Both Go tiers publish the same price, so the tiers cannot be told apart:
        let go = plan(PlanId::OctopusGo);
        let rates = go_rates(20.0, 20.0);
        let readings = [
            ConsumptionReading::from_watt_hours(midnight() + TimeDelta::hours(3), 1000.0),
            ConsumptionReading::from_watt_hours(midnight() + TimeDelta::hours(12), 1000.0),
        ];
        assert_abs_diff_eq!(calculate(&go, &readings, &rates, 0.0)?.get(), 40.0);
        Ok(())
    }

    #[test]
    fn test_idempotent() -> Result {
        let go = plan(PlanId::OctopusGo);
        let rates = go_rates(7.5, 30.0);
        let readings = (1..=48)
            .map(|index| {
                ConsumptionReading::from_watt_hours(midnight() + TimeDelta::minutes(30 * index), 123.4)
            })
            .collect::<Vec<_>>();
        let first = calculate(&go, &readings, &rates, 45.0)?;
        let second = calculate(&go, &readings, &rates, 45.0)?;
        assert_eq!(first.get().to_bits(), second.get().to_bits());
        Ok(())
    }
}
