//! Graceful degradation rules for incomplete provider data.

use chrono::{DateTime, Utc};
use itertools::Itertools;

use crate::{core::rate::RateInterval, ops::Interval, quantity::price::PencePerKilowattHour};

/// Direct-debit rates when there are any, otherwise all of them.
pub fn prefer_direct_debit<'a>(
    rates: impl IntoIterator<Item = &'a RateInterval>,
) -> Vec<&'a RateInterval> {
    let (direct_debit, other): (Vec<_>, Vec<_>) =
        rates.into_iter().partition(|rate| rate.is_direct_debit());
    if direct_debit.is_empty() { other } else { direct_debit }
}

/// Rates active at any point of the interval.
pub fn active_during(rates: &[RateInterval], interval: Interval) -> Vec<&RateInterval> {
    rates.iter().filter(|rate| rate.overlaps(interval)).collect()
}

/// Rates used to build the display timeline.
///
/// Preference order:
///
/// 1. Direct-debit rates that have not ended yet.
/// 2. Any rates that have not ended yet.
/// 3. All rates.
pub fn timeline_candidates(rates: &[RateInterval], now: DateTime<Utc>) -> Vec<&RateInterval> {
    let direct_debit = rates
        .iter()
        .filter(|rate| rate.is_direct_debit() && rate.is_unexpired_at(now))
        .collect_vec();
    if !direct_debit.is_empty() {
        return direct_debit;
    }
    let unexpired = rates.iter().filter(|rate| rate.is_unexpired_at(now)).collect_vec();
    if !unexpired.is_empty() {
        return unexpired;
    }
    rates.iter().collect()
}

/// Rate applicable right now, rounded to 2 decimal places.
///
/// Preference order:
///
/// 1. The most recently started open-ended direct-debit rate.
/// 2. Any rate valid now: the most recently started, direct-debit on ties.
pub fn current_rate(rates: &[RateInterval], now: DateTime<Utc>) -> Option<PencePerKilowattHour> {
    rates
        .iter()
        .filter(|rate| {
            rate.is_direct_debit() && rate.valid_to.is_none() && rate.has_started_by(now)
        })
        .max_by_key(|rate| rate.valid_from)
        .or_else(|| {
            rates
                .iter()
                .filter(|rate| rate.is_valid_at(now))
                .max_by_key(|rate| (rate.valid_from, rate.is_direct_debit()))
        })
        .map(|rate| rate.value_inc_vat.round_to(2))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, TimeZone};

    use super::*;
    use crate::core::rate::PaymentMethod;

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

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_prefer_direct_debit() {
        let rates = [
            rate(now(), None, 1.0, PaymentMethod::NonDirectDebit),
            rate(now(), None, 2.0, PaymentMethod::DirectDebit),
        ];
        let preferred = prefer_direct_debit(&rates);
        assert_eq!(preferred.len(), 1);
        assert!(preferred[0].is_direct_debit());

        let preferred = prefer_direct_debit(&rates[..1]);
        assert_eq!(preferred.len(), 1);
        assert_eq!(preferred[0].payment_method, PaymentMethod::NonDirectDebit);
    }

    #[test]
    fn test_timeline_candidates_prefers_unexpired_direct_debit() {
        let rates = [
            rate(now(), None, 1.0, PaymentMethod::NonDirectDebit),
            rate(now(), None, 2.0, PaymentMethod::DirectDebit),
            rate(now() - TimeDelta::days(2), Some(now() - TimeDelta::days(1)), 3.0, PaymentMethod::DirectDebit),
        ];
        let candidates = timeline_candidates(&rates, now());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].value_inc_vat, 2.0.into());
    }

    #[test]
    fn test_timeline_candidates_falls_back_to_unexpired() {
        let rates = [
            rate(now(), None, 1.0, PaymentMethod::NonDirectDebit),
            rate(now() - TimeDelta::days(2), Some(now() - TimeDelta::days(1)), 3.0, PaymentMethod::DirectDebit),
        ];
        let candidates = timeline_candidates(&rates, now());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].value_inc_vat, 1.0.into());
    }

    #[test]
    fn test_timeline_candidates_falls_back_to_all() {
        let rates = [
            rate(now() - TimeDelta::days(2), Some(now() - TimeDelta::days(1)), 3.0, PaymentMethod::DirectDebit),
            rate(now() - TimeDelta::days(3), Some(now() - TimeDelta::days(2)), 4.0, PaymentMethod::Unspecified),
        ];
        assert_eq!(timeline_candidates(&rates, now()).len(), 2);
    }

    #[test]
    fn test_current_rate_prefers_open_ended_direct_debit() {
        let rates = [
            rate(now() - TimeDelta::days(10), None, 24.123, PaymentMethod::DirectDebit),
            rate(now() - TimeDelta::days(1), None, 25.456, PaymentMethod::DirectDebit),
            rate(now() - TimeDelta::hours(1), Some(now() + TimeDelta::hours(1)), 30.0, PaymentMethod::DirectDebit),
            rate(now() + TimeDelta::days(1), None, 40.0, PaymentMethod::DirectDebit),
        ];
        assert_eq!(current_rate(&rates, now()), Some(25.46.into()));
    }

    #[test]
    fn test_current_rate_falls_back_to_any_valid() {
        let rates = [
            rate(now() - TimeDelta::hours(1), Some(now() + TimeDelta::hours(1)), 26.0, PaymentMethod::NonDirectDebit),
            rate(now() - TimeDelta::hours(1), Some(now() + TimeDelta::hours(1)), 25.0, PaymentMethod::DirectDebit),
            rate(now() - TimeDelta::hours(3), Some(now() - TimeDelta::hours(1)), 99.0, PaymentMethod::DirectDebit),
        ];
        assert_eq!(current_rate(&rates, now()), Some(25.0.into()));
    }

    #[test]
    fn test_current_rate_none() {
        let rates = [rate(now() + TimeDelta::hours(1), None, 26.0, PaymentMethod::NonDirectDebit)];
        assert_eq!(current_rate(&rates, now()), None);
        assert_eq!(current_rate(&[], now()), None);
    }
}
