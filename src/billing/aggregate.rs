//! Monthly aggregation of classified readings into comparison summaries.

use std::collections::BTreeMap;

use super::rates::RateTable;
use super::tiered::TierLedger;
use super::types::{ClassifiedReading, MonthKey, MonthlySummary, PeriodUsage, Scheme};
use crate::error::Result;

/// Per-month running sums for the time-varying schemes.
#[derive(Debug, Default)]
struct MonthTotals {
    total_kwh: f64,
    tou_cost: f64,
    ulo_cost: f64,
    reading_count: usize,
    tou_usage: PeriodUsage,
    ulo_usage: PeriodUsage,
}

/// Cheapest scheme; ties go to the earliest scheme in [`Scheme::ALL`].
///
/// Costs are compared with exact equality, so costs differing by a fraction
/// of a cent are not treated as ties.
pub fn best_scheme(tou: f64, ulo: f64, tiered: f64) -> Scheme {
    let costs = [(Scheme::Tou, tou), (Scheme::Ulo, ulo), (Scheme::Tiered, tiered)];
    let min = tou.min(ulo).min(tiered);
    first_matching(&costs, min)
}

/// Most expensive scheme; ties go to the earliest scheme in [`Scheme::ALL`].
pub fn worst_scheme(tou: f64, ulo: f64, tiered: f64) -> Scheme {
    let costs = [(Scheme::Tou, tou), (Scheme::Ulo, ulo), (Scheme::Tiered, tiered)];
    let max = tou.max(ulo).max(tiered);
    first_matching(&costs, max)
}

#[allow(clippy::float_cmp)]
fn first_matching(costs: &[(Scheme, f64); 3], target: f64) -> Scheme {
    costs
        .iter()
        .find(|(_, cost)| *cost == target)
        .map_or(Scheme::Tiered, |(scheme, _)| *scheme)
}

/// Groups readings by month and prices them under every scheme.
///
/// TOU and ULO costs are summed per reading (`energy_kwh * rate / 100`);
/// tiered cost comes from `ledger`. Summaries are returned in chronological
/// order, one per month present in `readings`.
///
/// # Errors
///
/// Returns [`crate::Error::UnknownPeriod`] if a reading's period has no rate.
pub fn aggregate(
    readings: &[ClassifiedReading],
    tou_rates: &RateTable,
    ulo_rates: &RateTable,
    ledger: &TierLedger,
) -> Result<Vec<MonthlySummary>> {
    let mut months: BTreeMap<MonthKey, MonthTotals> = BTreeMap::new();

    for r in readings {
        let energy = r.energy_kwh();
        let totals = months.entry(r.month_key).or_default();
        totals.total_kwh += energy;
        totals.tou_cost += tou_rates.cost_dollars(r.tou_period, energy)?;
        totals.ulo_cost += ulo_rates.cost_dollars(r.ulo_period, energy)?;
        totals.reading_count += 1;
        totals.tou_usage.add(r.tou_period, energy);
        totals.ulo_usage.add(r.ulo_period, energy);
    }

    let summaries = months
        .into_iter()
        .map(|(month, totals)| {
            let tier = ledger.get(&month);
            let tiered_cost = tier.map_or(0.0, |t| t.cost_dollars());
            MonthlySummary {
                month,
                total_kwh: totals.total_kwh,
                tou_cost: totals.tou_cost,
                ulo_cost: totals.ulo_cost,
                tiered_cost,
                best_scheme: best_scheme(totals.tou_cost, totals.ulo_cost, tiered_cost),
                worst_scheme: worst_scheme(totals.tou_cost, totals.ulo_cost, tiered_cost),
                reading_count: totals.reading_count,
                tier1_kwh: tier.map_or(0.0, |t| t.tier1_kwh),
                tier2_kwh: tier.map_or(0.0, |t| t.tier2_kwh),
                tou_usage: totals.tou_usage,
                ulo_usage: totals.ulo_usage,
            }
        })
        .collect();

    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::TimeZone;
    use chrono_tz::Tz;

    use super::*;
    use crate::billing::classify::Classifier;
    use crate::billing::tiered::{TieredPlan, accumulate_sequential};
    use crate::billing::types::{Period, Reading};

    #[test]
    fn ties_prefer_tou_then_ulo() {
        assert_eq!(best_scheme(1.0, 1.0, 1.0), Scheme::Tou);
        assert_eq!(best_scheme(2.0, 1.0, 1.0), Scheme::Ulo);
        assert_eq!(best_scheme(2.0, 3.0, 1.0), Scheme::Tiered);
        assert_eq!(worst_scheme(1.0, 1.0, 1.0), Scheme::Tou);
        assert_eq!(worst_scheme(1.0, 3.0, 3.0), Scheme::Ulo);
        assert_eq!(worst_scheme(1.0, 2.0, 3.0), Scheme::Tiered);
    }

    #[test]
    fn near_ties_are_not_merged() {
        assert_eq!(best_scheme(10.000_000_1, 10.0, 11.0), Scheme::Ulo);
    }

    fn classify(readings: &[Reading]) -> Vec<ClassifiedReading> {
        Classifier::default().classify_all(readings).unwrap()
    }

    #[test]
    fn weekend_month_scenario() {
        // Saturday 2023-12-02 and Sunday 2023-12-03: 500 kWh, all off-peak.
        let start = Tz::UTC.with_ymd_and_hms(2023, 12, 2, 0, 0, 0).unwrap();
        let readings: Vec<Reading> = (0..40)
            .map(|h| Reading::new(start + chrono::TimeDelta::hours(h), 3600, 12.5))
            .collect();
        let classified = classify(&readings);
        let plan = TieredPlan::default();
        let ledger = accumulate_sequential(&classified, &plan);
        let months = aggregate(
            &classified,
            &RateTable::ontario_tou(),
            &RateTable::ontario_ulo(),
            &ledger,
        )
        .unwrap();

        assert_eq!(months.len(), 1);
        let m = &months[0];
        assert_abs_diff_eq!(m.total_kwh, 500.0, epsilon = 1e-9);
        assert_abs_diff_eq!(m.tou_cost, 43.5, epsilon = 1e-9);
        assert_abs_diff_eq!(m.ulo_cost, 43.5, epsilon = 1e-9);
        assert_abs_diff_eq!(m.tiered_cost, 51.5, epsilon = 1e-9);
        assert_eq!(m.best_scheme, Scheme::Tou);
        assert_eq!(m.worst_scheme, Scheme::Tiered);
        assert_abs_diff_eq!(m.tou_usage.get(Period::OffPeak), 500.0, epsilon = 1e-9);
        assert_eq!(m.reading_count, 40);
    }

    #[test]
    fn months_are_chronological() {
        let jan = Tz::UTC.with_ymd_and_hms(2024, 1, 10, 3, 0, 0).unwrap();
        let dec = Tz::UTC.with_ymd_and_hms(2023, 12, 10, 3, 0, 0).unwrap();
        let classified = classify(&[Reading::new(jan, 3600, 1.0), Reading::new(dec, 3600, 1.0)]);
        let ledger = accumulate_sequential(&classified, &TieredPlan::default());
        let months = aggregate(
            &classified,
            &RateTable::ontario_tou(),
            &RateTable::ontario_ulo(),
            &ledger,
        )
        .unwrap();
        let keys: Vec<MonthKey> = months.iter().map(|m| m.month).collect();
        assert_eq!(keys, vec![MonthKey::new(2023, 12), MonthKey::new(2024, 1)]);
    }

    #[test]
    fn missing_rate_aborts() {
        let start = Tz::UTC.with_ymd_and_hms(2023, 12, 13, 2, 0, 0).unwrap();
        let classified = classify(&[Reading::new(start, 3600, 1.0)]);
        let ledger = accumulate_sequential(&classified, &TieredPlan::default());
        // ULO reading priced against the TOU table, which has no `ulo` entry.
        let result = aggregate(
            &classified,
            &RateTable::ontario_tou(),
            &RateTable::ontario_tou(),
            &ledger,
        );
        assert!(matches!(
            result,
            Err(crate::Error::UnknownPeriod {
                period: Period::Ulo,
                ..
            })
        ));
    }
}
