//! Two-tier volumetric billing with a monthly, seasonal threshold.
//!
//! Tier-1 capacity depletes as usage accumulates within a month, so the
//! split of each reading depends on everything consumed before it. The
//! reduction is an explicit fold of per-month [`TierState`]s over readings
//! sorted by start time; state never crosses a month boundary.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::types::{ClassifiedReading, MonthKey, Season};

/// How tiered cost is computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieredMethod {
    /// Per-reading accumulation in time order (canonical).
    #[default]
    Sequential,
    /// Threshold applied to the month's total usage in one step.
    ///
    /// An approximation kept as a fast path; it agrees with
    /// [`TieredMethod::Sequential`] up to floating-point summation order for
    /// non-negative readings.
    WholeMonth,
}

impl fmt::Display for TieredMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sequential => "sequential",
            Self::WholeMonth => "whole_month",
        })
    }
}

impl FromStr for TieredMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sequential" => Ok(Self::Sequential),
            "whole_month" | "whole-month" => Ok(Self::WholeMonth),
            other => Err(format!(
                "unknown tiered method \"{other}\", expected \"sequential\" or \"whole_month\""
            )),
        }
    }
}

/// Thresholds and prices of the tiered plan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TieredPlan {
    /// Tier-1 allowance per summer month (kWh).
    pub summer_threshold_kwh: f64,
    /// Tier-1 allowance per winter month (kWh).
    pub winter_threshold_kwh: f64,
    /// Price below the threshold (cents/kWh).
    pub tier1_cents: f64,
    /// Price above the threshold (cents/kWh).
    pub tier2_cents: f64,
}

impl TieredPlan {
    pub fn threshold_for(&self, season: Season) -> f64 {
        match season {
            Season::Summer => self.summer_threshold_kwh,
            Season::Winter => self.winter_threshold_kwh,
        }
    }
}

impl Default for TieredPlan {
    /// 600 kWh summer / 1000 kWh winter allowance, 10.3 / 12.5 cents.
    fn default() -> Self {
        Self {
            summer_threshold_kwh: 600.0,
            winter_threshold_kwh: 1000.0,
            tier1_cents: 10.3,
            tier2_cents: 12.5,
        }
    }
}

/// How one reading's energy was split between the tiers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierSplit {
    pub tier1_kwh: f64,
    pub tier2_kwh: f64,
}

impl TierSplit {
    pub fn total_kwh(&self) -> f64 {
        self.tier1_kwh + self.tier2_kwh
    }

    /// Cost of the split in cents.
    pub fn cost_cents(&self, plan: &TieredPlan) -> f64 {
        self.tier1_kwh * plan.tier1_cents + self.tier2_kwh * plan.tier2_cents
    }
}

/// Running tier accounting for one month.
#[derive(Debug, Clone, PartialEq)]
pub struct TierState {
    pub month: MonthKey,
    /// Tier-1 allowance for this month (kWh).
    pub threshold_kwh: f64,
    /// Energy consumed so far this month (kWh).
    pub cumulative_kwh: f64,
    pub tier1_kwh: f64,
    pub tier2_kwh: f64,
    pub cost_cents: f64,
}

impl TierState {
    /// Fresh state at the start of `month`.
    pub fn new(month: MonthKey, threshold_kwh: f64) -> Self {
        Self {
            month,
            threshold_kwh,
            cumulative_kwh: 0.0,
            tier1_kwh: 0.0,
            tier2_kwh: 0.0,
            cost_cents: 0.0,
        }
    }

    /// Tier-1 allowance still available (kWh).
    pub fn remaining_tier1_kwh(&self) -> f64 {
        (self.threshold_kwh - self.cumulative_kwh).max(0.0)
    }

    /// Bills `energy_kwh` against the remaining allowance.
    ///
    /// A reading that crosses the threshold is split within itself; the
    /// whole amount is added to `cumulative_kwh`.
    pub fn consume(&mut self, energy_kwh: f64, plan: &TieredPlan) -> TierSplit {
        let tier1_kwh = energy_kwh.min(self.remaining_tier1_kwh());
        let split = TierSplit {
            tier1_kwh,
            tier2_kwh: energy_kwh - tier1_kwh,
        };
        self.tier1_kwh += split.tier1_kwh;
        self.tier2_kwh += split.tier2_kwh;
        self.cost_cents += split.cost_cents(plan);
        self.cumulative_kwh += energy_kwh;
        split
    }

    /// Month's tiered cost in dollars.
    pub fn cost_dollars(&self) -> f64 {
        self.cost_cents / 100.0
    }
}

/// Final tier states, one per month seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TierLedger {
    months: BTreeMap<MonthKey, TierState>,
}

impl TierLedger {
    pub fn get(&self, month: &MonthKey) -> Option<&TierState> {
        self.months.get(month)
    }

    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }
}

/// Computes tier states with the chosen method.
pub fn accumulate(
    readings: &[ClassifiedReading],
    plan: &TieredPlan,
    method: TieredMethod,
) -> TierLedger {
    match method {
        TieredMethod::Sequential => accumulate_sequential(readings, plan),
        TieredMethod::WholeMonth => accumulate_whole_month(readings, plan),
    }
}

/// Folds readings in ascending start-time order into per-month tier states.
///
/// Input that is not sorted is sorted (stably) before folding and a warning
/// is logged; callers never get a silently wrong split.
pub fn accumulate_sequential(readings: &[ClassifiedReading], plan: &TieredPlan) -> TierLedger {
    let mut ordered: Vec<&ClassifiedReading> = readings.iter().collect();
    if !ordered
        .windows(2)
        .all(|pair| pair[0].start_time() <= pair[1].start_time())
    {
        warn!(
            readings = readings.len(),
            "tiered input not in time order, sorting before accumulation"
        );
        ordered.sort_by(|a, b| a.start_time().cmp(b.start_time()));
    }

    let months = ordered
        .into_iter()
        .fold(BTreeMap::new(), |mut months: BTreeMap<MonthKey, TierState>, r| {
            months
                .entry(r.month_key)
                .or_insert_with(|| TierState::new(r.month_key, plan.threshold_for(r.season)))
                .consume(r.energy_kwh(), plan);
            months
        });

    TierLedger { months }
}

/// Applies the threshold once to each month's total usage.
pub fn accumulate_whole_month(readings: &[ClassifiedReading], plan: &TieredPlan) -> TierLedger {
    let mut totals: BTreeMap<MonthKey, (Season, f64)> = BTreeMap::new();
    for r in readings {
        totals.entry(r.month_key).or_insert((r.season, 0.0)).1 += r.energy_kwh();
    }

    let months = totals
        .into_iter()
        .map(|(month, (season, total_kwh))| {
            let mut state = TierState::new(month, plan.threshold_for(season));
            state.consume(total_kwh, plan);
            (month, state)
        })
        .collect();

    TierLedger { months }
}
