//! Comparison report: monthly summaries plus totals across the export.

use std::fmt;

use serde::Serialize;

use super::aggregate::{best_scheme, worst_scheme};
use super::types::{MonthlySummary, Period, Scheme};

/// Costs summed over every month of the export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Totals {
    pub total_kwh: f64,
    pub tou_cost: f64,
    pub ulo_cost: f64,
    pub tiered_cost: f64,
    pub best_scheme: Scheme,
    pub worst_scheme: Scheme,
}

impl Totals {
    pub fn cost(&self, scheme: Scheme) -> f64 {
        match scheme {
            Scheme::Tou => self.tou_cost,
            Scheme::Ulo => self.ulo_cost,
            Scheme::Tiered => self.tiered_cost,
        }
    }
}

/// Full output of one comparison run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    /// One summary per month, chronological.
    pub months: Vec<MonthlySummary>,
    pub totals: Totals,
}

impl ComparisonReport {
    pub fn from_months(months: Vec<MonthlySummary>) -> Self {
        let total_kwh = months.iter().map(|m| m.total_kwh).sum();
        let tou_cost: f64 = months.iter().map(|m| m.tou_cost).sum();
        let ulo_cost: f64 = months.iter().map(|m| m.ulo_cost).sum();
        let tiered_cost: f64 = months.iter().map(|m| m.tiered_cost).sum();
        Self {
            months,
            totals: Totals {
                total_kwh,
                tou_cost,
                ulo_cost,
                tiered_cost,
                best_scheme: best_scheme(tou_cost, ulo_cost, tiered_cost),
                worst_scheme: worst_scheme(tou_cost, ulo_cost, tiered_cost),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// Number of months in which `scheme` was the cheapest.
    pub fn months_won(&self, scheme: Scheme) -> usize {
        self.months
            .iter()
            .filter(|m| m.best_scheme == scheme)
            .count()
    }

    /// Per-period and per-tier energy table.
    pub fn breakdown(&self) -> Breakdown<'_> {
        Breakdown(self)
    }
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<7}  {:>10}  {:>9}  {:>9}  {:>9}  {:<6}  {:<6}",
            "Month", "Usage kWh", "TOU $", "ULO $", "Tiered $", "Best", "Worst"
        )?;
        for m in &self.months {
            writeln!(f, "{m}")?;
        }
        let t = &self.totals;
        writeln!(
            f,
            "{:<7}  {:>10.2}  {:>9.2}  {:>9.2}  {:>9.2}  {:<6}  {:<6}",
            "Total", t.total_kwh, t.tou_cost, t.ulo_cost, t.tiered_cost, t.best_scheme, t.worst_scheme
        )?;
        write!(
            f,
            "Cheapest overall: {} (${:.2}, saves ${:.2} over {})",
            t.best_scheme,
            t.cost(t.best_scheme),
            t.cost(t.worst_scheme) - t.cost(t.best_scheme),
            t.worst_scheme,
        )
    }
}

/// Energy split table, rendered by [`ComparisonReport::breakdown`].
pub struct Breakdown<'a>(&'a ComparisonReport);

impl fmt::Display for Breakdown<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<7}  {:>9}  {:>9}  {:>9}  {:>9}  {:>9}  {:>9}  {:>9}  {:>9}  {:>9}",
            "Month",
            "TOU on",
            "TOU mid",
            "TOU off",
            "TOU ulo",
            "ULO on",
            "ULO mid",
            "ULO off",
            "ULO ulo",
            "Tier 2"
        )?;
        for m in &self.0.months {
            write!(f, "{:<7}", m.month.to_string())?;
            for period in Period::ALL {
                write!(f, "  {:>9.2}", m.tou_usage.get(period))?;
            }
            for period in Period::ALL {
                write!(f, "  {:>9.2}", m.ulo_usage.get(period))?;
            }
            writeln!(f, "  {:>9.2}", m.tier2_kwh)?;
        }
        Ok(())
    }
}
