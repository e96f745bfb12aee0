//! Comparison pipeline: classify, price, accumulate tiers, aggregate.

use chrono_tz::Tz;
use tracing::{debug, info};

use super::aggregate::aggregate;
use super::classify::Classifier;
use super::rates::RateTable;
use super::report::ComparisonReport;
use super::tiered::{TieredMethod, TieredPlan, accumulate};
use super::types::{ClassifiedReading, Reading};
use crate::config::TariffConfig;
use crate::error::{Error, Result};

/// Billing engine holding validated tariffs for all three schemes.
///
/// Built once from a [`TariffConfig`]; [`Engine::run`] is a pure function
/// of its input, so repeated runs over the same readings give identical
/// reports.
#[derive(Debug, Clone)]
pub struct Engine {
    classifier: Classifier,
    tou_rates: RateTable,
    ulo_rates: RateTable,
    plan: TieredPlan,
    method: TieredMethod,
    timezone: Tz,
}

impl Engine {
    /// Validates `config` and builds the engine.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] with every validation failure.
    pub fn from_config(config: &TariffConfig) -> Result<Self> {
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(Error::Config(errors));
        }
        let timezone = config.timezone().map_err(|e| Error::Config(vec![e]))?;

        let classifier = Classifier::new(
            config.tou_table(),
            config.ulo_table(),
            config.season_calendar(),
            config.holiday_calendar(),
        );

        debug!(
            %timezone,
            holidays = classifier.holidays().len(),
            method = %config.tiered.method,
            "billing engine configured"
        );

        Ok(Self {
            classifier,
            tou_rates: config.tou_rates(),
            ulo_rates: config.ulo_rates(),
            plan: config.tiered_plan(),
            method: config.tiered.method,
            timezone,
        })
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn method(&self) -> TieredMethod {
        self.method
    }

    pub fn plan(&self) -> &TieredPlan {
        &self.plan
    }

    /// Classifies readings in the engine's timezone, sorted by start time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedReading`] for negative or non-finite energy
    /// and [`Error::UncoveredHour`] if a period table has a gap.
    pub fn classify(&self, readings: &[Reading]) -> Result<Vec<ClassifiedReading>> {
        let mut classified = readings
            .iter()
            .enumerate()
            .map(|(i, r)| {
                if !r.energy_kwh.is_finite() || r.energy_kwh < 0.0 {
                    return Err(Error::malformed(
                        format!("reading {i} ({})", r.start_time.to_rfc3339()),
                        format!("energy must be a finite value >= 0, got {}", r.energy_kwh),
                    ));
                }
                let local = Reading::new(
                    r.start_time.with_timezone(&self.timezone),
                    r.duration_secs,
                    r.energy_kwh,
                );
                self.classifier.classify(&local)
            })
            .collect::<Result<Vec<_>>>()?;
        classified.sort_by(|a, b| a.start_time().cmp(b.start_time()));
        Ok(classified)
    }

    /// Runs the full comparison over `readings`.
    ///
    /// # Errors
    ///
    /// Fails on the first reading that cannot be classified or priced; no
    /// partial report is produced.
    pub fn run(&self, readings: &[Reading]) -> Result<ComparisonReport> {
        let classified = self.classify(readings)?;
        let ledger = accumulate(&classified, &self.plan, self.method);
        let months = aggregate(&classified, &self.tou_rates, &self.ulo_rates, &ledger)?;

        for m in &months {
            debug!(
                month = %m.month,
                kwh = m.total_kwh,
                tou = m.tou_cost,
                ulo = m.ulo_cost,
                tiered = m.tiered_cost,
                best = %m.best_scheme,
                "month priced"
            );
        }

        let report = ComparisonReport::from_months(months);
        info!(
            readings = readings.len(),
            months = report.months.len(),
            best = %report.totals.best_scheme,
            "comparison complete"
        );
        Ok(report)
    }
}
