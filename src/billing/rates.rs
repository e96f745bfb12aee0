//! Per-scheme price tables.

use std::collections::BTreeMap;

use super::types::{Period, Scheme};
use crate::error::{Error, Result};

/// Price per kWh (cents) for each period label of one scheme.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    scheme: Scheme,
    cents_per_kwh: BTreeMap<Period, f64>,
}

impl RateTable {
    pub fn new(scheme: Scheme, cents_per_kwh: BTreeMap<Period, f64>) -> Self {
        Self {
            scheme,
            cents_per_kwh,
        }
    }

    /// TOU prices: on-peak 18.2, mid-peak 12.2, off-peak 8.7 cents/kWh.
    pub fn ontario_tou() -> Self {
        Self::new(Scheme::Tou, default_tou_rates())
    }

    /// ULO prices: on-peak 28.6, mid-peak 12.2, off-peak 8.7, ULO 2.8 cents/kWh.
    pub fn ontario_ulo() -> Self {
        Self::new(Scheme::Ulo, default_ulo_rates())
    }

    /// Price of `period` in cents per kWh.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownPeriod`] if the table has no entry for `period`.
    pub fn rate_cents(&self, period: Period) -> Result<f64> {
        self.cents_per_kwh
            .get(&period)
            .copied()
            .ok_or(Error::UnknownPeriod {
                scheme: self.scheme,
                period,
            })
    }

    /// Cost in dollars of `energy_kwh` billed at `period`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownPeriod`] if the table has no entry for `period`.
    pub fn cost_dollars(&self, period: Period, energy_kwh: f64) -> Result<f64> {
        Ok(energy_kwh * self.rate_cents(period)? / 100.0)
    }

    pub fn contains(&self, period: Period) -> bool {
        self.cents_per_kwh.contains_key(&period)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Period, f64)> + '_ {
        self.cents_per_kwh.iter().map(|(&p, &c)| (p, c))
    }
}

pub fn default_tou_rates() -> BTreeMap<Period, f64> {
    BTreeMap::from([
        (Period::OnPeak, 18.2),
        (Period::MidPeak, 12.2),
        (Period::OffPeak, 8.7),
    ])
}

pub fn default_ulo_rates() -> BTreeMap<Period, f64> {
    BTreeMap::from([
        (Period::OnPeak, 28.6),
        (Period::MidPeak, 12.2),
        (Period::OffPeak, 8.7),
        (Period::Ulo, 2.8),
    ])
}
