//! Core billing types: readings, period labels, schemes, and monthly summaries.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, TimeDelta, TimeZone, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Pricing period label assigned to an interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    OnPeak,
    MidPeak,
    OffPeak,
    /// Ultra-low overnight.
    Ulo,
}

impl Period {
    /// Every period label, in display order.
    pub const ALL: [Self; 4] = [Self::OnPeak, Self::MidPeak, Self::OffPeak, Self::Ulo];

    /// Snake-case label used in configuration and reports.
    pub fn label(self) -> &'static str {
        match self {
            Self::OnPeak => "on_peak",
            Self::MidPeak => "mid_peak",
            Self::OffPeak => "off_peak",
            Self::Ulo => "ulo",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Billing scheme under comparison.
///
/// Declaration order is the tie-break preference order for best/worst picks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Scheme {
    #[serde(rename = "TOU")]
    Tou,
    #[serde(rename = "ULO")]
    Ulo,
    #[serde(rename = "Tiered")]
    Tiered,
}

impl Scheme {
    /// All schemes in tie-break preference order.
    pub const ALL: [Self; 3] = [Self::Tou, Self::Ulo, Self::Tiered];
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Tou => "TOU",
            Self::Ulo => "ULO",
            Self::Tiered => "Tiered",
        })
    }
}

/// Tariff season, selecting period bands and the tier threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Summer,
    Winter,
}

impl Season {
    pub const ALL: [Self; 2] = [Self::Summer, Self::Winter];
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Summer => "summer",
            Self::Winter => "winter",
        })
    }
}

/// Calendar month used to group readings, ordered chronologically.
///
/// Serialized as `"YYYY-MM"`.
///
/// # Examples
///
/// ```
/// use tariff_compare::billing::types::MonthKey;
///
/// let key: MonthKey = "2023-09".parse().unwrap();
/// assert_eq!(key, MonthKey::new(2023, 9));
/// assert_eq!(key.to_string(), "2023-09");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    /// Month of year, 1-12.
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Month containing `time`, in `time`'s own timezone.
    pub fn of<Z: TimeZone>(time: &DateTime<Z>) -> Self {
        Self::new(time.year(), time.month())
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| format!("expected YYYY-MM, got \"{s}\""))?;
        let year = year
            .parse::<i32>()
            .map_err(|e| format!("invalid year in \"{s}\": {e}"))?;
        let month = month
            .parse::<u32>()
            .map_err(|e| format!("invalid month in \"{s}\": {e}"))?;
        if !(1..=12).contains(&month) {
            return Err(format!("month must be in 1..=12, got {month}"));
        }
        Ok(Self::new(year, month))
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One normalized interval reading.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    /// Interval start, timezone-aware.
    pub start_time: DateTime<Tz>,
    /// Interval length in seconds.
    pub duration_secs: u32,
    /// Energy consumed during the interval (kWh, >= 0).
    pub energy_kwh: f64,
}

impl Reading {
    pub fn new(start_time: DateTime<Tz>, duration_secs: u32, energy_kwh: f64) -> Self {
        Self {
            start_time,
            duration_secs,
            energy_kwh,
        }
    }

    /// Exclusive end of the interval.
    pub fn end_time(&self) -> DateTime<Tz> {
        self.start_time + TimeDelta::seconds(i64::from(self.duration_secs))
    }
}

/// A reading with its calendar attributes and period labels.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedReading {
    pub reading: Reading,
    /// Billing month the reading falls into.
    pub month_key: MonthKey,
    /// Month of year, 1-12.
    pub month: u32,
    /// Local hour of the interval start, 0-23.
    pub hour_of_day: u32,
    pub day_of_week: Weekday,
    pub is_weekend: bool,
    pub is_holiday: bool,
    pub season: Season,
    pub tou_period: Period,
    pub ulo_period: Period,
}

impl ClassifiedReading {
    pub fn start_time(&self) -> &DateTime<Tz> {
        &self.reading.start_time
    }

    pub fn energy_kwh(&self) -> f64 {
        self.reading.energy_kwh
    }
}

/// Energy per period label (kWh).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PeriodUsage {
    pub on_peak: f64,
    pub mid_peak: f64,
    pub off_peak: f64,
    pub ulo: f64,
}

impl PeriodUsage {
    pub fn add(&mut self, period: Period, kwh: f64) {
        *self.slot_mut(period) += kwh;
    }

    pub fn get(&self, period: Period) -> f64 {
        match period {
            Period::OnPeak => self.on_peak,
            Period::MidPeak => self.mid_peak,
            Period::OffPeak => self.off_peak,
            Period::Ulo => self.ulo,
        }
    }

    pub fn total(&self) -> f64 {
        self.on_peak + self.mid_peak + self.off_peak + self.ulo
    }

    fn slot_mut(&mut self, period: Period) -> &mut f64 {
        match period {
            Period::OnPeak => &mut self.on_peak,
            Period::MidPeak => &mut self.mid_peak,
            Period::OffPeak => &mut self.off_peak,
            Period::Ulo => &mut self.ulo,
        }
    }
}

/// Final per-month comparison record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    pub month: MonthKey,
    /// Total energy consumed in the month (kWh).
    pub total_kwh: f64,
    /// Cost under time-of-use pricing ($).
    pub tou_cost: f64,
    /// Cost under ultra-low-overnight pricing ($).
    pub ulo_cost: f64,
    /// Cost under tiered pricing ($).
    pub tiered_cost: f64,
    pub best_scheme: Scheme,
    pub worst_scheme: Scheme,
    /// Number of interval readings in the month.
    pub reading_count: usize,
    /// Energy billed at the tier-1 rate (kWh).
    pub tier1_kwh: f64,
    /// Energy billed at the tier-2 rate (kWh).
    pub tier2_kwh: f64,
    /// Energy per TOU period (kWh).
    pub tou_usage: PeriodUsage,
    /// Energy per ULO period (kWh).
    pub ulo_usage: PeriodUsage,
}

impl MonthlySummary {
    /// Cost of the month under `scheme` ($).
    pub fn cost(&self, scheme: Scheme) -> f64 {
        match scheme {
            Scheme::Tou => self.tou_cost,
            Scheme::Ulo => self.ulo_cost,
            Scheme::Tiered => self.tiered_cost,
        }
    }

    /// Dollars saved by the best scheme relative to the worst.
    pub fn spread(&self) -> f64 {
        self.cost(self.worst_scheme) - self.cost(self.best_scheme)
    }
}

impl fmt::Display for MonthlySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  {:>10.2}  {:>9.2}  {:>9.2}  {:>9.2}  {:<6}  {:<6}",
            self.month,
            self.total_kwh,
            self.tou_cost,
            self.ulo_cost,
            self.tiered_cost,
            self.best_scheme,
            self.worst_scheme,
        )
    }
}
