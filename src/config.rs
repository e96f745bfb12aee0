//! TOML-based tariff configuration and preset definitions.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::Deserialize;

use crate::billing::calendar::{HolidayCalendar, SeasonCalendar};
use crate::billing::period::{HOURS_PER_DAY, HourBand, PeriodTable, default_tou_bands, default_ulo_bands};
use crate::billing::rates::{RateTable, default_tou_rates, default_ulo_rates};
use crate::billing::tiered::{TieredMethod, TieredPlan};
use crate::billing::types::{Period, Scheme};

/// Top-level tariff configuration parsed from TOML.
///
/// All fields have defaults matching the `ontario` preset. Load from TOML
/// with [`TariffConfig::from_toml_file`] or use [`TariffConfig::ontario`]
/// for the built-in default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TariffConfig {
    /// Timezone, season boundaries and holidays.
    #[serde(default)]
    pub calendar: CalendarConfig,
    /// Time-of-use scheme.
    #[serde(default)]
    pub tou: TouConfig,
    /// Ultra-low-overnight scheme.
    #[serde(default)]
    pub ulo: UloConfig,
    /// Tiered scheme.
    #[serde(default)]
    pub tiered: TieredConfig,
}

/// Calendar parameters shared by every scheme.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalendarConfig {
    /// IANA timezone name used to derive local hours and dates.
    pub timezone: String,
    /// First summer month (1-12, inclusive).
    pub summer_start_month: u32,
    /// Last summer month (1-12, inclusive).
    pub summer_end_month: u32,
    /// Local dates billed like weekends.
    pub holidays: Vec<NaiveDate>,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
            summer_start_month: 5,
            summer_end_month: 10,
            holidays: Vec::new(),
        }
    }
}

/// Time-of-use prices and hour bands.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TouConfig {
    /// Price per period (cents/kWh).
    pub rates: BTreeMap<Period, f64>,
    /// Period used on weekends and holidays.
    pub non_working_day: Period,
    /// Weekday hour bands.
    pub bands: Vec<HourBand>,
}

impl Default for TouConfig {
    fn default() -> Self {
        Self {
            rates: default_tou_rates(),
            non_working_day: Period::OffPeak,
            bands: default_tou_bands(),
        }
    }
}

/// Ultra-low-overnight prices and hour bands.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UloConfig {
    /// Price per period (cents/kWh).
    pub rates: BTreeMap<Period, f64>,
    /// Period used on weekends and holidays.
    pub non_working_day: Period,
    /// Weekday hour bands.
    pub bands: Vec<HourBand>,
}

impl Default for UloConfig {
    fn default() -> Self {
        Self {
            rates: default_ulo_rates(),
            non_working_day: Period::OffPeak,
            bands: default_ulo_bands(),
        }
    }
}

/// Tiered plan parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TieredConfig {
    /// `"sequential"` (canonical) or `"whole_month"` (approximation).
    pub method: TieredMethod,
    /// Tier-1 allowance per summer month (kWh).
    pub summer_threshold_kwh: f64,
    /// Tier-1 allowance per winter month (kWh).
    pub winter_threshold_kwh: f64,
    /// Price below the threshold (cents/kWh).
    pub tier1_cents: f64,
    /// Price above the threshold (cents/kWh).
    pub tier2_cents: f64,
}

impl Default for TieredConfig {
    fn default() -> Self {
        let plan = TieredPlan::default();
        Self {
            method: TieredMethod::default(),
            summer_threshold_kwh: plan.summer_threshold_kwh,
            winter_threshold_kwh: plan.winter_threshold_kwh,
            tier1_cents: plan.tier1_cents,
            tier2_cents: plan.tier2_cents,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"tiered.tier1_cents"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Ontario TOU holidays, 2023-2025: the ten days a year billed off-peak,
/// which include the Civic Holiday in August.
const ONTARIO_HOLIDAYS: &[(i32, u32, u32)] = &[
    (2023, 1, 2),
    (2023, 2, 20),
    (2023, 4, 7),
    (2023, 5, 22),
    (2023, 7, 3),
    (2023, 8, 7),
    (2023, 9, 4),
    (2023, 10, 9),
    (2023, 12, 25),
    (2023, 12, 26),
    (2024, 1, 1),
    (2024, 2, 19),
    (2024, 3, 29),
    (2024, 5, 20),
    (2024, 7, 1),
    (2024, 8, 5),
    (2024, 9, 2),
    (2024, 10, 14),
    (2024, 12, 25),
    (2024, 12, 26),
    (2025, 1, 1),
    (2025, 2, 17),
    (2025, 4, 18),
    (2025, 5, 19),
    (2025, 7, 1),
    (2025, 8, 4),
    (2025, 9, 1),
    (2025, 10, 13),
    (2025, 12, 25),
    (2025, 12, 26),
];

impl TariffConfig {
    /// Returns the default tariffs: no holidays, timestamps read in UTC.
    pub fn ontario() -> Self {
        Self {
            calendar: CalendarConfig::default(),
            tou: TouConfig::default(),
            ulo: UloConfig::default(),
            tiered: TieredConfig::default(),
        }
    }

    /// Returns the default tariffs with local time and TOU holidays.
    pub fn ontario_holidays() -> Self {
        Self {
            calendar: CalendarConfig {
                timezone: "America/Toronto".to_string(),
                holidays: ONTARIO_HOLIDAYS
                    .iter()
                    .filter_map(|&(y, m, d)| NaiveDate::from_ymd_opt(y, m, d))
                    .collect(),
                ..CalendarConfig::default()
            },
            ..Self::ontario()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["ontario", "ontario_holidays"];

    /// Loads tariffs from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "ontario" => Ok(Self::ontario()),
            "ontario_holidays" => Ok(Self::ontario_holidays()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses tariffs from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("tariff", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses tariffs from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Resolves the configured timezone.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the name is not an IANA timezone.
    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        self.calendar.timezone.parse::<Tz>().map_err(|e| {
            ConfigError::new(
                "calendar.timezone",
                format!("unknown timezone \"{}\": {e}", self.calendar.timezone),
            )
        })
    }

    pub fn season_calendar(&self) -> SeasonCalendar {
        SeasonCalendar::new(self.calendar.summer_start_month, self.calendar.summer_end_month)
    }

    pub fn holiday_calendar(&self) -> HolidayCalendar {
        HolidayCalendar::new(self.calendar.holidays.iter().copied())
    }

    pub fn tou_table(&self) -> PeriodTable {
        PeriodTable::new(Scheme::Tou, self.tou.bands.clone(), self.tou.non_working_day)
    }

    pub fn ulo_table(&self) -> PeriodTable {
        PeriodTable::new(Scheme::Ulo, self.ulo.bands.clone(), self.ulo.non_working_day)
    }

    pub fn tou_rates(&self) -> RateTable {
        RateTable::new(Scheme::Tou, self.tou.rates.clone())
    }

    pub fn ulo_rates(&self) -> RateTable {
        RateTable::new(Scheme::Ulo, self.ulo.rates.clone())
    }

    pub fn tiered_plan(&self) -> TieredPlan {
        TieredPlan {
            summer_threshold_kwh: self.tiered.summer_threshold_kwh,
            winter_threshold_kwh: self.tiered.winter_threshold_kwh,
            tier1_cents: self.tiered.tier1_cents,
            tier2_cents: self.tiered.tier2_cents,
        }
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid. A valid
    /// configuration classifies every hour of every season exactly once and
    /// has a rate for every period its tables can produce.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let cal = &self.calendar;
        if let Err(e) = self.timezone() {
            errors.push(e);
        }
        for (field, month) in [
            ("calendar.summer_start_month", cal.summer_start_month),
            ("calendar.summer_end_month", cal.summer_end_month),
        ] {
            if !(1..=12).contains(&month) {
                errors.push(ConfigError::new(field, "must be in [1, 12]"));
            }
        }
        if cal.summer_start_month > cal.summer_end_month {
            errors.push(ConfigError::new(
                "calendar.summer_start_month",
                "must be <= calendar.summer_end_month",
            ));
        }

        validate_scheme("tou", &self.tou_table(), &self.tou_rates(), &mut errors);
        validate_scheme("ulo", &self.ulo_table(), &self.ulo_rates(), &mut errors);

        let t = &self.tiered;
        for (field, value) in [
            ("tiered.summer_threshold_kwh", t.summer_threshold_kwh),
            ("tiered.winter_threshold_kwh", t.winter_threshold_kwh),
            ("tiered.tier1_cents", t.tier1_cents),
            ("tiered.tier2_cents", t.tier2_cents),
        ] {
            if !value.is_finite() || value < 0.0 {
                errors.push(ConfigError::new(field, "must be a finite value >= 0"));
            }
        }

        errors
    }
}

fn validate_scheme(
    prefix: &str,
    table: &PeriodTable,
    rates: &RateTable,
    errors: &mut Vec<ConfigError>,
) {
    for (i, band) in table.bands().iter().enumerate() {
        if band.start_hour >= band.end_hour || band.end_hour > HOURS_PER_DAY {
            errors.push(ConfigError::new(
                format!("{prefix}.bands[{i}]"),
                format!(
                    "hours [{}, {}) must satisfy start < end <= {HOURS_PER_DAY}",
                    band.start_hour, band.end_hour
                ),
            ));
        }
    }

    for gap in table.coverage_gaps() {
        let message = if gap.matches == 0 {
            format!("{} hour {} is not covered by any band", gap.season, gap.hour)
        } else {
            format!(
                "{} hour {} is covered by {} overlapping bands",
                gap.season, gap.hour, gap.matches
            )
        };
        errors.push(ConfigError::new(format!("{prefix}.bands"), message));
    }

    let mut missing: Vec<Period> = table.periods().filter(|p| !rates.contains(*p)).collect();
    missing.sort();
    missing.dedup();
    for period in missing {
        errors.push(ConfigError::new(
            format!("{prefix}.rates"),
            format!("no rate for period `{period}` used by {prefix}.bands"),
        ));
    }

    for (period, cents) in rates.iter() {
        if !cents.is_finite() || cents < 0.0 {
            errors.push(ConfigError::new(
                format!("{prefix}.rates.{period}"),
                "must be a finite value >= 0",
            ));
        }
    }
}
