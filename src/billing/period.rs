//! Declarative hour-band tables mapping local hours to pricing periods.
//!
//! Each scheme owns a [`PeriodTable`]: an ordered list of half-open
//! `[start_hour, end_hour)` bands, optionally restricted to one season, plus
//! the label used on weekends and holidays. Tariff edits change the table,
//! not the code.

use serde::{Deserialize, Serialize};

use super::types::{Period, Scheme, Season};
use crate::error::{Error, Result};

/// Hours in a day; bands end at most here.
pub const HOURS_PER_DAY: u32 = 24;

/// One half-open hour range and the period it is billed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HourBand {
    /// First hour covered (inclusive, 0-23).
    pub start_hour: u32,
    /// First hour not covered (exclusive, 1-24).
    pub end_hour: u32,
    pub period: Period,
    /// Season the band applies to; `None` means year round.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<Season>,
}

impl HourBand {
    /// Year-round band.
    pub const fn new(start_hour: u32, end_hour: u32, period: Period) -> Self {
        Self {
            start_hour,
            end_hour,
            period,
            season: None,
        }
    }

    /// Band restricted to `season`.
    pub const fn seasonal(season: Season, start_hour: u32, end_hour: u32, period: Period) -> Self {
        Self {
            start_hour,
            end_hour,
            period,
            season: Some(season),
        }
    }

    pub fn contains(&self, hour: u32) -> bool {
        (self.start_hour..self.end_hour).contains(&hour)
    }

    pub fn applies_to(&self, season: Season) -> bool {
        self.season.is_none_or(|s| s == season)
    }
}

/// An hour of a season that is not covered exactly once by a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverageGap {
    pub season: Season,
    pub hour: u32,
    /// Number of bands covering the hour (0 = gap, >1 = overlap).
    pub matches: usize,
}

/// Period classification table for one scheme.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodTable {
    scheme: Scheme,
    bands: Vec<HourBand>,
    non_working_day: Period,
}

impl PeriodTable {
    pub fn new(scheme: Scheme, bands: Vec<HourBand>, non_working_day: Period) -> Self {
        Self {
            scheme,
            bands,
            non_working_day,
        }
    }

    /// Ontario-style TOU bands; the summer and winter peaks are swapped.
    pub fn ontario_tou() -> Self {
        Self::new(Scheme::Tou, default_tou_bands(), Period::OffPeak)
    }

    /// Ontario-style ULO bands, identical in both seasons.
    pub fn ontario_ulo() -> Self {
        Self::new(Scheme::Ulo, default_ulo_bands(), Period::OffPeak)
    }

    pub fn bands(&self) -> &[HourBand] {
        &self.bands
    }

    /// Returns the period for an interval starting at `hour`.
    ///
    /// Non-working days (weekends, holidays) always bill at the
    /// non-working-day label regardless of season and hour.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UncoveredHour`] if no band covers `hour` in `season`.
    pub fn classify(&self, season: Season, hour: u32, working_day: bool) -> Result<Period> {
        if !working_day {
            return Ok(self.non_working_day);
        }
        self.bands
            .iter()
            .find(|band| band.applies_to(season) && band.contains(hour))
            .map(|band| band.period)
            .ok_or(Error::UncoveredHour {
                scheme: self.scheme,
                season,
                hour,
            })
    }

    /// Lists every (season, hour) not covered by exactly one band.
    ///
    /// An empty result means the table is total and non-overlapping.
    pub fn coverage_gaps(&self) -> Vec<CoverageGap> {
        let mut gaps = Vec::new();
        for season in Season::ALL {
            for hour in 0..HOURS_PER_DAY {
                let matches = self
                    .bands
                    .iter()
                    .filter(|band| band.applies_to(season) && band.contains(hour))
                    .count();
                if matches != 1 {
                    gaps.push(CoverageGap {
                        season,
                        hour,
                        matches,
                    });
                }
            }
        }
        gaps
    }

    /// Every period label this table can produce.
    pub fn periods(&self) -> impl Iterator<Item = Period> + '_ {
        self.bands
            .iter()
            .map(|band| band.period)
            .chain(std::iter::once(self.non_working_day))
    }
}

/// Weekday TOU bands: summer peaks in the morning and evening, winter at midday.
pub fn default_tou_bands() -> Vec<HourBand> {
    use Period::{MidPeak, OffPeak, OnPeak};
    use Season::{Summer, Winter};

    vec![
        HourBand::seasonal(Summer, 0, 7, OffPeak),
        HourBand::seasonal(Summer, 7, 11, OnPeak),
        HourBand::seasonal(Summer, 11, 17, MidPeak),
        HourBand::seasonal(Summer, 17, 19, OnPeak),
        HourBand::seasonal(Summer, 19, 24, OffPeak),
        HourBand::seasonal(Winter, 0, 7, OffPeak),
        HourBand::seasonal(Winter, 7, 11, MidPeak),
        HourBand::seasonal(Winter, 11, 17, OnPeak),
        HourBand::seasonal(Winter, 17, 19, MidPeak),
        HourBand::seasonal(Winter, 19, 24, OffPeak),
    ]
}

/// Weekday ULO bands.
pub fn default_ulo_bands() -> Vec<HourBand> {
    use Period::{MidPeak, OnPeak, Ulo};

    vec![
        HourBand::new(0, 7, Ulo),
        HourBand::new(7, 16, MidPeak),
        HourBand::new(16, 21, OnPeak),
        HourBand::new(21, 23, MidPeak),
        HourBand::new(23, 24, Ulo),
    ]
}
