//! Calendar attributes of an interval: season, weekend and holiday status.

use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Timelike, Weekday};

use super::types::{MonthKey, Season};

/// Maps months of the year to tariff seasons.
///
/// Months in `[summer_start_month, summer_end_month]` are summer, every
/// other month is winter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonCalendar {
    pub summer_start_month: u32,
    pub summer_end_month: u32,
}

impl SeasonCalendar {
    pub fn new(summer_start_month: u32, summer_end_month: u32) -> Self {
        Self {
            summer_start_month,
            summer_end_month,
        }
    }

    /// Season of a month of year (1-12).
    pub fn season_of(&self, month: u32) -> Season {
        if (self.summer_start_month..=self.summer_end_month).contains(&month) {
            Season::Summer
        } else {
            Season::Winter
        }
    }
}

impl Default for SeasonCalendar {
    /// May through October inclusive.
    fn default() -> Self {
        Self::new(5, 10)
    }
}

/// Set of local dates billed as non-working days.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayCalendar {
    dates: BTreeSet<NaiveDate>,
}

impl HolidayCalendar {
    pub fn new(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            dates: dates.into_iter().collect(),
        }
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Calendar attributes derived from an interval start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarAttributes {
    pub month_key: MonthKey,
    pub month: u32,
    pub hour_of_day: u32,
    pub day_of_week: Weekday,
    pub is_weekend: bool,
    pub is_holiday: bool,
    pub season: Season,
}

impl CalendarAttributes {
    /// Derives attributes in the timezone `time` carries.
    pub fn derive<Z: TimeZone>(
        time: &DateTime<Z>,
        seasons: &SeasonCalendar,
        holidays: &HolidayCalendar,
    ) -> Self {
        let day_of_week = time.weekday();
        let month = time.month();
        Self {
            month_key: MonthKey::of(time),
            month,
            hour_of_day: time.hour(),
            day_of_week,
            is_weekend: matches!(day_of_week, Weekday::Sat | Weekday::Sun),
            is_holiday: holidays.is_holiday(time.date_naive()),
            season: seasons.season_of(month),
        }
    }

    /// `true` on Monday-Friday that are not holidays.
    pub fn is_working_day(&self) -> bool {
        !self.is_weekend && !self.is_holiday
    }
}
