//! Temporal classifier: reading → calendar attributes → TOU and ULO periods.

use super::calendar::{CalendarAttributes, HolidayCalendar, SeasonCalendar};
use super::period::PeriodTable;
use super::types::{ClassifiedReading, Reading};
use crate::error::Result;

/// Assigns pricing periods to readings.
///
/// Classification is per reading and stateless, so readings may be
/// classified in any order.
#[derive(Debug, Clone)]
pub struct Classifier {
    tou: PeriodTable,
    ulo: PeriodTable,
    seasons: SeasonCalendar,
    holidays: HolidayCalendar,
}

impl Classifier {
    pub fn new(
        tou: PeriodTable,
        ulo: PeriodTable,
        seasons: SeasonCalendar,
        holidays: HolidayCalendar,
    ) -> Self {
        Self {
            tou,
            ulo,
            seasons,
            holidays,
        }
    }

    pub fn holidays(&self) -> &HolidayCalendar {
        &self.holidays
    }

    /// Classifies one reading in the timezone its start time carries.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UncoveredHour`] if a period table has no band
    /// for the reading's hour.
    pub fn classify(&self, reading: &Reading) -> Result<ClassifiedReading> {
        let attrs = CalendarAttributes::derive(&reading.start_time, &self.seasons, &self.holidays);
        let working_day = attrs.is_working_day();
        let tou_period = self
            .tou
            .classify(attrs.season, attrs.hour_of_day, working_day)?;
        let ulo_period = self
            .ulo
            .classify(attrs.season, attrs.hour_of_day, working_day)?;

        Ok(ClassifiedReading {
            reading: reading.clone(),
            month_key: attrs.month_key,
            month: attrs.month,
            hour_of_day: attrs.hour_of_day,
            day_of_week: attrs.day_of_week,
            is_weekend: attrs.is_weekend,
            is_holiday: attrs.is_holiday,
            season: attrs.season,
            tou_period,
            ulo_period,
        })
    }

    /// Classifies every reading, preserving input order.
    ///
    /// # Errors
    ///
    /// Fails on the first reading that cannot be classified.
    pub fn classify_all(&self, readings: &[Reading]) -> Result<Vec<ClassifiedReading>> {
        readings.iter().map(|r| self.classify(r)).collect()
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(
            PeriodTable::ontario_tou(),
            PeriodTable::ontario_ulo(),
            SeasonCalendar::default(),
            HolidayCalendar::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone};
    use chrono_tz::Tz;

    use super::*;
    use crate::billing::types::{MonthKey, Period, Season};

    fn reading_at(y: i32, m: u32, d: u32, h: u32) -> Reading {
        let start = Tz::UTC.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap();
        Reading::new(start, 3600, 1.0)
    }

    #[test]
    fn weekend_is_off_peak_in_every_month_and_hour() {
        let classifier = Classifier::default();
        // First Saturday of each month of 2023.
        let saturdays = [7, 4, 4, 1, 6, 3, 1, 5, 2, 7, 4, 2];
        for (month, day) in (1..=12).zip(saturdays) {
            for hour in 0..24 {
                let c = classifier.classify(&reading_at(2023, month, day, hour)).unwrap();
                assert!(c.is_weekend, "2023-{month:02}-{day:02} should be a weekend");
                assert_eq!(c.tou_period, Period::OffPeak);
                assert_eq!(c.ulo_period, Period::OffPeak);
            }
        }
    }

    #[test]
    fn summer_weekday_morning_is_tou_on_peak() {
        let classifier = Classifier::default();
        // Wednesday 2023-08-30 08:00.
        let c = classifier.classify(&reading_at(2023, 8, 30, 8)).unwrap();
        assert_eq!(c.season, Season::Summer);
        assert_eq!(c.month_key, MonthKey::new(2023, 8));
        assert_eq!(c.tou_period, Period::OnPeak);
        assert_eq!(c.ulo_period, Period::MidPeak);
    }

    #[test]
    fn winter_weekday_midday_is_tou_on_peak() {
        let classifier = Classifier::default();
        // Wednesday 2023-12-13 12:00.
        let c = classifier.classify(&reading_at(2023, 12, 13, 12)).unwrap();
        assert_eq!(c.season, Season::Winter);
        assert_eq!(c.tou_period, Period::OnPeak);
        assert_eq!(c.ulo_period, Period::MidPeak);
    }

    #[test]
    fn weekday_overnight_is_ulo() {
        let classifier = Classifier::default();
        let c = classifier.classify(&reading_at(2023, 12, 13, 2)).unwrap();
        assert_eq!(c.tou_period, Period::OffPeak);
        assert_eq!(c.ulo_period, Period::Ulo);
    }

    #[test]
    fn holiday_is_billed_like_a_weekend() {
        let christmas = NaiveDate::from_ymd_opt(2023, 12, 25).unwrap();
        let classifier = Classifier::new(
            PeriodTable::ontario_tou(),
            PeriodTable::ontario_ulo(),
            SeasonCalendar::default(),
            HolidayCalendar::new([christmas]),
        );
        // Monday 2023-12-25 17:00 would be ULO on-peak on a working day.
        let c = classifier.classify(&reading_at(2023, 12, 25, 17)).unwrap();
        assert!(c.is_holiday);
        assert!(!c.is_weekend);
        assert_eq!(c.tou_period, Period::OffPeak);
        assert_eq!(c.ulo_period, Period::OffPeak);
    }

    #[test]
    fn classify_all_keeps_order() {
        let classifier = Classifier::default();
        let readings = vec![reading_at(2023, 9, 5, 3), reading_at(2023, 9, 5, 1)];
        let classified = classifier.classify_all(&readings).unwrap();
        assert_eq!(classified[0].hour_of_day, 3);
        assert_eq!(classified[1].hour_of_day, 1);
    }
}
