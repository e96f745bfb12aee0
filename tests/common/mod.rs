//! Shared test fixtures for integration tests.
#![allow(dead_code)]

use chrono::{DateTime, TimeDelta, TimeZone};
use chrono_tz::Tz;
use tariff_compare::billing::engine::Engine;
use tariff_compare::billing::types::Reading;
use tariff_compare::config::TariffConfig;

/// UTC instant at the top of an hour.
pub fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Tz> {
    Tz::UTC.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

/// `hours` consecutive hourly readings of `kwh` each, starting at `start`.
pub fn hourly(start: DateTime<Tz>, hours: i64, kwh: f64) -> Vec<Reading> {
    (0..hours)
        .map(|h| Reading::new(start + TimeDelta::hours(h), 3600, kwh))
        .collect()
}

/// Engine for the default `ontario` tariffs.
pub fn ontario_engine() -> Engine {
    Engine::from_config(&TariffConfig::ontario()).unwrap()
}

/// Minimal Green Button feed with the given `(start, duration, value)` readings.
pub fn green_button_feed(intervals: &[(i64, u32, i64)], multiplier: Option<i32>) -> String {
    let multiplier = multiplier
        .map(|p| format!("<espi:powerOfTenMultiplier>{p}</espi:powerOfTenMultiplier>"))
        .unwrap_or_default();
    let readings: String = intervals
        .iter()
        .map(|(start, duration, value)| {
            format!(
                "<espi:IntervalReading><espi:timePeriod><espi:duration>{duration}</espi:duration>\
                 <espi:start>{start}</espi:start></espi:timePeriod>\
                 <espi:value>{value}</espi:value></espi:IntervalReading>"
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom" xmlns:espi="http://naesb.org/espi">
  <entry><content><espi:ReadingType>
    <espi:uom>72</espi:uom>{multiplier}
  </espi:ReadingType></content></entry>
  <entry><content><espi:IntervalBlock>{readings}</espi:IntervalBlock></content></entry>
</feed>"#
    )
}

/// Unique path in the system temp dir for this test.
pub fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("tariff-compare-{}-{name}", std::process::id()))
}
