//! Green Button (ESPI) usage feed import.
//!
//! The feed is an Atom document whose entries carry one `ReadingType` and
//! any number of `IntervalBlock`s. Only three things matter for billing:
//! the `powerOfTenMultiplier` of the reading type and, per
//! `IntervalReading`, the `timePeriod/start`, `timePeriod/duration` and
//! `value` elements. Namespaces are ignored; elements are matched by local
//! name.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::DateTime;
use chrono_tz::Tz;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use tracing::{debug, info, warn};

use crate::billing::types::Reading;
use crate::error::{Error, Result};

/// One `IntervalReading` as it appears in the feed, before scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInterval {
    /// Unix seconds.
    pub start: i64,
    /// Seconds.
    pub duration: u32,
    /// Integer value in units of `10^powerOfTenMultiplier` Wh.
    pub value: i64,
}

/// Parsed contents of a usage feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsageFeed {
    /// Direct children of `ReadingType`, by local name.
    pub reading_type: BTreeMap<String, String>,
    /// Every `IntervalReading`, in document order.
    pub intervals: Vec<RawInterval>,
}

impl UsageFeed {
    /// Decimal exponent applied to every interval value; 0 when absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedReading`] if the field is not an integer.
    pub fn power_of_ten_multiplier(&self) -> Result<i32> {
        match self.reading_type.get("powerOfTenMultiplier") {
            None => Ok(0),
            Some(raw) => raw.parse().map_err(|_| {
                Error::malformed(
                    "ReadingType/powerOfTenMultiplier",
                    format!("expected an integer, got \"{raw}\""),
                )
            }),
        }
    }

    /// Scales values to kWh and converts start times into `tz`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedReading`] for negative values or start
    /// times outside the representable range.
    pub fn to_readings(&self, tz: Tz) -> Result<Vec<Reading>> {
        let scale = 10f64.powi(self.power_of_ten_multiplier()?) / 1000.0;
        self.intervals
            .iter()
            .enumerate()
            .map(|(i, raw)| {
                let location = format!("IntervalReading #{}", i + 1);
                if raw.value < 0 {
                    return Err(Error::malformed(
                        location,
                        format!("negative value {}", raw.value),
                    ));
                }
                let start = DateTime::from_timestamp(raw.start, 0).ok_or_else(|| {
                    Error::malformed(location, format!("start {} out of range", raw.start))
                })?;
                Ok(Reading::new(
                    start.with_timezone(&tz),
                    raw.duration,
                    raw.value as f64 * scale,
                ))
            })
            .collect()
    }
}

#[derive(Debug, Default)]
struct PartialInterval {
    start: Option<i64>,
    duration: Option<u32>,
    value: Option<i64>,
}

impl PartialInterval {
    fn finish(self, index: usize) -> Result<RawInterval> {
        let location = || format!("IntervalReading #{index}");
        Ok(RawInterval {
            start: self
                .start
                .ok_or_else(|| Error::malformed(location(), "missing timePeriod/start"))?,
            duration: self
                .duration
                .ok_or_else(|| Error::malformed(location(), "missing timePeriod/duration"))?,
            value: self
                .value
                .ok_or_else(|| Error::malformed(location(), "missing value"))?,
        })
    }
}

fn parse_field<T: std::str::FromStr>(text: &str, index: usize, field: &str) -> Result<T> {
    text.parse().map_err(|_| {
        Error::malformed(
            format!("IntervalReading #{index}"),
            format!("{field} \"{text}\" is not an integer"),
        )
    })
}

/// Parses a usage feed from any buffered reader.
///
/// # Errors
///
/// Returns [`Error::Xml`] for malformed XML and [`Error::MalformedReading`]
/// for an `IntervalReading` missing a field or carrying a non-integer.
///
/// Only the first `ReadingType` in the document is kept; later ones are
/// skipped with a warning.
pub fn parse_reader<R: BufRead>(reader: R) -> Result<UsageFeed> {
    let mut xml = Reader::from_reader(reader);
    xml.config_mut().trim_text(true);

    let mut feed = UsageFeed::default();
    let mut path: Vec<String> = Vec::new();
    let mut current: Option<PartialInterval> = None;
    let mut reading_types = 0usize;
    let mut buf = Vec::new();

    loop {
        let event = xml.read_event_into(&mut buf).map_err(|e| {
            Error::Xml(format!("at byte {}: {e}", xml.buffer_position()))
        })?;
        match event {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if name == "IntervalReading" {
                    current = Some(PartialInterval::default());
                } else if name == "ReadingType" {
                    reading_types += 1;
                    if reading_types > 1 {
                        warn!(
                            ordinal = reading_types,
                            "skipping extra ReadingType; the first one sets the multiplier"
                        );
                    }
                }
                path.push(name);
            }
            Event::End(_) => {
                if path.pop().as_deref() == Some("IntervalReading") {
                    if let Some(partial) = current.take() {
                        let index = feed.intervals.len() + 1;
                        feed.intervals.push(partial.finish(index)?);
                    }
                }
            }
            Event::Text(t) => {
                let text = t.unescape().map_err(|e| Error::Xml(e.to_string()))?;
                let text = text.trim();
                let n = path.len();
                let leaf = path.last();
                let parent = n.checked_sub(2).and_then(|i| path.get(i));
                let grandparent = n.checked_sub(3).and_then(|i| path.get(i));
                let index = feed.intervals.len() + 1;

                if let (Some(leaf), Some(parent)) = (leaf, parent) {
                    if parent == "ReadingType" {
                        if reading_types == 1 {
                            feed.reading_type.insert(leaf.clone(), text.to_string());
                        }
                    } else if let Some(partial) = current.as_mut() {
                        let in_reading = grandparent.is_some_and(|g| g == "IntervalReading");
                        match (leaf.as_str(), parent.as_str()) {
                            ("value", "IntervalReading") => {
                                partial.value = Some(parse_field(text, index, "value")?);
                            }
                            ("start", "timePeriod") if in_reading => {
                                partial.start = Some(parse_field(text, index, "start")?);
                            }
                            ("duration", "timePeriod") if in_reading => {
                                partial.duration = Some(parse_field(text, index, "duration")?);
                            }
                            _ => {}
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    debug!(intervals = feed.intervals.len(), "usage feed parsed");
    Ok(feed)
}

/// Parses a usage feed held in memory.
///
/// # Errors
///
/// See [`parse_reader`].
pub fn parse_str(xml: &str) -> Result<UsageFeed> {
    parse_reader(xml.as_bytes())
}

/// Loads a usage feed from disk and converts it into readings in `tz`.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened, plus any parse or
/// conversion error.
pub fn load(path: &Path, tz: Tz) -> Result<Vec<Reading>> {
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let feed = parse_reader(BufReader::new(file))?;

    for (field, value) in &feed.reading_type {
        info!(field = %field, value = %value, "ReadingType");
    }
    let readings = feed.to_readings(tz)?;
    info!(
        path = %path.display(),
        readings = readings.len(),
        multiplier = feed.power_of_ten_multiplier()?,
        "loaded Green Button feed"
    );
    Ok(readings)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::{TimeZone, Timelike};

    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom" xmlns:espi="http://naesb.org/espi">
  <entry>
    <content>
      <espi:ReadingType>
        <espi:accumulationBehaviour>4</espi:accumulationBehaviour>
        <espi:uom>72</espi:uom>
        <espi:powerOfTenMultiplier>0</espi:powerOfTenMultiplier>
        <espi:intervalLength>3600</espi:intervalLength>
      </espi:ReadingType>
    </content>
  </entry>
  <entry>
    <content>
      <espi:IntervalBlock>
        <espi:interval>
          <espi:duration>7200</espi:duration>
          <espi:start>1692849600</espi:start>
        </espi:interval>
        <espi:IntervalReading>
          <espi:timePeriod>
            <espi:duration>3600</espi:duration>
            <espi:start>1692849600</espi:start>
          </espi:timePeriod>
          <espi:value>1250</espi:value>
        </espi:IntervalReading>
        <espi:IntervalReading>
          <espi:cost>12</espi:cost>
          <espi:timePeriod>
            <espi:duration>3600</espi:duration>
            <espi:start>1692853200</espi:start>
          </espi:timePeriod>
          <espi:value>400</espi:value>
        </espi:IntervalReading>
      </espi:IntervalBlock>
    </content>
  </entry>
</feed>"#;

    #[test]
    fn parses_reading_type_and_intervals() {
        let feed = parse_str(FEED).unwrap();
        assert_eq!(feed.reading_type.get("uom").map(String::as_str), Some("72"));
        assert_eq!(feed.power_of_ten_multiplier().unwrap(), 0);
        assert_eq!(
            feed.intervals,
            vec![
                RawInterval {
                    start: 1_692_849_600,
                    duration: 3600,
                    value: 1250
                },
                RawInterval {
                    start: 1_692_853_200,
                    duration: 3600,
                    value: 400
                },
            ]
        );
    }

    #[test]
    fn first_reading_type_sets_the_multiplier() {
        let xml = "<feed>\
                   <ReadingType><uom>72</uom><powerOfTenMultiplier>0</powerOfTenMultiplier></ReadingType>\
                   <ReadingType><powerOfTenMultiplier>3</powerOfTenMultiplier><currency>124</currency></ReadingType>\
                   <IntervalReading><timePeriod><duration>3600</duration>\
                   <start>0</start></timePeriod><value>500</value></IntervalReading></feed>";
        let feed = parse_str(xml).unwrap();
        assert_eq!(feed.power_of_ten_multiplier().unwrap(), 0);
        assert_eq!(feed.reading_type.get("uom").map(String::as_str), Some("72"));
        assert!(!feed.reading_type.contains_key("currency"));

        let readings = feed.to_readings(Tz::UTC).unwrap();
        assert_abs_diff_eq!(readings[0].energy_kwh, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn block_interval_is_not_a_reading() {
        let feed = parse_str(FEED).unwrap();
        assert_eq!(feed.intervals.len(), 2);
    }

    #[test]
    fn values_are_scaled_from_wh() {
        let readings = parse_str(FEED).unwrap().to_readings(Tz::UTC).unwrap();
        assert_abs_diff_eq!(readings[0].energy_kwh, 1.25, epsilon = 1e-12);
        assert_abs_diff_eq!(readings[1].energy_kwh, 0.4, epsilon = 1e-12);
        assert_eq!(
            readings[0].start_time,
            Tz::UTC.with_ymd_and_hms(2023, 8, 24, 4, 0, 0).unwrap()
        );
    }

    #[test]
    fn multiplier_scales_values() {
        let mut feed = parse_str(FEED).unwrap();
        feed.reading_type
            .insert("powerOfTenMultiplier".to_string(), "-3".to_string());
        let readings = feed.to_readings(Tz::UTC).unwrap();
        assert_abs_diff_eq!(readings[0].energy_kwh, 0.00125, epsilon = 1e-12);
    }

    #[test]
    fn missing_multiplier_defaults_to_zero() {
        let mut feed = parse_str(FEED).unwrap();
        feed.reading_type.remove("powerOfTenMultiplier");
        assert_eq!(feed.power_of_ten_multiplier().unwrap(), 0);
    }

    #[test]
    fn start_times_follow_timezone() {
        let readings = parse_str(FEED)
            .unwrap()
            .to_readings(chrono_tz::America::Toronto)
            .unwrap();
        // 04:00 UTC is 00:00 EDT.
        assert_eq!(readings[0].start_time.hour(), 0);
    }

    #[test]
    fn missing_value_is_malformed() {
        let xml = "<feed><IntervalReading><timePeriod><duration>3600</duration>\
                   <start>0</start></timePeriod></IntervalReading></feed>";
        let err = parse_str(xml).unwrap_err();
        assert!(matches!(err, Error::MalformedReading { .. }));
        assert!(err.to_string().contains("missing value"));
    }

    #[test]
    fn non_integer_value_is_malformed() {
        let xml = "<feed><IntervalReading><timePeriod><duration>3600</duration>\
                   <start>0</start></timePeriod><value>abc</value></IntervalReading></feed>";
        assert!(matches!(
            parse_str(xml),
            Err(Error::MalformedReading { .. })
        ));
    }

    #[test]
    fn negative_value_is_rejected() {
        let xml = "<feed><IntervalReading><timePeriod><duration>3600</duration>\
                   <start>0</start></timePeriod><value>-5</value></IntervalReading></feed>";
        let feed = parse_str(xml).unwrap();
        assert!(matches!(
            feed.to_readings(Tz::UTC),
            Err(Error::MalformedReading { .. })
        ));
    }

    #[test]
    fn broken_xml_is_an_xml_error() {
        let err = parse_str("<feed><IntervalReading></feed>").unwrap_err();
        assert!(matches!(err, Error::Xml(_)));
    }
}
