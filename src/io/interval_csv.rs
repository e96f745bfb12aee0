//! Normalized interval CSV import.
//!
//! Columns: `start_time` (RFC 3339 with offset), `duration_secs`,
//! `energy_kwh`. Extra columns are ignored.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::DateTime;
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::info;

use crate::billing::types::Reading;
use crate::error::{Error, Result};

#[derive(Debug, Deserialize)]
struct Row {
    start_time: String,
    duration_secs: u32,
    energy_kwh: f64,
}

/// Reads interval rows and converts start times into `tz`.
///
/// # Errors
///
/// Returns [`Error::MalformedReading`] naming the line of the first row
/// that does not deserialize, has an unparsable timestamp, or carries
/// negative or non-finite energy.
pub fn read_readings(reader: impl Read, tz: Tz) -> Result<Vec<Reading>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut readings = Vec::new();
    for (i, row) in rdr.deserialize::<Row>().enumerate() {
        // Header occupies line 1.
        let location = format!("line {}", i + 2);
        let row = row.map_err(|e| Error::malformed(&location, e.to_string()))?;
        let start = DateTime::parse_from_rfc3339(&row.start_time).map_err(|e| {
            Error::malformed(
                &location,
                format!("start_time \"{}\": {e}", row.start_time),
            )
        })?;
        if !row.energy_kwh.is_finite() || row.energy_kwh < 0.0 {
            return Err(Error::malformed(
                location,
                format!("energy_kwh must be a finite value >= 0, got {}", row.energy_kwh),
            ));
        }
        readings.push(Reading::new(
            start.with_timezone(&tz),
            row.duration_secs,
            row.energy_kwh,
        ));
    }
    Ok(readings)
}

/// Loads an interval CSV file.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened, plus any row error
/// from [`read_readings`].
pub fn load(path: &Path, tz: Tz) -> Result<Vec<Reading>> {
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let readings = read_readings(file, tz)?;
    info!(path = %path.display(), readings = readings.len(), "loaded interval CSV");
    Ok(readings)
}
