//! Usage import and report export.

pub mod export;
pub mod green_button;
pub mod interval_csv;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono_tz::Tz;

use crate::billing::types::Reading;
use crate::error::Result;

/// Supported usage file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Green Button ESPI XML.
    Xml,
    /// Normalized interval CSV.
    Csv,
}

impl InputFormat {
    /// Guesses the format from the file extension; anything but `.csv` is XML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Csv,
            _ => Self::Xml,
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Xml => "xml",
            Self::Csv => "csv",
        })
    }
}

impl FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xml" | "green-button" | "green_button" => Ok(Self::Xml),
            "csv" => Ok(Self::Csv),
            other => Err(format!("unknown input format \"{other}\", expected \"xml\" or \"csv\"")),
        }
    }
}

/// Loads readings from `path`, choosing the parser by `format` or extension.
///
/// # Errors
///
/// Propagates I/O, XML, and malformed-reading errors from the parser.
pub fn load_readings(path: &Path, format: Option<InputFormat>, tz: Tz) -> Result<Vec<Reading>> {
    match format.unwrap_or_else(|| InputFormat::from_path(path)) {
        InputFormat::Xml => green_button::load(path, tz),
        InputFormat::Csv => interval_csv::load(path, tz),
    }
}
