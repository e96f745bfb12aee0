//! Crate-wide error type.

use std::io;
use std::path::PathBuf;

use crate::billing::types::{Period, Scheme, Season};
use crate::config::ConfigError;

/// Errors raised while loading readings, validating tariffs, or billing.
///
/// Any error aborts the whole comparison: costs are sums over every reading,
/// so a partial result would be misleading.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A reading is missing a required field or carries an unusable value.
    #[error("malformed reading at {location}: {reason}")]
    MalformedReading {
        /// Where the reading came from (line, record index, or element path).
        location: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A period label has no rate in the scheme's rate table.
    #[error("no {scheme} rate configured for period `{period}`")]
    UnknownPeriod {
        /// Scheme whose rate table was consulted.
        scheme: Scheme,
        /// Period label that was looked up.
        period: Period,
    },

    /// No band of a period table covers the given hour.
    #[error("no {scheme} period covers hour {hour} in {season}")]
    UncoveredHour {
        /// Scheme whose period table was consulted.
        scheme: Scheme,
        /// Season that selected the bands.
        season: Season,
        /// Hour of day (0-23).
        hour: u32,
    },

    /// Tariff configuration failed validation.
    #[error("invalid tariff configuration: {}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    Config(Vec<ConfigError>),

    /// Reading or writing a file failed.
    #[error("cannot access \"{}\": {source}", path.display())]
    Io {
        /// File that was being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The usage export is not well-formed XML.
    #[error("invalid usage XML: {0}")]
    Xml(String),

    /// CSV encoding or decoding failed outside of a specific reading.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Shorthand for [`Error::MalformedReading`].
    pub fn malformed(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedReading {
            location: location.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias defaulting to the crate [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;
