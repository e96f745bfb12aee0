//! API response and query types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::billing::report::{ComparisonReport, Totals};
use crate::billing::tiered::TieredMethod;
use crate::billing::types::{MonthlySummary, Scheme};

/// Whole-report response for `GET /summary`.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    /// IANA timezone the readings were classified in.
    pub timezone: String,
    pub tiered_method: TieredMethod,
    pub totals: Totals,
    /// Number of months each scheme was cheapest.
    pub months_won: BTreeMap<Scheme, usize>,
    pub months: Vec<MonthlySummary>,
}

impl SummaryResponse {
    pub fn new(report: &ComparisonReport, timezone: String, tiered_method: TieredMethod) -> Self {
        Self {
            timezone,
            tiered_method,
            totals: report.totals.clone(),
            months_won: Scheme::ALL
                .into_iter()
                .map(|s| (s, report.months_won(s)))
                .collect(),
            months: report.months.clone(),
        }
    }
}

/// Optional month range for `GET /months`, both ends inclusive.
///
/// Kept as strings so that malformed values get a JSON error body.
#[derive(Debug, Deserialize)]
pub struct MonthsQuery {
    /// First month, `YYYY-MM`.
    pub from: Option<String>,
    /// Last month, `YYYY-MM`.
    pub to: Option<String>,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
