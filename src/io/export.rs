//! CSV export for monthly comparison summaries.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::billing::report::ComparisonReport;
use crate::billing::types::MonthlySummary;
use crate::error::{Error, Result};

/// Column header for the monthly summary export.
const HEADER: &str = "month,total_kwh,tou_cost,ulo_cost,tiered_cost,best_scheme,\
                      worst_scheme,reading_count,tier1_kwh,tier2_kwh";

/// Exports the report's monthly summaries to a CSV file at `path`.
///
/// Writes a header row followed by one row per month in chronological
/// order. Output is deterministic for identical inputs.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be created and [`Error::Csv`]
/// if writing fails.
pub fn export_csv(report: &ComparisonReport, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_csv(&report.months, io::BufWriter::new(file))
}

/// Writes monthly summaries as CSV to any writer.
///
/// # Errors
///
/// Returns [`Error::Csv`] if writing fails.
pub fn write_csv(months: &[MonthlySummary], writer: impl Write) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for m in months {
        wtr.write_record(&[
            m.month.to_string(),
            format!("{:.3}", m.total_kwh),
            format!("{:.2}", m.tou_cost),
            format!("{:.2}", m.ulo_cost),
            format!("{:.2}", m.tiered_cost),
            m.best_scheme.to_string(),
            m.worst_scheme.to_string(),
            m.reading_count.to_string(),
            format!("{:.3}", m.tier1_kwh),
            format!("{:.3}", m.tier2_kwh),
        ])?;
    }

    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}
