use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use tariff_compare::billing::tiered::TieredMethod;
use tariff_compare::io::InputFormat;

/// Compare monthly electricity bills under TOU, ULO, and tiered pricing.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Usage export: Green Button XML or interval CSV.
    #[clap(long, short = 'i', required_unless_present = "demo", conflicts_with = "demo")]
    pub input: Option<PathBuf>,

    /// Input format; guessed from the file extension when omitted.
    #[clap(long)]
    pub format: Option<InputFormat>,

    /// Generate synthetic hourly usage instead of reading a file.
    #[clap(long)]
    pub demo: bool,

    /// Days of synthetic usage.
    #[clap(long, default_value = "90", requires = "demo")]
    pub days: u32,

    /// Seed for synthetic usage.
    #[clap(long, default_value = "42", requires = "demo")]
    pub seed: u64,

    /// First day of synthetic usage.
    #[clap(long, default_value = "2023-09-01", requires = "demo")]
    pub start: NaiveDate,

    /// Tariff configuration file (TOML).
    #[clap(long, conflicts_with = "preset")]
    pub tariff: Option<PathBuf>,

    /// Built-in tariff preset.
    #[clap(long, default_value = "ontario")]
    pub preset: String,

    /// Override the configured timezone (IANA name).
    #[clap(long)]
    pub timezone: Option<String>,

    /// Override the tiered method: `sequential` or `whole_month`.
    #[clap(long)]
    pub tiered_method: Option<TieredMethod>,

    /// Write monthly summaries to this CSV file.
    #[clap(long)]
    pub report_out: Option<PathBuf>,

    /// Also print kWh per period and tier for each month.
    #[clap(long)]
    pub breakdown: bool,

    /// Log at debug level unless `RUST_LOG` says otherwise.
    #[clap(long, short = 'v')]
    pub verbose: bool,

    /// Serve the report over HTTP after printing it.
    #[cfg(feature = "api")]
    #[clap(long)]
    pub serve: bool,

    /// API server port.
    #[cfg(feature = "api")]
    #[clap(long, default_value = "3000")]
    pub port: u16,

    /// Browse the report in the terminal.
    #[cfg(feature = "tui")]
    #[clap(long)]
    pub tui: bool,
}
