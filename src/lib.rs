//! Compare monthly electricity bills under time-of-use, ultra-low-overnight,
//! and tiered pricing from interval usage data.

#[cfg(feature = "api")]
pub mod api;
/// Classification, pricing, tier accumulation, and monthly aggregation.
pub mod billing;
pub mod config;
pub mod demo;
pub mod error;
pub mod io;
#[cfg(feature = "tui")]
pub mod tui;

pub use error::{Error, Result};
