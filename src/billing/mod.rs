pub mod aggregate;
pub mod calendar;
pub mod classify;
pub mod engine;
pub mod period;
pub mod rates;
pub mod report;
pub mod tiered;
pub mod types;
