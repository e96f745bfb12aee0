//! REST API over a finished comparison report.
//!
//! Provides two GET endpoints:
//! - `/summary`: totals, months won per scheme, and every monthly summary
//! - `/months`: monthly summaries with optional `YYYY-MM` range filtering

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use chrono_tz::Tz;
use tracing::info;

use crate::billing::report::ComparisonReport;
use crate::billing::tiered::TieredMethod;

pub use types::{ErrorResponse, MonthsQuery, SummaryResponse};

/// Immutable application state shared across all request handlers.
///
/// Built once after the comparison completes; all data is read-only.
pub struct AppState {
    pub report: ComparisonReport,
    /// Timezone readings were classified in.
    pub timezone: Tz,
    pub tiered_method: TieredMethod,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/summary", get(handlers::get_summary))
        .route("/months", get(handlers::get_months))
        .with_state(state)
}

/// Binds to `addr` and serves the API until the process exits.
///
/// # Errors
///
/// Returns the I/O error if binding or serving fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
