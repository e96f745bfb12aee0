//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;

use super::AppState;
use super::types::{ErrorResponse, MonthsQuery, SummaryResponse};
use crate::billing::types::{MonthKey, MonthlySummary};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(error: String) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error }))
}

fn parse_bound(name: &str, raw: Option<&str>) -> Result<Option<MonthKey>, ApiError> {
    raw.map(|s| {
        s.parse::<MonthKey>()
            .map_err(|e| bad_request(format!("invalid `{name}`: {e}")))
    })
    .transpose()
}

/// Returns totals, months won per scheme, and all monthly summaries.
///
/// `GET /summary` → 200 + `SummaryResponse` JSON
pub async fn get_summary(State(state): State<Arc<AppState>>) -> Json<SummaryResponse> {
    Json(SummaryResponse::new(
        &state.report,
        state.timezone.name().to_string(),
        state.tiered_method,
    ))
}

/// Returns monthly summaries, optionally filtered by month range.
///
/// `GET /months` → 200 + `Vec<MonthlySummary>` JSON
/// `GET /months?from=2023-10&to=2023-12` → filtered range (inclusive)
/// `GET /months?from=2023-12&to=2023-10` → 400 + `ErrorResponse`
pub async fn get_months(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MonthsQuery>,
) -> Result<Json<Vec<MonthlySummary>>, ApiError> {
    let from = parse_bound("from", query.from.as_deref())?;
    let to = parse_bound("to", query.to.as_deref())?;

    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(bad_request(format!(
                "`from` ({from}) must be <= `to` ({to})"
            )));
        }
    }

    let months: Vec<MonthlySummary> = state
        .report
        .months
        .iter()
        .filter(|m| from.is_none_or(|f| m.month >= f) && to.is_none_or(|t| m.month <= t))
        .cloned()
        .collect();

    Ok(Json(months))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use chrono_tz::Tz;
    use tower::util::ServiceExt;

    use super::*;
    use crate::api::router;
    use crate::billing::report::ComparisonReport;
    use crate::billing::tiered::TieredMethod;
    use crate::billing::types::{PeriodUsage, Scheme};

    fn make_test_state() -> Arc<AppState> {
        let months = (1..=6)
            .map(|m| MonthlySummary {
                month: MonthKey::new(2024, m),
                total_kwh: 700.0,
                tou_cost: 70.0,
                ulo_cost: 68.0,
                tiered_cost: 75.0,
                best_scheme: Scheme::Ulo,
                worst_scheme: Scheme::Tiered,
                reading_count: 720,
                tier1_kwh: 700.0,
                tier2_kwh: 0.0,
                tou_usage: PeriodUsage::default(),
                ulo_usage: PeriodUsage::default(),
            })
            .collect();
        Arc::new(AppState {
            report: ComparisonReport::from_months(months),
            timezone: Tz::UTC,
            tiered_method: TieredMethod::Sequential,
        })
    }

    async fn get(uri: &str) -> (StatusCode, serde_json::Value) {
        let app = router(make_test_state());
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn summary_returns_200() {
        let (status, json) = get("/summary").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["timezone"], "UTC");
        assert_eq!(json["tiered_method"], "sequential");
        assert_eq!(json["totals"]["best_scheme"], "ULO");
        assert_eq!(json["months_won"]["ULO"], 6);
        assert_eq!(json["months"].as_array().map(Vec::len), Some(6));
    }

    #[tokio::test]
    async fn months_returns_all() {
        let (status, json) = get("/months").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().map(Vec::len), Some(6));
        assert_eq!(json[0]["month"], "2024-01");
    }

    #[tokio::test]
    async fn months_range_query() {
        let (status, json) = get("/months?from=2024-02&to=2024-04").await;
        assert_eq!(status, StatusCode::OK);
        let months = json.as_array().unwrap();
        assert_eq!(months.len(), 3);
        assert_eq!(months[0]["month"], "2024-02");
        assert_eq!(months[2]["month"], "2024-04");
    }

    #[tokio::test]
    async fn months_open_ended_range() {
        let (_, json) = get("/months?from=2024-05").await;
        assert_eq!(json.as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn months_invalid_range_returns_400() {
        let (status, json) = get("/months?from=2024-05&to=2024-02").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json.get("error").is_some());
    }

    #[tokio::test]
    async fn months_unparsable_bound_returns_400() {
        let (status, json) = get("/months?to=May").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("`to`"));
    }
}
