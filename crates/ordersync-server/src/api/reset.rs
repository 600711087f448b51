//! GET /reset_all_sheets: rebuild every monthly sheet from Shopify.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Extension, Json,
};
use ordersync_engine::{ResetRequest, ResetSummary};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_sync_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Default, Deserialize)]
pub(super) struct ResetParams {
    #[serde(alias = "start")]
    updated_at_min: Option<String>,
    #[serde(alias = "end")]
    updated_at_max: Option<String>,
    #[serde(alias = "simulate")]
    fake_insertion: Option<String>,
}

fn truthy(value: Option<&str>) -> bool {
    value.is_some_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"))
}

pub(super) async fn reset_all_sheets(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
    Query(params): Query<ResetParams>,
) -> Result<Json<ApiResponse<ResetSummary>>, ApiError> {
    let secret = headers
        .get("password")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();

    let request = ResetRequest {
        secret,
        start: params.updated_at_min,
        end: params.updated_at_max,
        simulate: truthy(params.fake_insertion.as_deref()),
    };

    let summary = state
        .reset
        .run(request)
        .await
        .map_err(|e| map_sync_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: summary,
        meta: ResponseMeta::new(req_id.0),
    }))
}
