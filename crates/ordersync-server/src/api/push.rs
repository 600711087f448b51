//! POST /push_order: order-creation webhook from Shopify.

use axum::{body::Bytes, extract::State, http::HeaderMap, Extension, Json};
use ordersync_engine::PushReport;
use ordersync_shopify::ShopifyOrder;

use crate::middleware::RequestId;

use super::{map_sync_error, ApiError, ApiResponse, AppState, ResponseMeta};

pub(super) async fn push_order(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ApiResponse<PushReport>>, ApiError> {
    let shop_domain = headers
        .get("x-shopify-shop-domain")
        .and_then(|v| v.to_str().ok());

    // Untrusted callers get 403 whatever they send.
    state
        .push
        .authorize(shop_domain)
        .map_err(|e| map_sync_error(req_id.0.clone(), &e))?;

    let order: ShopifyOrder = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!(error = %e, "push_order: body is not an order");
        ApiError::new(req_id.0.clone(), "bad_request", "body is not a valid order")
    })?;

    let report = state
        .push
        .run(shop_domain, &order)
        .await
        .map_err(|e| map_sync_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: report,
        meta: ResponseMeta::new(req_id.0),
    }))
}
