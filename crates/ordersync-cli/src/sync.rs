//! Reset and push handlers for the CLI.
//!
//! Both run the same orchestrators as the HTTP service, with the secret and
//! shop domain taken from the loaded config instead of request headers.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use ordersync_engine::{
    DocumentStore, OrderSource, PushOrchestrator, PushReport, ResetOrchestrator, ResetRequest,
    ResetSummary, SyncSettings,
};
use ordersync_shopify::ShopifyOrder;
use tokio::io::AsyncReadExt;

/// Runs a reset authenticated with the configured secret.
///
/// # Errors
///
/// Returns an error if the reset fails; the message names the failed phase
/// and months.
pub(crate) async fn run_reset(
    source: Arc<dyn OrderSource>,
    store: Arc<dyn DocumentStore>,
    settings: Arc<SyncSettings>,
    start: Option<String>,
    end: Option<String>,
    simulate: bool,
) -> anyhow::Result<ResetSummary> {
    let request = ResetRequest {
        secret: settings.reset_secret.clone(),
        start,
        end,
        simulate,
    };
    if simulate {
        tracing::info!("simulation: the Drive folder will not be touched");
    }
    let summary = ResetOrchestrator::new(source, store, settings)
        .run(request)
        .await?;
    tracing::info!(
        orders = summary.orders_fetched,
        months = summary.months.len(),
        skipped = summary.orders_skipped,
        "reset complete"
    );
    Ok(summary)
}

/// Pushes one order, declaring `shop` or the accepted domain.
///
/// # Errors
///
/// Returns an error if the push is rejected or fails.
pub(crate) async fn run_push(
    store: Arc<dyn DocumentStore>,
    settings: Arc<SyncSettings>,
    shop: Option<&str>,
    order: &ShopifyOrder,
) -> anyhow::Result<PushReport> {
    let domain = shop.map_or_else(|| settings.accepted_source.clone(), str::to_owned);
    let report = PushOrchestrator::new(store, settings)
        .run(Some(&domain), order)
        .await?;
    tracing::info!(
        order = %report.order_number,
        sheet = %report.sheet.name,
        action = ?report.action,
        "push complete"
    );
    Ok(report)
}

/// Reads the order JSON from `path`, or stdin for `-`.
pub(crate) async fn read_order_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut raw = String::new();
        tokio::io::stdin()
            .read_to_string(&mut raw)
            .await
            .context("failed to read order from stdin")?;
        return Ok(raw);
    }
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))
}

/// Accepts a bare order or Shopify's `{"order": {...}}` envelope.
pub(crate) fn parse_order(raw: &str) -> anyhow::Result<ShopifyOrder> {
    let value: serde_json::Value = serde_json::from_str(raw).context("order input is not JSON")?;
    let inner = match value {
        serde_json::Value::Object(mut map)
            if map.contains_key("order") && !map.contains_key("id") =>
        {
            map.remove("order").unwrap_or_default()
        }
        other => other,
    };
    serde_json::from_value(inner).context("order input is not a Shopify order")
}
