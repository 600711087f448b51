//! Port implementations backed by the Shopify and Google clients, and the
//! wiring that builds them from the application config.

use std::sync::Arc;

use async_trait::async_trait;
use ordersync_core::{AppConfig, DriveFile, SheetContents, SpreadsheetRef};
use ordersync_google::{build_http_client, GoogleWorkspace, TokenProvider};
use ordersync_shopify::{OrderQuery, ShopifyClient, ShopifyOrder};

use crate::error::CollaboratorError;
use crate::ports::{DocumentStore, OrderSource, OrderWindow};

/// Production collaborators.
pub struct Collaborators {
    pub source: Arc<dyn OrderSource>,
    pub store: Arc<dyn DocumentStore>,
}

/// Builds the Shopify client and the authenticated Google client.
///
/// # Errors
///
/// Returns [`CollaboratorError`] if a client cannot be built or the Google
/// credentials cannot be loaded.
pub async fn connect(config: &AppConfig) -> Result<Collaborators, CollaboratorError> {
    let shopify = ShopifyClient::new(
        &config.shopify_merchant,
        &config.shopify_api_version,
        &config.shopify_api_token,
        config.http_timeout_secs,
        &config.user_agent,
        config.shopify_page_limit,
    )?;

    let http = build_http_client(config.http_timeout_secs, &config.user_agent)?;
    let tokens = TokenProvider::resolve(
        config.google_access_token.as_deref(),
        config.google_service_account_json.as_deref(),
        config.google_service_account_path.as_deref(),
        http.clone(),
    )
    .await?;
    let google = GoogleWorkspace::new(http, tokens)?;

    tracing::info!(
        merchant = %config.shopify_merchant,
        api_version = %config.shopify_api_version,
        "collaborators ready"
    );
    Ok(Collaborators {
        source: Arc::new(shopify),
        store: Arc::new(google),
    })
}

#[async_trait]
impl OrderSource for ShopifyClient {
    async fn fetch_orders(
        &self,
        window: &OrderWindow,
    ) -> Result<Vec<ShopifyOrder>, CollaboratorError> {
        let query = OrderQuery {
            status: &window.status,
            created_at_min: window.start.as_deref(),
            created_at_max: window.end.as_deref(),
        };
        Ok(self.fetch_all_orders(&query).await?)
    }
}

#[async_trait]
impl DocumentStore for GoogleWorkspace {
    async fn list_files(
        &self,
        folder_id: &str,
        modified_since: Option<&str>,
    ) -> Result<Vec<DriveFile>, CollaboratorError> {
        Ok(GoogleWorkspace::list_files(self, folder_id, modified_since).await?)
    }

    async fn create_folder(
        &self,
        name: &str,
        parent: Option<&str>,
    ) -> Result<DriveFile, CollaboratorError> {
        Ok(GoogleWorkspace::create_folder(self, name, parent).await?)
    }

    async fn delete_file(&self, file_id: &str) -> Result<(), CollaboratorError> {
        Ok(GoogleWorkspace::delete_file(self, file_id).await?)
    }

    async fn create_spreadsheet(
        &self,
        name: &str,
        folder_id: &str,
    ) -> Result<SpreadsheetRef, CollaboratorError> {
        let file = GoogleWorkspace::create_spreadsheet(self, name, folder_id).await?;
        Ok(file.into())
    }

    async fn read_range(
        &self,
        spreadsheet_id: &str,
        range: &str,
    ) -> Result<SheetContents, CollaboratorError> {
        Ok(GoogleWorkspace::read_range(self, spreadsheet_id, range).await?)
    }

    async fn append_rows(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: &[Vec<String>],
    ) -> Result<(), CollaboratorError> {
        Ok(GoogleWorkspace::append_rows(self, spreadsheet_id, range, rows).await?)
    }

    async fn update_range(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: &[Vec<String>],
    ) -> Result<(), CollaboratorError> {
        Ok(GoogleWorkspace::update_range(self, spreadsheet_id, range, rows).await?)
    }

    async fn clear_range(
        &self,
        spreadsheet_id: &str,
        range: &str,
    ) -> Result<(), CollaboratorError> {
        Ok(GoogleWorkspace::clear_range(self, spreadsheet_id, range).await?)
    }
}
