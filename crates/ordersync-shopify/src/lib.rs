pub mod client;
pub mod error;
pub mod normalize;
pub mod pagination;
pub mod types;

pub use client::{OrderQuery, ShopifyClient};
pub use error::ShopifyError;
pub use normalize::{normalize_order, order_created_at, order_month};
pub use pagination::OrderPage;
pub use types::{ShopifyLineItem, ShopifyOrder, ShopifyOrdersResponse};
