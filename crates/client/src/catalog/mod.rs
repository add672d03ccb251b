//! Catalog surface: categories and products.
//!
//! Thin fetchers over the tenant channel plus the category tree
//! normalizer. No retry and no caching here; callers that need either
//! wrap these in their data-fetching layer.

mod tree;

pub use tree::{CategoryNode, CategoryTree, normalize_categories};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use backroom_core::{Price, ProductId, ProductStatus};

use crate::api::{ApiClient, ApiResponse, paths};
use crate::error::ClientError;

/// A product row as the back-office tables render it.
///
/// Deserialized leniently: the listing endpoint has drifted over time and
/// older tenants still serve rows without status or price.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductSummary {
    /// Product id.
    pub id: ProductId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Listing status.
    #[serde(default)]
    pub status: ProductStatus,
    /// Current sale price, when the pricing service has computed one.
    #[serde(default)]
    pub price: Option<Price>,
    /// Last modification time, when the backend reports it.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Client for the tenant's catalog endpoints.
#[derive(Clone)]
pub struct CatalogClient {
    api: ApiClient,
}

impl CatalogClient {
    /// Create a catalog client over an existing API client.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Fetch the raw category listing response.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport failure.
    pub async fn categories(&self) -> Result<ApiResponse, ClientError> {
        self.api.tenant_get(paths::CATEGORIES).await
    }

    /// Fetch the tenant's categories as a normalized tree.
    ///
    /// An error status yields an empty tree, same as a tenant with no
    /// categories; the status is logged, not surfaced.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport failure.
    pub async fn category_tree(&self) -> Result<CategoryTree, ClientError> {
        let response = self.categories().await?;

        if !response.is_success() {
            tracing::warn!(status = %response.status, "category listing rejected");
            return Ok(CategoryTree::default());
        }

        Ok(normalize_categories(&response.body))
    }

    /// Fetch a page of products.
    ///
    /// Rows that don't deserialize are skipped and logged; one malformed
    /// row must not blank a whole table.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport failure.
    pub async fn list_products(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<ProductSummary>, ClientError> {
        let page = page.to_string();
        let per_page = per_page.to_string();
        let response = self
            .api
            .tenant_get_with(
                paths::PRODUCTS,
                &[("page", page.as_str()), ("per_page", per_page.as_str())],
            )
            .await?;

        if !response.is_success() {
            tracing::warn!(status = %response.status, "product listing rejected");
            return Ok(Vec::new());
        }

        Ok(parse_products(&response.body))
    }
}

/// Decode the product rows out of a listing body, whichever wrapper key
/// the backend used.
fn parse_products(body: &Value) -> Vec<ProductSummary> {
    let rows = match body {
        Value::Array(rows) => rows.as_slice(),
        Value::Object(wrapper) => ["items", "data", "products"]
            .iter()
            .find_map(|key| wrapper.get(*key).and_then(Value::as_array))
            .map_or(&[][..], Vec::as_slice),
        _ => &[][..],
    };

    rows.iter()
        .filter_map(|row| match serde_json::from_value(row.clone()) {
            Ok(product) => Some(product),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed product row");
                None
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_products_bare_array() {
        let body = json!([
            {"id": 1, "name": "Mug", "status": "active"},
            {"id": 2, "name": "Shirt"},
        ]);

        let products = parse_products(&body);
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].status, ProductStatus::Active);
        assert_eq!(products[1].status, ProductStatus::Draft);
    }

    #[test]
    fn test_parse_products_wrapped() {
        let body = json!({"items": [{"id": 1, "name": "Mug"}]});
        assert_eq!(parse_products(&body).len(), 1);
    }

    #[test]
    fn test_parse_products_skips_malformed_rows() {
        let body = json!([
            {"id": 1, "name": "Mug"},
            {"name": "row without id"},
        ]);

        let products = parse_products(&body);
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, ProductId::new(1));
    }

    #[test]
    fn test_parse_products_with_price_and_timestamp() {
        let body = json!([{
            "id": 3,
            "name": "Poster",
            "price": {"amount": "19.99", "currency_code": "EUR"},
            "updated_at": "2026-07-01T12:00:00Z",
        }]);

        let products = parse_products(&body);
        assert_eq!(products.len(), 1);
        let price = products[0].price.unwrap();
        assert_eq!(price.currency_code, backroom_core::CurrencyCode::EUR);
        assert!(products[0].updated_at.is_some());
    }

    #[test]
    fn test_parse_products_non_list_body() {
        assert!(parse_products(&json!(null)).is_empty());
        assert!(parse_products(&json!({"error": "nope"})).is_empty());
    }
}
