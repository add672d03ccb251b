//! Product catalog commands.

use backroom_client::catalog::CatalogClient;
use backroom_core::ProductStatus;

use super::{CliError, open_session};

/// List a page of products, optionally filtered by status.
#[allow(clippy::print_stdout)]
pub async fn list(page: u32, per_page: u32, status: Option<&str>) -> Result<(), CliError> {
    let status_filter: Option<ProductStatus> = status.map(str::parse).transpose()?;

    let session = open_session()?;
    let catalog = CatalogClient::new(session.api().clone());

    let products = catalog.list_products(page, per_page).await?;
    let rows: Vec<_> = products
        .into_iter()
        .filter(|p| status_filter.is_none_or(|wanted| p.status == wanted))
        .collect();

    if rows.is_empty() {
        println!("no products");
        return Ok(());
    }

    for product in rows {
        let price = product
            .price
            .map_or_else(|| "-".to_owned(), |p| p.to_string());
        println!(
            "{:>8}  {:<10}  {:>14}  {}",
            product.id, product.status, price, product.name
        );
    }

    Ok(())
}
