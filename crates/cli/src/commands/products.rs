//! Catalogue lookup.

use tillpoint_client::types::ProductFilters;
use tillpoint_client::{ApiClient, ApiError};

use super::emit;

/// Print one page of the product listing.
pub async fn list(client: &ApiClient, search: Option<String>, page: u32) -> Result<(), ApiError> {
    let filters = ProductFilters {
        search,
        page,
        ..ProductFilters::default()
    };
    let page = client.list_products(&filters).await?;

    for product in &page.items {
        let sale = if product.is_on_sale { " (sale)" } else { "" };
        emit(format_args!(
            "{}  {:<32} {:>10}{sale}  stock {:>4}  {}",
            product.id,
            product.name,
            product.effective_price,
            product.stock,
            product.stock_status.as_str(),
        ));
    }
    emit(format_args!(
        "page {} of {} ({} products)",
        page.current_page, page.num_pages, page.count
    ));
    Ok(())
}
