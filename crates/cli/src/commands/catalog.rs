//! Catalog commands.

use rocketshoes_cart::{ApiClient, CartConfig};

/// Print every product in the catalog.
///
/// # Errors
///
/// Returns an error if the catalog request fails.
#[allow(clippy::print_stdout)]
pub async fn list(config: &CartConfig) -> Result<(), Box<dyn std::error::Error>> {
    let client = ApiClient::new(&config.api);
    let products = client.list_products().await?;

    if products.is_empty() {
        println!("Catalog is empty");
        return Ok(());
    }

    println!("{:>4}  {:<40} {:>14}", "ID", "PRODUCT", "PRICE");
    for product in &products {
        println!(
            "{:>4}  {:<40} {:>14}",
            product.id.as_i32(),
            product.title,
            product.price.display()
        );
    }
    Ok(())
}
