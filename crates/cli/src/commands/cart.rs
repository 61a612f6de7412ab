//! Cart commands.
//!
//! Every mutation is validated against live stock. A rejected mutation is
//! logged with its user-facing message and the command exits non-zero; the
//! persisted cart is left as it was.

use rocketshoes_cart::{CartConfig, CartView, FileStore, snapshot};
use rocketshoes_core::{Cart, ProductId};

use super::open_cart;

/// Print the current cart.
///
/// # Errors
///
/// Returns an error if the store cannot be opened.
pub fn show(config: &CartConfig) -> Result<(), Box<dyn std::error::Error>> {
    let cart = open_cart(config)?;
    print_cart(&cart.cart());
    Ok(())
}

/// Add one unit of a product and print the resulting cart.
///
/// # Errors
///
/// Returns the `CartError` if the mutation was rejected.
pub async fn add(config: &CartConfig, product_id: ProductId) -> Result<(), Box<dyn std::error::Error>> {
    let cart = open_cart(config)?;
    cart.add_product(product_id).await?;
    print_cart(&cart.cart());
    Ok(())
}

/// Remove a product and print the resulting cart.
///
/// # Errors
///
/// Returns the `CartError` if the mutation was rejected.
pub fn remove(config: &CartConfig, product_id: ProductId) -> Result<(), Box<dyn std::error::Error>> {
    let cart = open_cart(config)?;
    cart.remove_product(product_id)?;
    print_cart(&cart.cart());
    Ok(())
}

/// Set a product's quantity and print the resulting cart.
///
/// # Errors
///
/// Returns the `CartError` if the mutation was rejected.
pub async fn update(
    config: &CartConfig,
    product_id: ProductId,
    amount: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    let cart = open_cart(config)?;
    cart.update_product_amount(product_id, amount).await?;
    print_cart(&cart.cart());
    Ok(())
}

/// Discard the persisted cart.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or the snapshot cannot be removed.
pub fn clear(config: &CartConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = FileStore::open(&config.storage_dir)?;
    snapshot::discard(&store)?;
    tracing::info!("Cart cleared");
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_cart(cart: &Cart) {
    let view = CartView::from(cart);

    if view.items.is_empty() {
        println!("Cart is empty");
        return;
    }

    println!("{:>4}  {:<40} {:>6} {:>14} {:>14}", "ID", "PRODUCT", "QTY", "PRICE", "SUBTOTAL");
    for item in &view.items {
        println!(
            "{:>4}  {:<40} {:>6} {:>14} {:>14}",
            item.id, item.title, item.amount, item.price, item.subtotal
        );
    }
    println!();
    println!("{} item(s), total {}", view.item_count, view.total);
}
