//! Cart commands.
//!
//! Every command opens the persisted cart, applies at most one operation, and
//! logs the resulting cart.

use rocket_cart::{
    ApiClient, CartConfig, CartError, CartState, CartStore, CatalogError, FileStorage,
    TracingNotifier,
};

/// The cart as wired for the command line.
pub type CliCart = CartStore<ApiClient, ApiClient, FileStorage, TracingNotifier>;

/// Errors from running a cart command.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Failed to build catalog client: {0}")]
    Client(#[from] CatalogError),

    #[error("{0}")]
    Cart(#[from] CartError),
}

/// Open the cart stored at the configured path.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built.
pub async fn open_cart(config: &CartConfig) -> Result<CliCart, CommandError> {
    let client = ApiClient::new(&config.api)?;
    let storage = FileStorage::new(&config.storage_path);

    tracing::debug!(
        path = %config.storage_path.display(),
        key = %config.storage_key,
        "Opening cart"
    );

    Ok(CartStore::load(
        client.clone(),
        client,
        storage,
        TracingNotifier,
        config.storage_key.clone(),
    )
    .await)
}

/// Log each line of the cart followed by the unit count.
pub fn print_cart(cart: &CartState) {
    if cart.is_empty() {
        tracing::info!("Cart is empty");
        return;
    }

    for item in cart {
        let title = item.display().title().unwrap_or("(untitled)");
        let price = item
            .display()
            .price()
            .map_or_else(|| "-".to_string(), |p| p.to_string());

        tracing::info!(
            "{:<12} {:<40} x{:<4} {}",
            item.product_id().as_str(),
            title,
            item.quantity().get(),
            price
        );
    }

    tracing::info!("{} line(s), {} unit(s)", cart.len(), cart.item_count());
}
