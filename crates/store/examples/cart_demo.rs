//! End-to-end walk through the cart store.
//!
//! With `REDIS_ADDR` set this exercises the Redis-backed store; without it,
//! the in-process store. Run with:
//!
//! ```bash
//! cargo run -p boutique-cart-store --example cart_demo
//! ```

use boutique_cart_store::{CartStore, StoreConfig, from_config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "boutique_cart_store=info,cart_demo=info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = StoreConfig::from_env()?;
    let store = from_config(&config).await?;

    store.add_item("demo-user", "OLJCESPC7Z", 2).await?;
    store.add_item("demo-user", "OLJCESPC7Z", 3).await?;
    store.add_item("demo-user", "66VCHSJNUP", 1).await?;

    let cart = store.get_cart("demo-user").await?;
    tracing::info!(lines = cart.items.len(), "fetched cart");
    for item in &cart.items {
        tracing::info!(product_id = %item.product_id, quantity = item.quantity, "line item");
    }

    store.empty_cart("demo-user").await?;
    let cart = store.get_cart("demo-user").await?;
    tracing::info!(empty = cart.is_empty(), live = store.ping().await, "after empty_cart");

    Ok(())
}
