//! The cart store contract and backend selection.

use std::sync::Arc;

use async_trait::async_trait;
use boutique_cart_core::Cart;

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::memory::InMemoryCartStore;
use crate::redis_store::RedisCartStore;

/// Capability set every cart store backend provides.
///
/// Callers may invoke any operation concurrently with any other, including
/// for the same user. No ordering is guaranteed between two concurrent
/// `add_item` calls for one user - the model is last-writer-wins on the
/// read-modify-write cycle.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Fetch the cart for a user.
    ///
    /// A user with no stored record gets a fresh empty cart; absence is not
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if storage cannot be accessed or the stored
    /// record cannot be decoded.
    async fn get_cart(&self, user_id: &str) -> Result<Cart, StoreError>;

    /// Merge an item into the user's cart.
    ///
    /// Appends a new line item or increments an existing one. `quantity` must
    /// be positive; validation happens at the caller's boundary, not here.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if storage cannot be accessed.
    async fn add_item(
        &self,
        user_id: &str,
        product_id: &str,
        quantity: u32,
    ) -> Result<(), StoreError>;

    /// Replace the user's cart with the canonical empty cart.
    ///
    /// Unconditional and idempotent, regardless of prior content or whether a
    /// record existed at all.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if storage cannot be accessed.
    async fn empty_cart(&self, user_id: &str) -> Result<(), StoreError>;

    /// Best-effort liveness probe.
    ///
    /// Probes the current connection only - never reconnects - and answers
    /// `false` on any failure instead of raising. This is the one operation
    /// that swallows its own errors by contract.
    async fn ping(&self) -> bool;
}

/// Build the store selected by configuration.
///
/// A configured backing-store address selects [`RedisCartStore`]; absence
/// selects [`InMemoryCartStore`]. The choice is fixed for the lifetime of the
/// returned instance - there is no runtime fallback between backends.
///
/// # Errors
///
/// Returns [`StoreError::ConnectionUnavailable`] if the Redis store exhausts
/// its connect retry budget; this is fatal to the owning process.
pub async fn from_config(config: &StoreConfig) -> Result<Arc<dyn CartStore>, StoreError> {
    match config.redis_addr.as_deref() {
        Some(addr) => {
            tracing::info!(addr, "using the Redis-backed cart store");
            Ok(Arc::new(RedisCartStore::connect(addr, config.retry).await?))
        }
        None => {
            tracing::info!(
                "no backing store address configured, using the in-process cart store"
            );
            Ok(Arc::new(InMemoryCartStore::new()))
        }
    }
}
