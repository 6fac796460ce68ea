//! In-process cart store.
//!
//! Capability-equivalent alternative to the Redis-backed store for
//! deployments with no backing store address. Same contract, no network, no
//! persistence across restarts. [`crate::StoreError`] is never raised here.

use std::collections::HashMap;

use async_trait::async_trait;
use boutique_cart_core::Cart;
use tokio::sync::Mutex;
use tracing::instrument;

use crate::error::StoreError;
use crate::store::CartStore;

/// Cart store backed by a process-local map.
#[derive(Default)]
pub struct InMemoryCartStore {
    /// Carts by user id. The lock is held only for the duration of a single
    /// operation, never across operations.
    carts: Mutex<HashMap<String, Cart>>,
}

impl InMemoryCartStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CartStore for InMemoryCartStore {
    #[instrument(skip(self))]
    async fn get_cart(&self, user_id: &str) -> Result<Cart, StoreError> {
        let carts = self.carts.lock().await;
        Ok(carts.get(user_id).cloned().unwrap_or_default())
    }

    #[instrument(skip(self))]
    async fn add_item(
        &self,
        user_id: &str,
        product_id: &str,
        quantity: u32,
    ) -> Result<(), StoreError> {
        let mut carts = self.carts.lock().await;
        carts
            .entry(user_id.to_owned())
            .or_insert_with(|| Cart::for_user(user_id))
            .add_item(product_id, quantity);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn empty_cart(&self, user_id: &str) -> Result<(), StoreError> {
        let mut carts = self.carts.lock().await;
        carts.insert(user_id.to_owned(), Cart::default());
        Ok(())
    }

    async fn ping(&self) -> bool {
        // No network to fail.
        true
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_user_gets_an_empty_cart() {
        let store = InMemoryCartStore::new();
        let cart = store.get_cart("nobody").await.unwrap();
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn add_item_merges_and_persists() {
        let store = InMemoryCartStore::new();
        store.add_item("u1", "P1", 2).await.unwrap();
        store.add_item("u1", "P1", 3).await.unwrap();
        store.add_item("u1", "P2", 1).await.unwrap();

        let cart = store.get_cart("u1").await.unwrap();
        assert_eq!(cart.user_id, "u1");
        assert_eq!(cart.items.len(), 2);
        assert_eq!(cart.quantity_of("P1"), Some(5));
        assert_eq!(cart.quantity_of("P2"), Some(1));
    }

    #[tokio::test]
    async fn carts_are_isolated_per_user() {
        let store = InMemoryCartStore::new();
        store.add_item("u1", "P1", 1).await.unwrap();
        store.add_item("u2", "P2", 4).await.unwrap();

        assert_eq!(store.get_cart("u1").await.unwrap().items.len(), 1);
        assert_eq!(
            store.get_cart("u2").await.unwrap().quantity_of("P2"),
            Some(4)
        );
    }

    #[tokio::test]
    async fn empty_cart_is_idempotent() {
        let store = InMemoryCartStore::new();
        store.add_item("u1", "P1", 2).await.unwrap();

        store.empty_cart("u1").await.unwrap();
        let once = store.get_cart("u1").await.unwrap();
        store.empty_cart("u1").await.unwrap();
        let twice = store.get_cart("u1").await.unwrap();

        assert!(once.is_empty());
        assert_eq!(once, twice);
        assert_eq!(once, Cart::default());
    }

    #[tokio::test]
    async fn empty_cart_for_an_unknown_user_succeeds() {
        let store = InMemoryCartStore::new();
        store.empty_cart("nobody").await.unwrap();
        assert!(store.get_cart("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn ping_is_always_true() {
        assert!(InMemoryCartStore::new().ping().await);
    }
}
