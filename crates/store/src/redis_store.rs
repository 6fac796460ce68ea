//! Redis-backed cart store.
//!
//! Each user owns one outer Redis key (the user id) with a single hash field
//! `"cart"` holding the encoded cart payload. Every operation re-reads,
//! mutates, and rewrites the authoritative record; carts are never cached in
//! memory across requests.

use async_trait::async_trait;
use boutique_cart_core::{Cart, decode, encode};
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;
use tracing::instrument;

use crate::connection::{ConnectionManager, RedisDialer, RetryPolicy};
use crate::error::StoreError;
use crate::store::CartStore;

/// Hash field under the user's key that holds the cart payload.
const CART_FIELD: &str = "cart";

/// Cart store persisting carts in Redis.
pub struct RedisCartStore {
    manager: ConnectionManager<RedisDialer>,
    /// Canonical empty-cart payload, encoded once at construction.
    empty_cart_bytes: Vec<u8>,
}

impl RedisCartStore {
    /// Connect to Redis at `addr` and build the store.
    ///
    /// The first connection is established eagerly, retrying per `retry`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ConnectionUnavailable`] if the retry budget is
    /// exhausted before the first successful connect - a startup failure for
    /// the owning process.
    pub async fn connect(addr: &str, retry: RetryPolicy) -> Result<Self, StoreError> {
        let manager = ConnectionManager::new(RedisDialer::new(addr)?, retry);
        manager.ensure_connected().await?;

        let empty_cart_bytes = encode(&Cart::default())?;
        Ok(Self {
            manager,
            empty_cart_bytes,
        })
    }

    /// Liveness of the shared connection, as last observed.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.manager.is_live()
    }

    /// Translate an in-flight Redis error, flipping the liveness flag on
    /// connection-level faults so the next operation reconnects.
    fn storage_error(&self, err: redis::RedisError) -> StoreError {
        if err.is_io_error()
            || err.is_connection_dropped()
            || err.is_connection_refusal()
            || err.is_timeout()
        {
            self.manager.mark_failed();
        }
        StoreError::from(err)
    }

    async fn read_record(
        &self,
        conn: &mut MultiplexedConnection,
        user_id: &str,
    ) -> Result<Option<Vec<u8>>, StoreError> {
        conn.hget(user_id, CART_FIELD)
            .await
            .map_err(|err| self.storage_error(err))
    }

    async fn write_record(
        &self,
        conn: &mut MultiplexedConnection,
        user_id: &str,
        payload: Vec<u8>,
    ) -> Result<(), StoreError> {
        conn.hset(user_id, CART_FIELD, payload)
            .await
            .map_err(|err| self.storage_error(err))
    }
}

#[async_trait]
impl CartStore for RedisCartStore {
    #[instrument(skip(self))]
    async fn get_cart(&self, user_id: &str) -> Result<Cart, StoreError> {
        let mut conn = self.manager.ensure_connected().await?;
        match self.read_record(&mut conn, user_id).await? {
            // A corrupt record surfaces as an access fault, never as empty.
            Some(payload) => Ok(decode(&payload)?),
            None => Ok(Cart::default()),
        }
    }

    #[instrument(skip(self))]
    async fn add_item(
        &self,
        user_id: &str,
        product_id: &str,
        quantity: u32,
    ) -> Result<(), StoreError> {
        let mut conn = self.manager.ensure_connected().await?;

        // Read-modify-write with no lock spanning the cycle. Concurrent
        // writers to the same user are last-writer-wins.
        let mut cart = match self.read_record(&mut conn, user_id).await? {
            Some(payload) => decode(&payload)?,
            None => Cart::for_user(user_id),
        };
        cart.add_item(product_id, quantity);

        self.write_record(&mut conn, user_id, encode(&cart)?).await
    }

    #[instrument(skip(self))]
    async fn empty_cart(&self, user_id: &str) -> Result<(), StoreError> {
        let mut conn = self.manager.ensure_connected().await?;
        self.write_record(&mut conn, user_id, self.empty_cart_bytes.clone())
            .await
    }

    async fn ping(&self) -> bool {
        // Probes the current handle only; never dials or reconnects.
        let Some(mut conn) = self.manager.current() else {
            return false;
        };
        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .is_ok()
    }
}
