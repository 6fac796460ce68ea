//! Cart storage backends.
//!
//! The public surface is the [`CartStore`] trait: get a cart, merge an item
//! into it, empty it, and probe liveness. Two implementations exist, selected
//! once at construction from configuration and fixed for the instance
//! lifetime:
//!
//! - [`RedisCartStore`] - persists each cart as an opaque blob in a Redis
//!   hash field, with lazy, retrying, mutually-exclusive (re)connection.
//! - [`InMemoryCartStore`] - a process-local map for deployments with no
//!   backing store address. Same contract, no network, no persistence.
//!
//! Callers see exactly one error type, [`StoreError`]; transport errors and
//! corrupt stored records never cross this boundary distinctly.
//!
//! # Modules
//!
//! - [`store`] - the [`CartStore`] contract and backend selection
//! - [`connection`] - shared connection lifecycle and retry policy
//! - [`redis_store`] / [`memory`] - the two backends
//! - [`config`] - environment-driven configuration
//! - [`error`] - the error taxonomy

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod connection;
pub mod error;
pub mod memory;
pub mod redis_store;
pub mod store;

pub use boutique_cart_core::{Cart, CartItem};
pub use config::{ConfigError, StoreConfig};
pub use connection::{ConnectionManager, Dial, RetryPolicy};
pub use error::StoreError;
pub use memory::InMemoryCartStore;
pub use redis_store::RedisCartStore;
pub use store::{CartStore, from_config};
