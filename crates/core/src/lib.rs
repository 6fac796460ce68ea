//! Cart entity and codec.
//!
//! This crate provides the cart value types shared by every store backend,
//! plus their serialization to and from the opaque byte payload persisted in
//! the backing store.
//!
//! # Architecture
//!
//! The crate contains only types and pure functions - no I/O, no connection
//! handling. Store backends live in `boutique-cart-store`.
//!
//! # Modules
//!
//! - [`cart`] - The [`Cart`] and [`CartItem`] value types and merge logic
//! - [`codec`] - `encode`/`decode` between a [`Cart`] and its stored payload

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod codec;

pub use cart::{Cart, CartItem};
pub use codec::{CodecError, decode, encode};
