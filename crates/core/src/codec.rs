//! Serialization between a [`Cart`] and its stored byte payload.
//!
//! The backing store holds each cart as an opaque blob; this module is the
//! only place that knows the blob's shape. `decode(encode(cart))` round-trips
//! exactly for every valid cart, including the empty cart, whose encoding is
//! a specific non-empty byte sequence. "No record found" is represented by
//! the store layer as the absence of a payload, never by the codec.

use crate::cart::Cart;

/// Errors produced by the codec.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The stored payload could not be decoded as a cart.
    ///
    /// Callers treat this as a storage access fault, not a missing cart - a
    /// corrupt record must never silently present as an empty cart.
    #[error("corrupt cart record: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Serialize a cart to its stored payload.
///
/// # Errors
///
/// Returns [`CodecError::Corrupt`] if serialization fails; this cannot happen
/// for the field types `Cart` is built from but is propagated rather than
/// swallowed.
pub fn encode(cart: &Cart) -> Result<Vec<u8>, CodecError> {
    Ok(serde_json::to_vec(cart)?)
}

/// Deserialize a cart from its stored payload.
///
/// # Errors
///
/// Returns [`CodecError::Corrupt`] if the bytes are not a valid cart payload.
pub fn decode(bytes: &[u8]) -> Result<Cart, CodecError> {
    Ok(serde_json::from_slice(bytes)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_populated_cart() {
        let mut cart = Cart::for_user("user-1");
        cart.add_item("P1", 2);
        cart.add_item("P2", 7);

        let bytes = encode(&cart).unwrap();
        assert_eq!(decode(&bytes).unwrap(), cart);
    }

    #[test]
    fn round_trips_the_empty_cart() {
        let cart = Cart::default();
        let bytes = encode(&cart).unwrap();
        assert_eq!(decode(&bytes).unwrap(), cart);
    }

    #[test]
    fn empty_cart_encoding_is_non_empty() {
        // The empty cart must be distinguishable from "no record found",
        // which the store represents as the absence of any payload.
        let bytes = encode(&Cart::default()).unwrap();
        assert!(!bytes.is_empty());
    }

    #[test]
    fn malformed_bytes_fail_to_decode() {
        assert!(decode(b"not a cart").is_err());
        assert!(decode(b"").is_err());
        assert!(decode(&[0xff, 0xfe, 0x00]).is_err());
    }

    #[test]
    fn corrupt_error_displays_cause() {
        let err = decode(b"{").unwrap_err();
        assert!(err.to_string().starts_with("corrupt cart record"));
    }
}
