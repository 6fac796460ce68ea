//! Cart value types.
//!
//! A [`Cart`] is the authoritative record for one user: an insertion-ordered
//! list of line items, at most one per product id. Carts are never cached
//! across requests - each store operation reads, mutates, and rewrites the
//! stored record.

use serde::{Deserialize, Serialize};

/// A single line item in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product identifier, opaque to the store.
    pub product_id: String,
    /// Number of units. At least 1 after any successful mutation; callers
    /// validate quantities at the boundary, this layer does not re-check.
    pub quantity: u32,
}

/// A user's cart: an insertion-ordered collection of line items.
///
/// `Cart::default()` is the canonical empty cart - the value persisted by
/// `empty_cart` and returned when no record exists for a user. An empty cart
/// is a valid, distinct state, not the absence of a record; the store layer
/// draws that distinction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    /// Owning user. Empty on the canonical empty cart.
    #[serde(default)]
    pub user_id: String,
    /// Line items in insertion order, at most one per product id.
    #[serde(default)]
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart for a specific user.
    ///
    /// This is what `add_item` starts from when no record exists yet.
    #[must_use]
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            items: Vec::new(),
        }
    }

    /// Merge an item into the cart.
    ///
    /// Increments the quantity of an existing line item for `product_id`, or
    /// appends a new line item at the end. Insertion order of other items is
    /// preserved.
    pub fn add_item(&mut self, product_id: &str, quantity: u32) {
        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            item.quantity += quantity;
        } else {
            self.items.push(CartItem {
                product_id: product_id.to_owned(),
                quantity,
            });
        }
    }

    /// Quantity of a product in the cart, or `None` if not present.
    #[must_use]
    pub fn quantity_of(&self, product_id: &str) -> Option<u32> {
        self.items
            .iter()
            .find(|i| i.product_id == product_id)
            .map(|i| i.quantity)
    }

    /// Whether the cart has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn add_item_merges_existing_product() {
        let mut cart = Cart::for_user("user-1");
        cart.add_item("P1", 2);
        cart.add_item("P1", 3);

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.quantity_of("P1"), Some(5));
    }

    #[test]
    fn add_item_appends_new_product() {
        let mut cart = Cart::for_user("user-1");
        cart.add_item("P1", 2);
        cart.add_item("P2", 1);

        assert_eq!(cart.items.len(), 2);
        assert_eq!(cart.quantity_of("P1"), Some(2));
        assert_eq!(cart.quantity_of("P2"), Some(1));
    }

    #[test]
    fn add_item_preserves_insertion_order() {
        let mut cart = Cart::for_user("user-1");
        cart.add_item("P3", 1);
        cart.add_item("P1", 1);
        cart.add_item("P2", 1);
        cart.add_item("P1", 1);

        let order: Vec<&str> = cart.items.iter().map(|i| i.product_id.as_str()).collect();
        assert_eq!(order, ["P3", "P1", "P2"]);
    }

    #[test]
    fn default_cart_is_empty() {
        let cart = Cart::default();
        assert!(cart.is_empty());
        assert!(cart.user_id.is_empty());
        assert_eq!(cart.quantity_of("P1"), None);
    }

    #[test]
    fn for_user_carries_the_user_id() {
        let cart = Cart::for_user("user-7");
        assert_eq!(cart.user_id, "user-7");
        assert!(cart.is_empty());
    }
}
