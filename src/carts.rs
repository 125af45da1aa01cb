//! Session-keyed cart store
//!
//! Carts are ephemeral server-side state keyed by an opaque session id the
//! storefront generates per browser. Every mutation returns the updated cart
//! snapshot so the client can render without a second request. Nothing here
//! survives a restart.

use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::aggregates::{Cart, CartItem};

#[derive(Default)]
pub struct CartStore {
    carts: RwLock<HashMap<String, Cart>>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current cart for the session; an untouched session reads as an empty
    /// closed cart without allocating one.
    pub fn snapshot(&self, session: &str) -> Cart {
        self.carts.read().get(session).cloned().unwrap_or_default()
    }

    pub fn quantity_of(&self, session: &str, product_id: Uuid) -> u32 {
        self.carts
            .read()
            .get(session)
            .map(|cart| cart.quantity_of(product_id))
            .unwrap_or(0)
    }

    pub fn add_item(&self, session: &str, item: CartItem) -> Cart {
        self.mutate(session, |cart| cart.add_item(item))
    }

    pub fn update_quantity(&self, session: &str, product_id: Uuid, quantity: u32) -> Cart {
        self.mutate(session, |cart| cart.update_quantity(product_id, quantity))
    }

    pub fn remove_item(&self, session: &str, product_id: Uuid) -> Cart {
        self.mutate(session, |cart| cart.remove_item(product_id))
    }

    pub fn clear(&self, session: &str) -> Cart {
        self.mutate(session, |cart| cart.clear())
    }

    pub fn set_open(&self, session: &str, open: bool) -> Cart {
        self.mutate(session, |cart| if open { cart.open() } else { cart.close() })
    }

    fn mutate(&self, session: &str, f: impl FnOnce(&mut Cart)) -> Cart {
        let mut carts = self.carts.write();
        let cart = carts.entry(session.to_string()).or_default();
        f(cart);
        cart.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Money;
    use rust_decimal::Decimal;

    fn line(product_id: Uuid, cents: i64, quantity: u32) -> CartItem {
        CartItem {
            product_id,
            name: "Print".into(),
            price: Money::new(Decimal::new(cents, 2)),
            image: String::new(),
            quantity,
        }
    }

    #[test]
    fn test_sessions_are_isolated() {
        let store = CartStore::new();
        let id = Uuid::now_v7();
        store.add_item("alice", line(id, 1999, 2));
        store.add_item("bob", line(id, 1999, 1));

        assert_eq!(store.snapshot("alice").item_count(), 2);
        assert_eq!(store.snapshot("bob").item_count(), 1);
        assert!(store.snapshot("carol").is_empty());
    }

    #[test]
    fn test_mutations_return_the_updated_snapshot() {
        let store = CartStore::new();
        let id = Uuid::now_v7();

        let cart = store.add_item("s", line(id, 1999, 2));
        assert_eq!(cart.item_count(), 2);

        let cart = store.update_quantity("s", id, 5);
        assert_eq!(cart.item_count(), 5);
        assert_eq!(store.quantity_of("s", id), 5);

        let cart = store.remove_item("s", id);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_clear_and_visibility() {
        let store = CartStore::new();
        store.add_item("s", line(Uuid::now_v7(), 500, 3));

        let cart = store.set_open("s", true);
        assert!(cart.is_open());

        let cart = store.clear("s");
        assert!(cart.is_empty());
        // Clearing the items leaves the sidebar state alone.
        assert!(cart.is_open());

        let cart = store.set_open("s", false);
        assert!(!cart.is_open());
    }
}
