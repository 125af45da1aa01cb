//! Cart aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::Money;

/// One cart line: a product reference plus the quantity selected.
///
/// Price and name are display snapshots taken when the line was added; the
/// checkout reprices from the live catalog, so a stale cart can never set
/// what the customer pays.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: Uuid,
    pub name: String,
    pub price: Money,
    pub image: String,
    pub quantity: u32,
}

impl CartItem {
    pub fn line_total(&self) -> Money {
        self.price * self.quantity
    }
}

/// An ephemeral shopping cart.
///
/// Lines are unique per product id and always carry quantity >= 1; setting a
/// quantity to zero removes the line. The `open` flag is the cart sidebar's
/// visibility state and never affects the data.
#[derive(Clone, Debug, Default)]
pub struct Cart {
    items: Vec<CartItem>,
    open: bool,
    updated_at: Option<DateTime<Utc>>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Merge a line into the cart: same product id increments the existing
    /// quantity, otherwise the line is appended.
    pub fn add_item(&mut self, item: CartItem) {
        if item.quantity == 0 {
            return;
        }
        match self.items.iter_mut().find(|i| i.product_id == item.product_id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(item.quantity),
            None => self.items.push(item),
        }
        self.touch();
    }

    /// Set a line's quantity; zero removes the line. Unknown product ids are
    /// a silent no-op, as is removing twice.
    pub fn update_quantity(&mut self, product_id: Uuid, quantity: u32) {
        if quantity == 0 {
            self.remove_item(product_id);
            return;
        }
        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            item.quantity = quantity;
            self.touch();
        }
    }

    /// Remove a line. Idempotent: absent ids are a no-op.
    pub fn remove_item(&mut self, product_id: Uuid) {
        let before = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        if self.items.len() != before {
            self.touch();
        }
    }

    /// Quantity of the given product currently in the cart, zero if absent.
    pub fn quantity_of(&self, product_id: Uuid) -> u32 {
        self.items
            .iter()
            .find(|i| i.product_id == product_id)
            .map(|i| i.quantity)
            .unwrap_or(0)
    }

    /// Sum of quantities across all lines (not the number of lines).
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Exact sum of price x quantity across all lines. No tax, no discount;
    /// shipping is free.
    pub fn total(&self) -> Money {
        self.items
            .iter()
            .fold(Money::ZERO, |acc, i| acc + i.line_total())
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.touch();
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}
