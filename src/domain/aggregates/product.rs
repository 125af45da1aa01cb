//! Product aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::value_objects::{Money, Quantity};

/// A shop product.
///
/// Plain data with one guarded mutation: stock can only shrink through
/// [`Product::decrement_stock`], which refuses to go negative. Everything
/// else is edited wholesale by the admin surface, last write wins.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: Money,
    pub image: String,
    pub category: String,
    pub stock: Quantity,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: Money,
        image: impl Into<String>,
        category: impl Into<String>,
        stock: Quantity,
        available: bool,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            description: description.into(),
            price,
            image: image.into(),
            category: category.into(),
            stock,
            available,
            created_at: now,
            updated_at: now,
        }
    }

    /// Purchasable right now: flagged available and at least one in stock.
    pub fn in_stock(&self) -> bool {
        self.available && !self.stock.is_zero()
    }

    pub fn decrement_stock(&mut self, qty: u32) -> Result<(), ProductError> {
        self.stock = self
            .stock
            .subtract(qty)
            .ok_or(ProductError::InsufficientStock)?;
        self.touch();
        Ok(())
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Error)]
pub enum ProductError {
    #[error("insufficient stock")]
    InsufficientStock,
}
