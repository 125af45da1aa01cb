//! Order aggregate and status state machine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::aggregates::product::Product;
use crate::domain::value_objects::Money;

/// Unified order lifecycle.
///
/// ```text
/// pending -> confirmed -> delivered (terminal)
///    |           |
///    +-----------+-----> cancelled (terminal)
/// ```
///
/// Transitions outside this graph are rejected; the stores enforce the same
/// graph atomically, so no admin surface can re-open a delivered or
/// cancelled order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// States a transition into `self` is allowed to come from.
    pub fn allowed_from(self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::Pending => &[],
            OrderStatus::Confirmed => &[OrderStatus::Pending],
            OrderStatus::Delivered => &[OrderStatus::Confirmed],
            OrderStatus::Cancelled => &[OrderStatus::Pending, OrderStatus::Confirmed],
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<OrderStatus> {
        match s {
            "pending" => Some(OrderStatus::Pending),
            "confirmed" => Some(OrderStatus::Confirmed),
            "delivered" => Some(OrderStatus::Delivered),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Customer contact details captured by the checkout form.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContactDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub notes: Option<String>,
}

/// Immutable snapshot of a product at purchase time.
///
/// Decoupled from the live product row: later edits or deletion of the
/// product never change what was sold.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub product_price: Money,
    pub quantity: u32,
    pub subtotal: Money,
}

impl OrderItem {
    pub fn snapshot(order_id: Uuid, product: &Product, quantity: u32) -> Self {
        Self {
            id: Uuid::now_v7(),
            order_id,
            product_id: product.id,
            product_name: product.name.clone(),
            product_price: product.price,
            quantity,
            subtotal: product.price * quantity,
        }
    }
}

/// A placed order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    /// Short human-facing code shown on the confirmation view.
    pub reference: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub notes: Option<String>,
    pub status: OrderStatus,
    pub total: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Build a pending order plus its item snapshots from live products.
    ///
    /// The total is computed here from the snapshots, so
    /// `total == sum(items.subtotal)` holds by construction.
    pub fn place(contact: ContactDetails, lines: &[(Product, u32)]) -> (Order, Vec<OrderItem>) {
        let id = Uuid::now_v7();
        let items: Vec<OrderItem> = lines
            .iter()
            .map(|(product, quantity)| OrderItem::snapshot(id, product, *quantity))
            .collect();
        let total = items
            .iter()
            .fold(Money::ZERO, |acc, item| acc + item.subtotal);
        let now = Utc::now();
        let order = Order {
            id,
            reference: generate_reference(),
            customer_name: contact.name,
            customer_email: contact.email,
            customer_phone: contact.phone,
            customer_address: contact.address,
            notes: contact.notes,
            status: OrderStatus::Pending,
            total,
            created_at: now,
            updated_at: now,
        };
        (order, items)
    }

    pub fn transition(&mut self, to: OrderStatus) -> Result<(), OrderError> {
        if !to.allowed_from().contains(&self.status) {
            return Err(OrderError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        self.updated_at = Utc::now();
        Ok(())
    }
}

fn generate_reference() -> String {
    format!("ORD-{:08}", rand::random::<u32>() % 100_000_000)
}

#[derive(Debug, Clone, Error)]
pub enum OrderError {
    #[error("cannot change order status from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
}
