//! Domain events
//!
//! Emitted after successful writes and fanned out by the event bus: the SSE
//! photo changefeed and the optional NATS mirror both consume the serialized
//! form, so every variant is serde-friendly.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::aggregates::{OrderStatus, Photo};
use crate::domain::value_objects::Money;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "entity", content = "event", rename_all = "snake_case")]
pub enum DomainEvent {
    Photo(PhotoEvent),
    Product(ProductEvent),
    Order(OrderEvent),
}

impl DomainEvent {
    /// Subject suffix used for NATS publication (`{prefix}.{kind}`).
    pub fn kind(&self) -> &'static str {
        match self {
            DomainEvent::Photo(_) => "photos",
            DomainEvent::Product(_) => "products",
            DomainEvent::Order(_) => "orders",
        }
    }
}

/// Photo change notifications carry the full row so feed consumers can patch
/// their lists without a follow-up fetch.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PhotoEvent {
    Created { photo: Photo },
    Updated { photo: Photo },
    Deleted { id: Uuid },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProductEvent {
    Created { id: Uuid },
    Updated { id: Uuid },
    Deleted { id: Uuid },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderEvent {
    Placed {
        order_id: Uuid,
        reference: String,
        total: Money,
    },
    StatusChanged {
        order_id: Uuid,
        from: OrderStatus,
        to: OrderStatus,
    },
}
