//! Checkout
//!
//! Turns a session's cart into a placed order: reprice every line from the
//! live catalog, snapshot them, persist order + items + stock decrements as
//! one atomic repository call, and only then clear the cart and emit the
//! event. A failure at any step leaves cart and catalog untouched.

use crate::carts::CartStore;
use crate::domain::aggregates::{ContactDetails, Order, OrderItem};
use crate::domain::events::{DomainEvent, OrderEvent};
use crate::error::AppError;
use crate::events::EventBus;
use crate::repo::{OrderRepository, ProductRepository};

pub async fn place_order(
    products: &dyn ProductRepository,
    orders: &dyn OrderRepository,
    carts: &CartStore,
    events: &EventBus,
    session: &str,
    contact: ContactDetails,
) -> Result<(Order, Vec<OrderItem>), AppError> {
    let cart = carts.snapshot(session);
    if cart.is_empty() {
        return Err(AppError::EmptyCart);
    }

    // Cart lines only carry display prices; the order snapshots are built
    // from the live catalog rows.
    let mut lines = Vec::with_capacity(cart.items().len());
    for item in cart.items() {
        let product = products
            .get(item.product_id)
            .await?
            .filter(|p| p.available)
            .ok_or(AppError::NotFound("product"))?;
        lines.push((product, item.quantity));
    }

    let (order, items) = Order::place(contact, &lines);
    orders.place_order(&order, &items).await?;

    // Only a placed order empties the cart.
    carts.clear(session);
    events
        .publish(DomainEvent::Order(OrderEvent::Placed {
            order_id: order.id,
            reference: order.reference.clone(),
            total: order.total,
        }))
        .await;
    tracing::info!(reference = %order.reference, total = %order.total, "order placed");

    Ok((order, items))
}
