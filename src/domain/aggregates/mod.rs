//! Aggregates module
pub mod cart;
pub mod order;
pub mod photo;
pub mod product;

pub use cart::{Cart, CartItem};
pub use order::{ContactDetails, Order, OrderError, OrderItem, OrderStatus};
pub use photo::Photo;
pub use product::{Product, ProductError};
