//! Repository layer
//!
//! Handlers and services depend only on these traits; `MemoryStore` backs
//! tests and database-less runs, `PgStore` is the production path. Both
//! implement every trait on one store object so cross-entity operations
//! (checkout) stay atomic inside a single implementation.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::aggregates::{Order, OrderItem, OrderStatus, Photo, Product};

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("not found")]
    NotFound,

    #[error("insufficient stock for {product}")]
    InsufficientStock { product: String },

    #[error("cannot change order status from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Clone, Debug, Default)]
pub struct ProductFilter {
    pub category: Option<String>,
    /// The public storefront never sees unavailable products; the admin
    /// listing sets this.
    pub include_unavailable: bool,
}

#[derive(Clone, Debug, Default)]
pub struct PhotoFilter {
    pub category: Option<String>,
    /// Restrict to photos flagged `in_portfolio` (the public featured list).
    pub portfolio_only: bool,
}

/// Page/size pair, normalized the way the admin order list consumes it.
#[derive(Clone, Copy, Debug)]
pub struct ListQuery {
    pub page: u32,
    pub per_page: u32,
}

impl ListQuery {
    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.unwrap_or(20).clamp(1, 100),
        }
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.per_page)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list(&self, filter: ProductFilter) -> RepoResult<Vec<Product>>;
    async fn get(&self, id: Uuid) -> RepoResult<Option<Product>>;
    async fn create(&self, product: Product) -> RepoResult<Product>;
    /// Full-row replacement keyed by `product.id`; last write wins.
    async fn update(&self, product: Product) -> RepoResult<Product>;
    async fn delete(&self, id: Uuid) -> RepoResult<()>;
}

#[async_trait]
pub trait PhotoRepository: Send + Sync {
    async fn list(&self, filter: PhotoFilter) -> RepoResult<Vec<Photo>>;
    async fn get(&self, id: Uuid) -> RepoResult<Option<Photo>>;
    async fn create(&self, photo: Photo) -> RepoResult<Photo>;
    async fn update(&self, photo: Photo) -> RepoResult<Photo>;
    async fn delete(&self, id: Uuid) -> RepoResult<()>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist the order, its item snapshots and all stock decrements as one
    /// atomic unit. Any line whose product is missing, unavailable or short
    /// on stock fails the whole call and leaves nothing behind.
    async fn place_order(&self, order: &Order, items: &[OrderItem]) -> RepoResult<()>;
    /// Newest first, plus the total row count for the pagination envelope.
    async fn list(&self, query: ListQuery) -> RepoResult<(Vec<Order>, i64)>;
    async fn get(&self, id: Uuid) -> RepoResult<Option<(Order, Vec<OrderItem>)>>;
    /// Apply a status transition, enforcing the state machine atomically.
    async fn transition_status(&self, id: Uuid, to: OrderStatus) -> RepoResult<Order>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_normalizes() {
        let q = ListQuery::new(None, None);
        assert_eq!((q.page, q.per_page), (1, 20));
        assert_eq!(q.offset(), 0);

        let q = ListQuery::new(Some(0), Some(1000));
        assert_eq!((q.page, q.per_page), (1, 100));

        let q = ListQuery::new(Some(3), Some(10));
        assert_eq!(q.offset(), 20);
        assert_eq!(q.limit(), 10);
    }
}
