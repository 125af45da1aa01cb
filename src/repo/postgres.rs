//! Postgres store
//!
//! Runtime-bound queries over a shared [`PgPool`]. The schema lives in
//! `migrations/` and is applied on startup. Rows decode into private row
//! structs and convert into domain types from there, so column types
//! (NUMERIC, INTEGER, TEXT status) stay a storage concern.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::aggregates::{Order, OrderItem, OrderStatus, Photo, Product};
use crate::domain::value_objects::{Money, Quantity};
use crate::repo::{
    ListQuery, OrderRepository, PhotoFilter, PhotoRepository, ProductFilter, ProductRepository,
    RepoError, RepoResult,
};

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Row types
// ============================================================================

#[derive(FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    description: String,
    price: Decimal,
    image: String,
    category: String,
    stock: i32,
    available: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            description: row.description,
            price: Money::new(row.price),
            image: row.image,
            category: row.category,
            stock: Quantity::new(row.stock.max(0) as u32),
            available: row.available,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct PhotoRow {
    id: Uuid,
    title: String,
    description: String,
    category: String,
    image: String,
    author: String,
    taken_at: Option<NaiveDate>,
    location: Option<String>,
    camera: Option<String>,
    lens: Option<String>,
    settings: Option<String>,
    in_portfolio: bool,
    created_at: DateTime<Utc>,
}

impl From<PhotoRow> for Photo {
    fn from(row: PhotoRow) -> Self {
        Photo {
            id: row.id,
            title: row.title,
            description: row.description,
            category: row.category,
            image: row.image,
            author: row.author,
            taken_at: row.taken_at,
            location: row.location,
            camera: row.camera,
            lens: row.lens,
            settings: row.settings,
            in_portfolio: row.in_portfolio,
            created_at: row.created_at,
        }
    }
}

#[derive(FromRow)]
struct OrderRow {
    id: Uuid,
    reference: String,
    customer_name: String,
    customer_email: String,
    customer_phone: String,
    customer_address: String,
    notes: Option<String>,
    status: String,
    total: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepoError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status = OrderStatus::parse(&row.status)
            .ok_or_else(|| RepoError::Database(format!("unknown order status '{}'", row.status)))?;
        Ok(Order {
            id: row.id,
            reference: row.reference,
            customer_name: row.customer_name,
            customer_email: row.customer_email,
            customer_phone: row.customer_phone,
            customer_address: row.customer_address,
            notes: row.notes,
            status,
            total: Money::new(row.total),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct OrderItemRow {
    id: Uuid,
    order_id: Uuid,
    product_id: Uuid,
    product_name: String,
    product_price: Decimal,
    quantity: i32,
    subtotal: Decimal,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        OrderItem {
            id: row.id,
            order_id: row.order_id,
            product_id: row.product_id,
            product_name: row.product_name,
            product_price: Money::new(row.product_price),
            quantity: row.quantity.max(0) as u32,
            subtotal: Money::new(row.subtotal),
        }
    }
}

// ============================================================================
// Products
// ============================================================================

#[async_trait]
impl ProductRepository for PgStore {
    async fn list(&self, filter: ProductFilter) -> RepoResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT * FROM products
            WHERE (available OR $1)
              AND ($2::text IS NULL OR category = $2)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(filter.include_unavailable)
        .bind(filter.category)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn get(&self, id: Uuid) -> RepoResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Product::from))
    }

    async fn create(&self, product: Product) -> RepoResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            INSERT INTO products
                (id, name, description, price, image, category, stock, available,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price.amount())
        .bind(&product.image)
        .bind(&product.category)
        .bind(product.stock.value() as i32)
        .bind(product.available)
        .bind(product.created_at)
        .bind(product.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(Product::from(row))
    }

    async fn update(&self, product: Product) -> RepoResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            UPDATE products
               SET name = $2, description = $3, price = $4, image = $5,
                   category = $6, stock = $7, available = $8, updated_at = NOW()
             WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price.amount())
        .bind(&product.image)
        .bind(&product.category)
        .bind(product.stock.value() as i32)
        .bind(product.available)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Product::from).ok_or(RepoError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

// ============================================================================
// Photos
// ============================================================================

#[async_trait]
impl PhotoRepository for PgStore {
    async fn list(&self, filter: PhotoFilter) -> RepoResult<Vec<Photo>> {
        let rows = sqlx::query_as::<_, PhotoRow>(
            r#"
            SELECT * FROM photos
            WHERE (in_portfolio OR NOT $1)
              AND ($2::text IS NULL OR category = $2)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(filter.portfolio_only)
        .bind(filter.category)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Photo::from).collect())
    }

    async fn get(&self, id: Uuid) -> RepoResult<Option<Photo>> {
        let row = sqlx::query_as::<_, PhotoRow>("SELECT * FROM photos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Photo::from))
    }

    async fn create(&self, photo: Photo) -> RepoResult<Photo> {
        let row = sqlx::query_as::<_, PhotoRow>(
            r#"
            INSERT INTO photos
                (id, title, description, category, image, author, taken_at,
                 location, camera, lens, settings, in_portfolio, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(photo.id)
        .bind(&photo.title)
        .bind(&photo.description)
        .bind(&photo.category)
        .bind(&photo.image)
        .bind(&photo.author)
        .bind(photo.taken_at)
        .bind(&photo.location)
        .bind(&photo.camera)
        .bind(&photo.lens)
        .bind(&photo.settings)
        .bind(photo.in_portfolio)
        .bind(photo.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(Photo::from(row))
    }

    async fn update(&self, photo: Photo) -> RepoResult<Photo> {
        let row = sqlx::query_as::<_, PhotoRow>(
            r#"
            UPDATE photos
               SET title = $2, description = $3, category = $4, image = $5,
                   author = $6, taken_at = $7, location = $8, camera = $9,
                   lens = $10, settings = $11, in_portfolio = $12
             WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(photo.id)
        .bind(&photo.title)
        .bind(&photo.description)
        .bind(&photo.category)
        .bind(&photo.image)
        .bind(&photo.author)
        .bind(photo.taken_at)
        .bind(&photo.location)
        .bind(&photo.camera)
        .bind(&photo.lens)
        .bind(&photo.settings)
        .bind(photo.in_portfolio)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Photo::from).ok_or(RepoError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM photos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

// ============================================================================
// Orders
// ============================================================================

#[async_trait]
impl OrderRepository for PgStore {
    async fn place_order(&self, order: &Order, items: &[OrderItem]) -> RepoResult<()> {
        let mut tx = self.pool.begin().await?;

        // Guarded decrement per line. Zero rows touched means the product is
        // gone, unavailable or short on stock; returning rolls the
        // transaction back on drop.
        for item in items {
            let updated = sqlx::query(
                r#"
                UPDATE products
                   SET stock = stock - $2, updated_at = NOW()
                 WHERE id = $1 AND available AND stock >= $2
                "#,
            )
            .bind(item.product_id)
            .bind(item.quantity as i32)
            .execute(&mut *tx)
            .await?
            .rows_affected();
            if updated == 0 {
                return Err(RepoError::InsufficientStock {
                    product: item.product_name.clone(),
                });
            }
        }

        sqlx::query(
            r#"
            INSERT INTO orders
                (id, reference, customer_name, customer_email, customer_phone,
                 customer_address, notes, status, total, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(order.id)
        .bind(&order.reference)
        .bind(&order.customer_name)
        .bind(&order.customer_email)
        .bind(&order.customer_phone)
        .bind(&order.customer_address)
        .bind(&order.notes)
        .bind(order.status.as_str())
        .bind(order.total.amount())
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO order_items
                    (id, order_id, product_id, product_name, product_price,
                     quantity, subtotal)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(item.id)
            .bind(item.order_id)
            .bind(item.product_id)
            .bind(&item.product_name)
            .bind(item.product_price.amount())
            .bind(item.quantity as i32)
            .bind(item.subtotal.amount())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn list(&self, query: ListQuery) -> RepoResult<(Vec<Order>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;
        let rows = sqlx::query_as::<_, OrderRow>(
            "SELECT * FROM orders ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2",
        )
        .bind(query.limit())
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await?;
        let orders = rows
            .into_iter()
            .map(Order::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((orders, total))
    }

    async fn get(&self, id: Uuid) -> RepoResult<Option<(Order, Vec<OrderItem>)>> {
        let Some(row) = sqlx::query_as::<_, OrderRow>("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };
        let order = Order::try_from(row)?;
        let items = sqlx::query_as::<_, OrderItemRow>(
            "SELECT * FROM order_items WHERE order_id = $1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(OrderItem::from)
        .collect();
        Ok(Some((order, items)))
    }

    async fn transition_status(&self, id: Uuid, to: OrderStatus) -> RepoResult<Order> {
        let allowed: Vec<String> = to
            .allowed_from()
            .iter()
            .map(|s| s.as_str().to_string())
            .collect();
        let updated = sqlx::query_as::<_, OrderRow>(
            r#"
            UPDATE orders
               SET status = $2, updated_at = NOW()
             WHERE id = $1 AND status = ANY($3)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(to.as_str())
        .bind(&allowed)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(row) => Order::try_from(row),
            None => {
                // The guarded update missed: fetch the current status to tell
                // a bad transition apart from a missing order.
                let current =
                    sqlx::query_scalar::<_, String>("SELECT status FROM orders WHERE id = $1")
                        .bind(id)
                        .fetch_optional(&self.pool)
                        .await?;
                match current.as_deref().and_then(OrderStatus::parse) {
                    Some(from) => Err(RepoError::InvalidTransition { from, to }),
                    None => Err(RepoError::NotFound),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_row(status: &str) -> OrderRow {
        OrderRow {
            id: Uuid::now_v7(),
            reference: "ORD-00000001".into(),
            customer_name: "Ana".into(),
            customer_email: "ana@example.com".into(),
            customer_phone: "+34 600 000 000".into(),
            customer_address: "Calle Mayor 1".into(),
            notes: None,
            status: status.into(),
            total: Decimal::new(1999, 2),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_order_row_decodes_status() {
        let order = Order::try_from(order_row("confirmed")).unwrap();
        assert_eq!(order.status, OrderStatus::Confirmed);
    }

    #[test]
    fn test_order_row_rejects_unknown_status() {
        assert!(matches!(
            Order::try_from(order_row("archived")),
            Err(RepoError::Database(_))
        ));
    }
}
