//! In-memory store
//!
//! Backs the test suite and database-less runs. One `RwLock` guards every
//! collection, so the checkout placement is atomic the same way the Postgres
//! transaction is.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::aggregates::order::OrderError;
use crate::domain::aggregates::{Order, OrderItem, OrderStatus, Photo, Product};
use crate::repo::{
    ListQuery, OrderRepository, PhotoFilter, PhotoRepository, ProductFilter, ProductRepository,
    RepoError, RepoResult,
};

#[derive(Default)]
struct Inner {
    products: HashMap<Uuid, Product>,
    photos: HashMap<Uuid, Photo>,
    orders: HashMap<Uuid, Order>,
    order_items: HashMap<Uuid, Vec<OrderItem>>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for MemoryStore {
    async fn list(&self, filter: ProductFilter) -> RepoResult<Vec<Product>> {
        let inner = self.inner.read();
        let mut products: Vec<Product> = inner
            .products
            .values()
            .filter(|p| p.available || filter.include_unavailable)
            .filter(|p| category_matches(filter.category.as_deref(), &p.category))
            .cloned()
            .collect();
        sort_newest_first(&mut products, |p| (p.created_at, p.id));
        Ok(products)
    }

    async fn get(&self, id: Uuid) -> RepoResult<Option<Product>> {
        Ok(self.inner.read().products.get(&id).cloned())
    }

    async fn create(&self, product: Product) -> RepoResult<Product> {
        self.inner.write().products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update(&self, mut product: Product) -> RepoResult<Product> {
        let mut inner = self.inner.write();
        if !inner.products.contains_key(&product.id) {
            return Err(RepoError::NotFound);
        }
        product.touch();
        inner.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        match self.inner.write().products.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl PhotoRepository for MemoryStore {
    async fn list(&self, filter: PhotoFilter) -> RepoResult<Vec<Photo>> {
        let inner = self.inner.read();
        let mut photos: Vec<Photo> = inner
            .photos
            .values()
            .filter(|p| p.in_portfolio || !filter.portfolio_only)
            .filter(|p| category_matches(filter.category.as_deref(), &p.category))
            .cloned()
            .collect();
        sort_newest_first(&mut photos, |p| (p.created_at, p.id));
        Ok(photos)
    }

    async fn get(&self, id: Uuid) -> RepoResult<Option<Photo>> {
        Ok(self.inner.read().photos.get(&id).cloned())
    }

    async fn create(&self, photo: Photo) -> RepoResult<Photo> {
        self.inner.write().photos.insert(photo.id, photo.clone());
        Ok(photo)
    }

    async fn update(&self, photo: Photo) -> RepoResult<Photo> {
        let mut inner = self.inner.write();
        if !inner.photos.contains_key(&photo.id) {
            return Err(RepoError::NotFound);
        }
        inner.photos.insert(photo.id, photo.clone());
        Ok(photo)
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        match self.inner.write().photos.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn place_order(&self, order: &Order, items: &[OrderItem]) -> RepoResult<()> {
        let mut inner = self.inner.write();

        // Validate every line before applying anything, so a short line
        // leaves no trace. Cart lines are unique per product id.
        let mut decremented = Vec::with_capacity(items.len());
        for item in items {
            let remaining = inner
                .products
                .get(&item.product_id)
                .filter(|p| p.available)
                .and_then(|p| p.stock.subtract(item.quantity))
                .ok_or_else(|| RepoError::InsufficientStock {
                    product: item.product_name.clone(),
                })?;
            decremented.push((item.product_id, remaining));
        }

        for (product_id, stock) in decremented {
            if let Some(product) = inner.products.get_mut(&product_id) {
                product.stock = stock;
                product.touch();
            }
        }
        inner.orders.insert(order.id, order.clone());
        inner.order_items.insert(order.id, items.to_vec());
        Ok(())
    }

    async fn list(&self, query: ListQuery) -> RepoResult<(Vec<Order>, i64)> {
        let inner = self.inner.read();
        let mut orders: Vec<Order> = inner.orders.values().cloned().collect();
        sort_newest_first(&mut orders, |o| (o.created_at, o.id));
        let total = orders.len() as i64;
        let page = orders
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit() as usize)
            .collect();
        Ok((page, total))
    }

    async fn get(&self, id: Uuid) -> RepoResult<Option<(Order, Vec<OrderItem>)>> {
        let inner = self.inner.read();
        Ok(inner.orders.get(&id).map(|order| {
            let items = inner.order_items.get(&id).cloned().unwrap_or_default();
            (order.clone(), items)
        }))
    }

    async fn transition_status(&self, id: Uuid, to: OrderStatus) -> RepoResult<Order> {
        let mut inner = self.inner.write();
        let order = inner.orders.get_mut(&id).ok_or(RepoError::NotFound)?;
        order.transition(to).map_err(|e| match e {
            OrderError::InvalidTransition { from, to } => RepoError::InvalidTransition { from, to },
        })?;
        Ok(order.clone())
    }
}

fn sort_newest_first<T, K: Ord>(items: &mut [T], key: impl Fn(&T) -> K) {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}

fn category_matches(wanted: Option<&str>, actual: &str) -> bool {
    wanted.map_or(true, |c| c == actual)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::ContactDetails;
    use crate::domain::value_objects::{Money, Quantity};
    use rust_decimal::Decimal;

    fn product(name: &str, cents: i64, stock: u32, available: bool) -> Product {
        Product::new(
            name,
            "",
            Money::new(Decimal::new(cents, 2)),
            "",
            "prints",
            Quantity::new(stock),
            available,
        )
    }

    fn photo(title: &str, category: &str, in_portfolio: bool) -> Photo {
        let mut photo = Photo::new(title, "", category, "http://localhost/media/album-photos/x.jpg", "M. Vega");
        photo.in_portfolio = in_portfolio;
        photo
    }

    fn contact() -> ContactDetails {
        ContactDetails {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            phone: "+34 600 000 000".into(),
            address: "Calle Mayor 1".into(),
            notes: None,
        }
    }

    // `create`/`update` exist on both catalog traits, so the tests call them
    // through the trait path.
    async fn seed_product(store: &MemoryStore, p: Product) -> Product {
        ProductRepository::create(store, p).await.unwrap()
    }

    async fn seed_photo(store: &MemoryStore, p: Photo) -> Photo {
        PhotoRepository::create(store, p).await.unwrap()
    }

    #[tokio::test]
    async fn test_product_listing_hides_unavailable_by_default() {
        let store = MemoryStore::new();
        seed_product(&store, product("Visible", 1000, 5, true)).await;
        seed_product(&store, product("Hidden", 1000, 5, false)).await;

        let public = ProductRepository::list(&store, ProductFilter::default()).await.unwrap();
        assert_eq!(public.len(), 1);
        assert_eq!(public[0].name, "Visible");

        let admin = ProductRepository::list(
            &store,
            ProductFilter {
                include_unavailable: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(admin.len(), 2);
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_product() {
        let store = MemoryStore::new();
        let ghost = product("Ghost", 1000, 1, true);
        assert!(matches!(
            ProductRepository::update(&store, ghost).await,
            Err(RepoError::NotFound)
        ));
        assert!(matches!(
            ProductRepository::delete(&store, Uuid::now_v7()).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_portfolio_filter_tracks_toggle_without_deleting() {
        let store = MemoryStore::new();
        let featured = seed_photo(&store, photo("Dunes", "landscape", true)).await;
        seed_photo(&store, photo("Outtake", "landscape", false)).await;

        let list = |portfolio_only| {
            PhotoRepository::list(
                &store,
                PhotoFilter {
                    portfolio_only,
                    ..Default::default()
                },
            )
        };

        assert_eq!(list(true).await.unwrap().len(), 1);
        assert_eq!(list(false).await.unwrap().len(), 2);

        let mut toggled = featured.clone();
        toggled.in_portfolio = false;
        PhotoRepository::update(&store, toggled).await.unwrap();

        assert_eq!(list(true).await.unwrap().len(), 0);
        // The row itself survives the toggle.
        assert!(PhotoRepository::get(&store, featured.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_photo_category_filter() {
        let store = MemoryStore::new();
        seed_photo(&store, photo("Dunes", "landscape", true)).await;
        seed_photo(&store, photo("Lena", "portrait", true)).await;

        let filter = PhotoFilter {
            category: Some("portrait".into()),
            portfolio_only: true,
        };
        let photos = PhotoRepository::list(&store, filter).await.unwrap();
        assert_eq!(photos.len(), 1);
        assert_eq!(photos[0].title, "Lena");
    }

    #[tokio::test]
    async fn test_place_order_decrements_stock() {
        let store = MemoryStore::new();
        let p = seed_product(&store, product("A4", 1999, 5, true)).await;

        let (order, items) = Order::place(contact(), &[(p.clone(), 2)]);
        store.place_order(&order, &items).await.unwrap();

        let stored = ProductRepository::get(&store, p.id).await.unwrap().unwrap();
        assert_eq!(stored.stock.value(), 3);

        let (fetched, fetched_items) = OrderRepository::get(&store, order.id).await.unwrap().unwrap();
        assert_eq!(fetched.reference, order.reference);
        assert_eq!(fetched_items.len(), 1);
    }

    #[tokio::test]
    async fn test_place_order_is_all_or_nothing() {
        let store = MemoryStore::new();
        let plenty = seed_product(&store, product("Plenty", 1000, 10, true)).await;
        let scarce = seed_product(&store, product("Scarce", 1000, 1, true)).await;

        let (order, items) = Order::place(contact(), &[(plenty.clone(), 2), (scarce.clone(), 3)]);
        let err = store.place_order(&order, &items).await.unwrap_err();
        assert!(matches!(err, RepoError::InsufficientStock { ref product } if product == "Scarce"));

        // Nothing was applied: the first line's stock is intact and no order
        // row exists.
        let untouched = ProductRepository::get(&store, plenty.id).await.unwrap().unwrap();
        assert_eq!(untouched.stock.value(), 10);
        assert!(OrderRepository::get(&store, order.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_place_order_rejects_unavailable_product() {
        let store = MemoryStore::new();
        let p = seed_product(&store, product("Retired", 1000, 10, false)).await;
        let (order, items) = Order::place(contact(), &[(p, 1)]);
        assert!(matches!(
            store.place_order(&order, &items).await,
            Err(RepoError::InsufficientStock { .. })
        ));
    }

    #[tokio::test]
    async fn test_transition_status_enforces_machine() {
        let store = MemoryStore::new();
        let p = seed_product(&store, product("A4", 1999, 5, true)).await;
        let (order, items) = Order::place(contact(), &[(p, 1)]);
        store.place_order(&order, &items).await.unwrap();

        let confirmed = store
            .transition_status(order.id, OrderStatus::Confirmed)
            .await
            .unwrap();
        assert_eq!(confirmed.status, OrderStatus::Confirmed);

        let err = store
            .transition_status(order.id, OrderStatus::Pending)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::InvalidTransition { .. }));

        assert!(matches!(
            store.transition_status(Uuid::now_v7(), OrderStatus::Confirmed).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_order_list_paginates_newest_first() {
        let store = MemoryStore::new();
        let p = seed_product(&store, product("A4", 1999, 100, true)).await;
        for _ in 0..5 {
            let (order, items) = Order::place(contact(), &[(p.clone(), 1)]);
            store.place_order(&order, &items).await.unwrap();
        }

        let (page, total) = OrderRepository::list(&store, ListQuery::new(Some(1), Some(2)))
            .await
            .unwrap();
        assert_eq!(total, 5);
        assert_eq!(page.len(), 2);

        let (rest, _) = OrderRepository::list(&store, ListQuery::new(Some(3), Some(2)))
            .await
            .unwrap();
        assert_eq!(rest.len(), 1);
    }
}
