//! Atelier Studio backend service

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use atelier_studio::api::{self, AppState};
use atelier_studio::auth::AuthService;
use atelier_studio::carts::CartStore;
use atelier_studio::config::Config;
use atelier_studio::events::EventBus;
use atelier_studio::repo::{
    MemoryStore, OrderRepository, PgStore, PhotoRepository, ProductRepository,
};
use atelier_studio::storage::FsStorage;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    let (products, photos, orders): (
        Arc<dyn ProductRepository>,
        Arc<dyn PhotoRepository>,
        Arc<dyn OrderRepository>,
    ) = match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new().max_connections(10).connect(url).await?;
            sqlx::migrate!("./migrations").run(&pool).await?;
            tracing::info!("connected to postgres");
            let store = Arc::new(PgStore::new(pool));
            (store.clone(), store.clone(), store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, falling back to the in-memory store");
            let store = Arc::new(MemoryStore::new());
            (store.clone(), store.clone(), store)
        }
    };

    let nats = match &config.nats_url {
        Some(url) => match async_nats::connect(url.as_str()).await {
            Ok(client) => {
                tracing::info!("connected to nats");
                Some(client)
            }
            Err(e) => {
                tracing::warn!("failed to connect to nats, events stay in-process: {e}");
                None
            }
        },
        None => None,
    };
    let events = EventBus::new(nats, config.nats_subject_prefix.as_str());

    let ttl = chrono::Duration::hours(config.session_ttl_hours);
    let auth = match (&config.admin_password_hash, &config.admin_password) {
        (Some(hash), _) => AuthService::new(config.admin_email.clone(), hash.clone(), ttl),
        (None, Some(password)) => {
            AuthService::with_plain_password(config.admin_email.clone(), password, ttl)?
        }
        (None, None) => {
            tracing::warn!("ADMIN_PASSWORD not set, using the development default");
            AuthService::with_plain_password(config.admin_email.clone(), "admin", ttl)?
        }
    };

    let state = AppState {
        products,
        photos,
        orders,
        carts: Arc::new(CartStore::new()),
        storage: Arc::new(FsStorage::new(
            &config.storage_root,
            config.public_base_url.clone(),
        )),
        auth: Arc::new(auth),
        events,
    };
    let app = api::router(state, &config.storage_root);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Atelier Studio listening on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
