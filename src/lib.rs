//! Atelier Studio
//!
//! Backend for a photographer's portfolio site with a small print shop.
//!
//! ## Features
//! - Public catalog and portfolio listings, with a server-sent photo feed
//! - Session-keyed carts and an atomic checkout that reprices from the catalog
//! - Admin management of products, photos and orders behind bearer-token auth
//! - Image uploads into per-purpose buckets, served back from `/media`
//! - Postgres or in-memory persistence behind one repository layer

pub mod api;
pub mod auth;
pub mod carts;
pub mod checkout;
pub mod config;
pub mod domain;
pub mod error;
pub mod events;
pub mod repo;
pub mod storage;

pub use config::Config;
pub use error::AppError;
