//! Photo aggregate

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A gallery photo.
///
/// `in_portfolio` drives the public featured listing and is toggled
/// independently of deletion; the row (and the stored image it points at)
/// survives the toggle.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Photo {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    /// Public URL of the stored image. Required: a photo row without an
    /// image is rejected before it is ever written.
    pub image: String,
    pub author: String,
    pub taken_at: Option<NaiveDate>,
    pub location: Option<String>,
    pub camera: Option<String>,
    pub lens: Option<String>,
    pub settings: Option<String>,
    pub in_portfolio: bool,
    pub created_at: DateTime<Utc>,
}

impl Photo {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        image: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            title: title.into(),
            description: description.into(),
            category: category.into(),
            image: image.into(),
            author: author.into(),
            taken_at: None,
            location: None,
            camera: None,
            lens: None,
            settings: None,
            in_portfolio: false,
            created_at: Utc::now(),
        }
    }
}
