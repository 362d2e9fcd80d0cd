// src/models/reference_image.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A reference image attached to an order by staff (upload itself happens on
/// the administrative surface). Owned exclusively by the order; rows cascade
/// away with it.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ReferenceImage {
  #[serde(skip_serializing)]
  pub id: i64,
  #[serde(skip_serializing)] // Internal order ids never reach customers
  pub order_id: i64,
  pub image_path: String,
  pub caption: String,
  pub uploaded_at: DateTime<Utc>,
}
