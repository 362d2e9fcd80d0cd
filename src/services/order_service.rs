// src/services/order_service.rs

//! Order store access: creation with a server-assigned tracking token, plus
//! the read paths used by the confirmation and tracking pages.

use crate::errors::{AppError, Result};
use crate::models::{Order, ReferenceImage};
use sqlx::PgPool;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// UNIQUE constraint backing the tracking token, from the initial migration.
const TOKEN_UNIQUE_CONSTRAINT: &str = "orders_tracking_token_key";
const REFERENCE_PRODUCT_FK_CONSTRAINT: &str = "orders_reference_product_id_fkey";

/// A v4 UUID colliding even once is already a cosmic-ray event; a handful of
/// retries is plenty to make insertion effectively infallible.
const TOKEN_INSERT_ATTEMPTS: u32 = 4;

const ORDER_COLUMNS: &str = "id, tracking_token, customer_name, email, phone, social_platform, \
   reference_product_id, design_description, requested_date, status, payment_status, \
   approved_budget_cents, internal_notes, created_at, updated_at";

/// Validated input for a new order, produced by the submission form.
///
/// Statuses, token, and timestamps are deliberately absent: the store assigns
/// them and clients cannot influence them.
#[derive(Debug, Clone)]
pub struct NewOrder {
  pub customer_name: String,
  pub email: String,
  pub phone: String,
  pub social_platform: String,
  pub reference_product_id: Option<i64>,
  pub design_description: String,
  pub requested_date: Option<chrono::NaiveDate>,
}

/// Persists a new order with a freshly generated tracking token and default
/// statuses, returning the stored row.
///
/// Token uniqueness is enforced by the store's UNIQUE constraint; on the
/// (astronomically unlikely) collision this regenerates and retries rather
/// than coordinating across requests.
#[instrument(name = "order_service::create_order", skip(pool, new_order), fields(customer = %new_order.customer_name))]
pub async fn create_order(pool: &PgPool, new_order: &NewOrder) -> Result<Order> {
  if let Some(product_id) = new_order.reference_product_id {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)")
      .bind(product_id)
      .fetch_one(pool)
      .await?;
    if !exists {
      warn!("Order submission referenced unknown product {}.", product_id);
      return Err(AppError::Validation(format!(
        "Referenced product {} does not exist.",
        product_id
      )));
    }
  }

  let insert_sql = format!(
    "INSERT INTO orders (tracking_token, customer_name, email, phone, social_platform, \
       reference_product_id, design_description, requested_date) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
     RETURNING {ORDER_COLUMNS}"
  );

  for attempt in 1..=TOKEN_INSERT_ATTEMPTS {
    let token = Uuid::new_v4();

    let inserted = sqlx::query_as::<_, Order>(&insert_sql)
      .bind(token)
      .bind(&new_order.customer_name)
      .bind(&new_order.email)
      .bind(&new_order.phone)
      .bind(&new_order.social_platform)
      .bind(new_order.reference_product_id)
      .bind(&new_order.design_description)
      .bind(new_order.requested_date)
      .fetch_one(pool)
      .await;

    match inserted {
      Ok(order) => {
        info!("Created order with token {} on attempt {}.", order.tracking_token, attempt);
        return Ok(order);
      }
      Err(sqlx::Error::Database(db_err)) if db_err.constraint() == Some(TOKEN_UNIQUE_CONSTRAINT) => {
        warn!("Tracking token collision on attempt {}; regenerating.", attempt);
        continue;
      }
      Err(sqlx::Error::Database(db_err)) if db_err.constraint() == Some(REFERENCE_PRODUCT_FK_CONSTRAINT) => {
        // The referenced product vanished between the EXISTS check and the
        // insert; same outcome as never having existed.
        warn!("Referenced product disappeared during order insert.");
        return Err(AppError::Validation(
          "Referenced product does not exist.".to_string(),
        ));
      }
      Err(other) => return Err(AppError::Sqlx(other)),
    }
  }

  Err(AppError::Internal(
    "Could not allocate a unique tracking token.".to_string(),
  ))
}

#[instrument(name = "order_service::find_by_id", skip(pool))]
pub async fn find_by_id(pool: &PgPool, order_id: i64) -> Result<Option<Order>> {
  let order = sqlx::query_as::<_, Order>(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
    .bind(order_id)
    .fetch_optional(pool)
    .await?;
  Ok(order)
}

#[instrument(name = "order_service::find_by_token", skip(pool))]
pub async fn find_by_token(pool: &PgPool, token: Uuid) -> Result<Option<Order>> {
  let order = sqlx::query_as::<_, Order>(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE tracking_token = $1"))
    .bind(token)
    .fetch_optional(pool)
    .await?;
  Ok(order)
}

/// Reference images for an order, in upload order (ties broken by id).
#[instrument(name = "order_service::list_reference_images", skip(pool))]
pub async fn list_reference_images(pool: &PgPool, order_id: i64) -> Result<Vec<ReferenceImage>> {
  let images = sqlx::query_as::<_, ReferenceImage>(
    "SELECT id, order_id, image_path, caption, uploaded_at FROM reference_images \
     WHERE order_id = $1 ORDER BY uploaded_at ASC, id ASC",
  )
  .bind(order_id)
  .fetch_all(pool)
  .await?;
  Ok(images)
}
