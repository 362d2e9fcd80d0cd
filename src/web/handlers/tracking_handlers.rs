// src/web/handlers/tracking_handlers.rs

//! Read-only order tracking. Possession of the (high-entropy, server
//! generated) token is the sole access control on this surface.

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::order_service;
use crate::state::AppState;

/// Resolves a tracking token to the order snapshot plus its reference
/// images. Unknown tokens and strings that are not tokens at all are the
/// same not-found condition.
#[instrument(name = "handler::track_order", skip(app_state, path), fields(token = %path.as_ref()))]
pub async fn track_order_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let raw_token = path.into_inner();

  let token = Uuid::parse_str(&raw_token).map_err(|_| {
    warn!("Tracking request with malformed token.");
    AppError::NotFound("No order matches that tracking token.".to_string())
  })?;

  let Some(order) = order_service::find_by_token(&app_state.db_pool, token).await? else {
    warn!("Tracking request for unknown token.");
    return Err(AppError::NotFound("No order matches that tracking token.".to_string()));
  };

  let images = order_service::list_reference_images(&app_state.db_pool, order.id).await?;

  Ok(HttpResponse::Ok().json(json!({
      "order": order,
      "reference_images": images
  })))
}
