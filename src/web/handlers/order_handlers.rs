// src/web/handlers/order_handlers.rs

//! Order submission and the session-gated, one-time confirmation page.

use actix_session::Session;
use actix_web::http::header;
use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::models::Product;
use crate::services::order_service::{self, NewOrder};
use crate::state::AppState;

// Session keys carrying (order id, token) from submission to the single
// confirmation render.
const SESSION_LAST_ORDER_ID: &str = "last_order_id";
const SESSION_LAST_ORDER_TOKEN: &str = "last_order_token";

const CONFIRMATION_PATH: &str = "/pedido-exitoso/";
const HOME_PATH: &str = "/";

fn redirect_to(location: &str) -> HttpResponse {
  HttpResponse::Found()
    .insert_header((header::LOCATION, location))
    .finish()
}

// --- Order form (GET) ---

#[derive(Deserialize, Debug)]
pub struct OrderFormQuery {
  // Raw string: an id that does not resolve is silently ignored.
  pub producto: Option<String>,
}

/// Seed document for the order form. `?producto=<id>` pre-fills a reference
/// product when it resolves; unknown, non-numeric, and even inactive ids all
/// degrade to an empty pre-fill rather than an error.
#[instrument(name = "handler::order_form", skip(app_state, query_params))]
pub async fn order_form_handler(
  app_state: web::Data<AppState>,
  query_params: web::Query<OrderFormQuery>,
) -> Result<HttpResponse, AppError> {
  let referenced_product: Option<Product> = match query_params.producto.as_deref().and_then(|raw| raw.parse::<i64>().ok())
  {
    Some(product_id) => {
      sqlx::query_as(
        "SELECT id, category_id, name, description, base_price_cents, image_url, active, created_at, updated_at \
         FROM products WHERE id = $1",
      )
      .bind(product_id)
      .fetch_optional(&app_state.db_pool)
      .await?
    }
    None => None,
  };

  Ok(HttpResponse::Ok().json(json!({ "referenced_product": referenced_product })))
}

// --- Order submission (POST) ---

const MAX_NAME_LEN: usize = 120;
const MAX_EMAIL_LEN: usize = 254;
const MAX_PHONE_LEN: usize = 40;
const MAX_PLATFORM_LEN: usize = 80;
const MAX_DESCRIPTION_LEN: usize = 4000;

/// The submission form as posted by the client. Fulfillment/payment statuses
/// and the tracking token are not part of the form on purpose; the store
/// assigns them.
#[derive(Deserialize, Debug)]
pub struct OrderSubmission {
  pub customer_name: String,
  pub email: String,
  pub phone: String,
  pub social_platform: String,
  /// Raw form value; HTML selects post an empty string for "no product".
  pub reference_product_id: Option<String>,
  pub design_description: String,
  /// `YYYY-MM-DD`; HTML forms post blank for "no date".
  pub requested_date: Option<String>,
}

impl OrderSubmission {
  /// Form-level validation and normalization, producing the service input.
  pub fn validate(&self) -> Result<NewOrder, AppError> {
    let customer_name = self.customer_name.trim();
    if customer_name.is_empty() {
      return Err(AppError::Validation("Customer name is required.".to_string()));
    }
    if customer_name.len() > MAX_NAME_LEN {
      return Err(AppError::Validation("Customer name is too long.".to_string()));
    }

    let email = self.email.trim();
    if email.is_empty() || !email.contains('@') {
      return Err(AppError::Validation("A valid email is required.".to_string()));
    }
    if email.len() > MAX_EMAIL_LEN {
      return Err(AppError::Validation("Email is too long.".to_string()));
    }

    let phone = self.phone.trim();
    if phone.is_empty() {
      return Err(AppError::Validation("A contact phone is required.".to_string()));
    }
    if phone.len() > MAX_PHONE_LEN {
      return Err(AppError::Validation("Phone is too long.".to_string()));
    }

    let social_platform = self.social_platform.trim();
    if social_platform.is_empty() {
      return Err(AppError::Validation("The originating social platform is required.".to_string()));
    }
    if social_platform.len() > MAX_PLATFORM_LEN {
      return Err(AppError::Validation("Social platform is too long.".to_string()));
    }

    let design_description = self.design_description.trim();
    if design_description.is_empty() {
      return Err(AppError::Validation("A design description is required.".to_string()));
    }
    if design_description.len() > MAX_DESCRIPTION_LEN {
      return Err(AppError::Validation("Design description is too long.".to_string()));
    }

    let reference_product_id = match self.reference_product_id.as_deref().map(str::trim) {
      None | Some("") => None,
      Some(raw) => Some(
        raw
          .parse::<i64>()
          .map_err(|_| AppError::Validation("Referenced product id is not valid.".to_string()))?,
      ),
    };

    let requested_date = match self.requested_date.as_deref().map(str::trim) {
      None | Some("") => None,
      Some(raw) => Some(
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
          .map_err(|_| AppError::Validation("Requested date must be YYYY-MM-DD.".to_string()))?,
      ),
    };

    Ok(NewOrder {
      customer_name: customer_name.to_string(),
      email: email.to_string(),
      phone: phone.to_string(),
      social_platform: social_platform.to_string(),
      reference_product_id,
      design_description: design_description.to_string(),
      requested_date,
    })
  }
}

/// Creates the order, stashes `(order id, token)` in the client's session for
/// exactly one confirmation render, and redirects there.
#[instrument(name = "handler::submit_order", skip(app_state, session, form))]
pub async fn submit_order_handler(
  app_state: web::Data<AppState>,
  session: Session,
  form: web::Form<OrderSubmission>,
) -> Result<HttpResponse, AppError> {
  let new_order = form.validate()?;

  let order = order_service::create_order(&app_state.db_pool, &new_order).await?;

  session.insert(SESSION_LAST_ORDER_ID, order.id)?;
  session.insert(SESSION_LAST_ORDER_TOKEN, order.tracking_token.to_string())?;

  info!("Order created; redirecting to confirmation.");
  Ok(
    HttpResponse::SeeOther()
      .insert_header((header::LOCATION, CONFIRMATION_PATH))
      .finish(),
  )
}

// --- One-time confirmation (GET) ---

/// One-time confirmation page. Reads `(order id, token)` from the session;
/// if either is missing — direct navigation, a refresh after the first
/// render, or an expired session — it redirects home, as it does when the
/// order was deleted in the meantime. On success the session keys are cleared
/// so the token is disclosed exactly once.
#[instrument(name = "handler::order_confirmation", skip(app_state, session))]
pub async fn order_confirmation_handler(
  app_state: web::Data<AppState>,
  session: Session,
) -> Result<HttpResponse, AppError> {
  let order_id = session.get::<i64>(SESSION_LAST_ORDER_ID)?;
  let token = session.get::<String>(SESSION_LAST_ORDER_TOKEN)?;

  let (order_id, _token) = match (order_id, token) {
    (Some(order_id), Some(token)) => (order_id, token),
    _ => {
      info!("Confirmation visited without a pending order; redirecting home.");
      return Ok(redirect_to(HOME_PATH));
    }
  };

  let Some(order) = order_service::find_by_id(&app_state.db_pool, order_id).await? else {
    warn!("Pending order {} no longer exists; redirecting home.", order_id);
    return Ok(redirect_to(HOME_PATH));
  };

  // Relative URL: the browser supplies the host, so the link survives
  // proxies and forwarded-host setups.
  let tracking_url = format!("/seguimiento/{}/", order.tracking_token);

  let body = json!({
      "order": order,
      "tracking_url": tracking_url
  });

  // One-time disclosure: drop the keys before answering so a refresh takes
  // the redirect branch above.
  session.remove(SESSION_LAST_ORDER_ID);
  session.remove(SESSION_LAST_ORDER_TOKEN);

  Ok(HttpResponse::Ok().json(body))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn valid_submission() -> OrderSubmission {
    OrderSubmission {
      customer_name: "Ana Rojas".to_string(),
      email: "ana@example.com".to_string(),
      phone: "+56 9 1234 5678".to_string(),
      social_platform: "instagram".to_string(),
      reference_product_id: Some("3".to_string()),
      design_description: "Taza con el logo del club".to_string(),
      requested_date: Some("2026-09-01".to_string()),
    }
  }

  #[test]
  fn valid_submission_normalizes_into_new_order() {
    let new_order = valid_submission().validate().unwrap();
    assert_eq!(new_order.customer_name, "Ana Rojas");
    assert_eq!(new_order.reference_product_id, Some(3));
    assert_eq!(
      new_order.requested_date,
      Some(NaiveDate::from_ymd_opt(2026, 9, 1).unwrap())
    );
  }

  #[test]
  fn blank_requested_date_means_no_date() {
    let mut submission = valid_submission();
    submission.requested_date = Some("  ".to_string());
    assert_eq!(submission.validate().unwrap().requested_date, None);

    submission.requested_date = None;
    assert_eq!(submission.validate().unwrap().requested_date, None);
  }

  #[test]
  fn blank_reference_product_means_fully_custom() {
    let mut submission = valid_submission();
    submission.reference_product_id = Some(String::new());
    assert_eq!(submission.validate().unwrap().reference_product_id, None);

    submission.reference_product_id = None;
    assert_eq!(submission.validate().unwrap().reference_product_id, None);
  }

  #[test]
  fn non_numeric_reference_product_is_rejected() {
    let mut submission = valid_submission();
    submission.reference_product_id = Some("abc".to_string());
    assert!(matches!(submission.validate(), Err(AppError::Validation(_))));
  }

  #[test]
  fn malformed_requested_date_is_rejected() {
    let mut submission = valid_submission();
    submission.requested_date = Some("01/09/2026".to_string());
    assert!(matches!(submission.validate(), Err(AppError::Validation(_))));
  }

  #[test]
  fn required_fields_must_not_be_blank() {
    let mut submission = valid_submission();
    submission.customer_name = "   ".to_string();
    assert!(matches!(submission.validate(), Err(AppError::Validation(_))));

    let mut submission = valid_submission();
    submission.email = "not-an-email".to_string();
    assert!(matches!(submission.validate(), Err(AppError::Validation(_))));

    let mut submission = valid_submission();
    submission.design_description = String::new();
    assert!(matches!(submission.validate(), Err(AppError::Validation(_))));
  }

  #[test]
  fn overlong_fields_are_rejected() {
    let mut submission = valid_submission();
    submission.customer_name = "x".repeat(MAX_NAME_LEN + 1);
    assert!(matches!(submission.validate(), Err(AppError::Validation(_))));

    let mut submission = valid_submission();
    submission.design_description = "x".repeat(MAX_DESCRIPTION_LEN + 1);
    assert!(matches!(submission.validate(), Err(AppError::Validation(_))));
  }
}
