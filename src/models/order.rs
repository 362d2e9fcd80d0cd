// src/models/order.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::{FromRow, Type as SqlxType};
use uuid::Uuid; // Renamed Type to SqlxType to avoid conflict

/// Fulfillment state of an order. Mutated only by staff tooling; the
/// customer-facing flow creates orders as `Received` and never moves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, SqlxType)]
#[sqlx(type_name = "order_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
  Received,
  InReview,
  InProduction,
  Completed,
  Cancelled,
}

/// Payment state, independent of fulfillment. Custom work is commonly paid
/// in two legs, so a deposit state sits between unpaid and paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, SqlxType)]
#[sqlx(type_name = "payment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
  Unpaid,
  DepositPaid,
  Paid,
}

/// A custom-order request.
///
/// Customers are handed `tracking_token` instead of the row id; everything
/// marked `skip_serializing` stays off customer-facing pages.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
  #[serde(skip_serializing)] // Storage-internal; the token is the public identifier
  pub id: i64,
  pub tracking_token: Uuid,
  pub customer_name: String,
  pub email: String,
  pub phone: String,
  pub social_platform: String,
  pub reference_product_id: Option<i64>,
  pub design_description: String,
  pub requested_date: Option<NaiveDate>,
  pub status: OrderStatus,
  pub payment_status: PaymentStatus,
  #[serde(skip_serializing)] // Staff-only
  pub approved_budget_cents: Option<i64>,
  #[serde(skip_serializing)] // Staff-only
  pub internal_notes: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;

  fn sample_order() -> Order {
    Order {
      id: 42,
      tracking_token: Uuid::new_v4(),
      customer_name: "Ana Rojas".to_string(),
      email: "ana@example.com".to_string(),
      phone: "+56 9 1234 5678".to_string(),
      social_platform: "instagram".to_string(),
      reference_product_id: None,
      design_description: "Taza con logo".to_string(),
      requested_date: None,
      status: OrderStatus::Received,
      payment_status: PaymentStatus::Unpaid,
      approved_budget_cents: Some(15_000),
      internal_notes: Some("cliente frecuente".to_string()),
      created_at: Utc.with_ymd_and_hms(2025, 8, 1, 12, 0, 0).unwrap(),
      updated_at: Utc.with_ymd_and_hms(2025, 8, 1, 12, 0, 0).unwrap(),
    }
  }

  #[test]
  fn status_enums_serialize_with_wire_names() {
    assert_eq!(serde_json::to_value(OrderStatus::InReview).unwrap(), "in_review");
    assert_eq!(serde_json::to_value(OrderStatus::Received).unwrap(), "received");
    assert_eq!(serde_json::to_value(PaymentStatus::DepositPaid).unwrap(), "deposit_paid");
    assert_eq!(serde_json::to_value(PaymentStatus::Unpaid).unwrap(), "unpaid");
  }

  #[test]
  fn staff_only_and_internal_fields_are_not_serialized() {
    let value = serde_json::to_value(sample_order()).unwrap();
    let obj = value.as_object().unwrap();
    assert!(!obj.contains_key("id"));
    assert!(!obj.contains_key("approved_budget_cents"));
    assert!(!obj.contains_key("internal_notes"));
    // The customer-visible identity and statuses are present.
    assert!(obj.contains_key("tracking_token"));
    assert_eq!(obj["status"], "received");
    assert_eq!(obj["payment_status"], "unpaid");
  }
}
