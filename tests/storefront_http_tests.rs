// tests/storefront_http_tests.rs
//
// Route behavior that must hold before the database is ever consulted: the
// session-gated confirmation redirect, token parsing, and form validation.
// These run against a lazy pool, so no live Postgres is required.

mod common;

use actix_web::http::{header, StatusCode};
use actix_web::{middleware, test, web, App};
use serde_json::json;

use tienda_personalizados::web::configure_app_routes;

macro_rules! storefront_app {
  () => {
    test::init_service(
      App::new()
        .app_data(web::Data::new(common::lazy_state()))
        .wrap(common::session_middleware())
        .wrap(middleware::NormalizePath::trim())
        .configure(configure_app_routes),
    )
    .await
  };
}

#[actix_web::test]
async fn health_check_answers_ok() {
  common::setup_tracing();
  let app = storefront_app!();

  let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn confirmation_without_session_redirects_home() {
  common::setup_tracing();
  let app = storefront_app!();

  let resp = test::call_service(&app, test::TestRequest::get().uri("/pedido-exitoso/").to_request()).await;

  assert_eq!(resp.status(), StatusCode::FOUND);
  assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/");
}

#[actix_web::test]
async fn tracking_with_malformed_token_is_not_found() {
  common::setup_tracing();
  let app = storefront_app!();

  let resp = test::call_service(
    &app,
    test::TestRequest::get().uri("/seguimiento/not-a-token/").to_request(),
  )
  .await;

  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn submission_with_blank_name_is_rejected_before_storage() {
  common::setup_tracing();
  let app = storefront_app!();

  let resp = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/solicitar-pedido/")
      .set_form(json!({
          "customer_name": "   ",
          "email": "ana@example.com",
          "phone": "+56 9 1234 5678",
          "social_platform": "instagram",
          "design_description": "Taza con logo"
      }))
      .to_request(),
  )
  .await;

  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn submission_with_malformed_date_is_rejected_before_storage() {
  common::setup_tracing();
  let app = storefront_app!();

  let resp = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/solicitar-pedido/")
      .set_form(json!({
          "customer_name": "Ana Rojas",
          "email": "ana@example.com",
          "phone": "+56 9 1234 5678",
          "social_platform": "instagram",
          "design_description": "Taza con logo",
          "requested_date": "01-09-2026"
      }))
      .to_request(),
  )
  .await;

  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn order_form_seed_silently_ignores_malformed_product_param() {
  common::setup_tracing();
  let app = storefront_app!();

  let body: serde_json::Value = test::call_and_read_body_json(
    &app,
    test::TestRequest::get()
      .uri("/solicitar-pedido/?producto=abc")
      .to_request(),
  )
  .await;

  assert_eq!(body["referenced_product"], serde_json::Value::Null);
}
