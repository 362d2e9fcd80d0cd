// src/web/routes.rs

use actix_web::web;

use crate::web::handlers::{catalog_handlers, order_handlers, tracking_handlers};

// In a real deployment this might check DB connectivity as well.
async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Registers the storefront's routes. Paths keep the shop's public URL shape;
/// `NormalizePath::trim` (applied in `main.rs`) makes the trailing-slash
/// variants route here too.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .route("/health", web::get().to(health_check_handler))
    // Catalog browsing
    .route("/", web::get().to(catalog_handlers::index_handler))
    .route("/catalogo", web::get().to(catalog_handlers::list_catalog_handler))
    .route(
      "/producto/{product_id}",
      web::get().to(catalog_handlers::product_detail_handler),
    )
    // Order submission and one-time confirmation
    .service(
      web::scope("/solicitar-pedido")
        .route("", web::get().to(order_handlers::order_form_handler))
        .route("", web::post().to(order_handlers::submit_order_handler)),
    )
    .route("/pedido-exitoso", web::get().to(order_handlers::order_confirmation_handler))
    // Tracking by opaque token
    .route(
      "/seguimiento/{token}",
      web::get().to(tracking_handlers::track_order_handler),
    );
}
