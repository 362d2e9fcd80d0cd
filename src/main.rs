// src/main.rs

use tienda_personalizados::config::AppConfig;
use tienda_personalizados::db;
use tienda_personalizados::state::AppState;
use tienda_personalizados::web::configure_app_routes;

use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::Key;
use actix_web::{middleware, web as actix_data, App, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan; // For span events in tracing

const SESSION_COOKIE_NAME: &str = "tienda_session";

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  // Initialize tracing subscriber for logging
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO) // Default level
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE) // Log when spans close, showing duration
    .init();

  tracing::info!("Starting storefront server...");

  let app_config = Arc::new(AppConfig::from_env().context("Failed to load application configuration")?);

  let db_pool = db::init_pool(&app_config.database_url)
    .await
    .context("Failed to connect to the database")?;
  tracing::info!("Successfully connected to the database.");

  db::run_migrations(&db_pool).await.context("Failed to apply database migrations")?;

  if app_config.seed_db {
    db::seed_catalog(&db_pool).await.context("Failed to seed the catalog")?;
  }

  let app_state = AppState {
    db_pool: db_pool.clone(),
    config: app_config.clone(),
  };

  // The session cookie carries only the (order id, token) pair between the
  // order submission and the one-time confirmation page.
  let session_key = Key::derive_from(app_config.session_secret.as_bytes());
  let cookie_secure = app_config.session_cookie_secure;

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone())) // Share AppState with handlers
      .wrap(
        SessionMiddleware::builder(CookieSessionStore::default(), session_key.clone())
          .cookie_name(SESSION_COOKIE_NAME.to_string())
          .cookie_secure(cookie_secure)
          .build(),
      )
      .wrap(middleware::NormalizePath::trim()) // `/catalogo/` and `/catalogo` both route
      .wrap(tracing_actix_web::TracingLogger::default()) // Actix middleware for tracing requests
      .configure(configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
  .context("Server run failed")
}
