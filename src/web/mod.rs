// src/web/mod.rs

// Declare child modules
pub mod handlers;
pub mod routes;

// Re-export so main.rs and the integration tests can configure the app.
pub use routes::configure_app_routes;
