// src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;

// actix_web::cookie::Key::derive_from panics below this.
const MIN_SESSION_SECRET_BYTES: usize = 32;

const DEV_SESSION_SECRET: &str = "insecure-dev-session-secret-0123456789abcdef0123456789abcdef";

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,

  /// Storefront display name, surfaced on the home document. Explicit
  /// configuration rather than process-wide mutable state.
  pub site_name: String,

  /// Key material for signing the session cookie.
  pub session_secret: String,
  pub session_cookie_secure: bool,

  /// Seed a demo catalog on startup when the catalog is empty.
  pub seed_db: bool,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL")?;
    let site_name = get_env("SITE_NAME").unwrap_or_else(|_| "Tienda Personalizados".to_string());

    let session_secret = match get_env("SESSION_SECRET") {
      Ok(secret) => secret,
      Err(_) => {
        tracing::warn!("SESSION_SECRET is not set; using the insecure development default.");
        DEV_SESSION_SECRET.to_string()
      }
    };
    if session_secret.len() < MIN_SESSION_SECRET_BYTES {
      return Err(AppError::Config(format!(
        "SESSION_SECRET must be at least {} bytes, got {}",
        MIN_SESSION_SECRET_BYTES,
        session_secret.len()
      )));
    }

    let session_cookie_secure = get_env("SESSION_COOKIE_SECURE")
      .unwrap_or_else(|_| "false".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid SESSION_COOKIE_SECURE value: {}", e)))?;

    let seed_db = get_env("SEED_DB")
      .unwrap_or_else(|_| "false".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid SEED_DB value: {}", e)))?;

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      database_url,
      site_name,
      session_secret,
      session_cookie_secure,
      seed_db,
    })
  }
}
