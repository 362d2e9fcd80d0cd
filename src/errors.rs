// src/errors.rs

use actix_session::{SessionGetError, SessionInsertError};
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Database Migration Error: {0}")]
  Migrate(#[from] sqlx::migrate::MigrateError),

  #[error("Session Error: {0}")]
  Session(String),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl From<SessionGetError> for AppError {
  fn from(err: SessionGetError) -> Self {
    AppError::Session(err.to_string())
  }
}

impl From<SessionInsertError> for AppError {
  fn from(err: SessionInsertError) -> Self {
    AppError::Session(err.to_string())
  }
}

impl ResponseError for AppError {
  fn error_response(&self) -> HttpResponse {
    // Log the full error when it's turned into a response
    tracing::error!(application_error = %self, "Responding with error");
    match self {
      AppError::Validation(m) => HttpResponse::BadRequest().json(json!({"error": m})),
      AppError::NotFound(m) => HttpResponse::NotFound().json(json!({"error": m})),
      AppError::Config(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "Configuration issue", "detail": m}))
      }
      // Never leak query or schema details to the client.
      AppError::Sqlx(_) | AppError::Migrate(_) => {
        HttpResponse::InternalServerError().json(json!({"error": "Database operation failed"}))
      }
      AppError::Session(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "Session state error", "detail": m}))
      }
      AppError::Internal(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "An internal error occurred", "detail": m}))
      }
    }
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
