// src/web/handlers/catalog_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::models::{Category, Product};
use crate::state::AppState;

/// Products shown on the home page.
const FEATURED_PRODUCT_COUNT: i64 = 6;
/// Catalog page size.
const CATALOG_PAGE_SIZE: i64 = 12;

const PRODUCT_COLUMNS: &str =
  "id, category_id, name, description, base_price_cents, image_url, active, created_at, updated_at";

async fn fetch_categories(app_state: &AppState) -> Result<Vec<Category>, AppError> {
  let categories = sqlx::query_as::<_, Category>("SELECT id, name, description FROM categories ORDER BY name ASC")
    .fetch_all(&app_state.db_pool)
    .await?;
  Ok(categories)
}

#[instrument(name = "handler::index", skip(app_state))]
pub async fn index_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let featured: Vec<Product> = sqlx::query_as(&format!(
    "SELECT {PRODUCT_COLUMNS} FROM products WHERE active = TRUE ORDER BY created_at DESC, id DESC LIMIT $1"
  ))
  .bind(FEATURED_PRODUCT_COUNT)
  .fetch_all(&app_state.db_pool)
  .await?;

  let categories = fetch_categories(&app_state).await?;

  Ok(HttpResponse::Ok().json(json!({
      "site": app_state.config.site_name,
      "featured_products": featured,
      "categories": categories
  })))
}

#[derive(Deserialize, Debug)]
pub struct CatalogQuery {
  // Kept as raw strings: malformed values are ignored, never an error.
  pub categoria: Option<String>,
  pub page: Option<String>,
}

impl CatalogQuery {
  fn category_id(&self) -> Option<i64> {
    self.categoria.as_deref().and_then(|raw| raw.parse::<i64>().ok())
  }

  fn page(&self) -> i64 {
    self
      .page
      .as_deref()
      .and_then(|raw| raw.parse::<i64>().ok())
      .filter(|&p| p >= 1)
      .unwrap_or(1)
  }
}

/// Total pages for `total` rows at `per_page` rows each; an empty catalog
/// still has one (empty) page.
fn page_count(total: i64, per_page: i64) -> i64 {
  ((total + per_page - 1) / per_page).max(1)
}

#[instrument(name = "handler::list_catalog", skip(app_state, query_params))]
pub async fn list_catalog_handler(
  app_state: web::Data<AppState>,
  query_params: web::Query<CatalogQuery>,
) -> Result<HttpResponse, AppError> {
  let category_id = query_params.category_id();
  let page = query_params.page();
  let offset = (page - 1) * CATALOG_PAGE_SIZE;

  let (total, products): (i64, Vec<Product>) = match category_id {
    Some(category_id) => {
      let total = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE active = TRUE AND category_id = $1")
        .bind(category_id)
        .fetch_one(&app_state.db_pool)
        .await?;
      let products = sqlx::query_as(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE active = TRUE AND category_id = $1 \
         ORDER BY name ASC, id ASC LIMIT $2 OFFSET $3"
      ))
      .bind(category_id)
      .bind(CATALOG_PAGE_SIZE)
      .bind(offset)
      .fetch_all(&app_state.db_pool)
      .await?;
      (total, products)
    }
    None => {
      let total = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE active = TRUE")
        .fetch_one(&app_state.db_pool)
        .await?;
      let products = sqlx::query_as(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE active = TRUE ORDER BY name ASC, id ASC LIMIT $1 OFFSET $2"
      ))
      .bind(CATALOG_PAGE_SIZE)
      .bind(offset)
      .fetch_all(&app_state.db_pool)
      .await?;
      (total, products)
    }
  };

  let categories = fetch_categories(&app_state).await?;
  info!("Catalog page {} listed {} of {} products.", page, products.len(), total);

  Ok(HttpResponse::Ok().json(json!({
      "products": products,
      "categories": categories,
      "current_category": category_id,
      "page": page,
      "total_pages": page_count(total, CATALOG_PAGE_SIZE),
      "total_products": total
  })))
}

#[instrument(name = "handler::product_detail", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn product_detail_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();

  // Inactive products are withdrawn from the public catalog, so they 404
  // exactly like ids that never existed.
  let product_opt: Option<Product> = sqlx::query_as(&format!(
    "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1 AND active = TRUE"
  ))
  .bind(product_id)
  .fetch_optional(&app_state.db_pool)
  .await?;

  match product_opt {
    Some(product) => Ok(HttpResponse::Ok().json(json!({ "product": product }))),
    None => {
      warn!("Product with ID {} not found or inactive.", product_id);
      Err(AppError::NotFound(format!("Product with ID {} not found.", product_id)))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn page_count_rounds_up_and_never_reports_zero_pages() {
    assert_eq!(page_count(0, 12), 1);
    assert_eq!(page_count(1, 12), 1);
    assert_eq!(page_count(12, 12), 1);
    assert_eq!(page_count(13, 12), 2);
    assert_eq!(page_count(25, 12), 3);
  }

  #[test]
  fn catalog_query_ignores_malformed_values() {
    let query = CatalogQuery {
      categoria: Some("abc".to_string()),
      page: Some("-3".to_string()),
    };
    assert_eq!(query.category_id(), None);
    assert_eq!(query.page(), 1);

    let query = CatalogQuery {
      categoria: Some("5".to_string()),
      page: Some("2".to_string()),
    };
    assert_eq!(query.category_id(), Some(5));
    assert_eq!(query.page(), 2);

    let query = CatalogQuery {
      categoria: None,
      page: None,
    };
    assert_eq!(query.category_id(), None);
    assert_eq!(query.page(), 1);
  }
}
