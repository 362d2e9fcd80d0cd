// src/db.rs

//! Database pool construction, migrations, and optional catalog seeding.

use crate::errors::Result;
use sqlx::PgPool;
use tracing::{info, instrument};

pub async fn init_pool(database_url: &str) -> Result<PgPool> {
  let pool = PgPool::connect(database_url).await?;
  Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<()> {
  sqlx::migrate!().run(pool).await?;
  info!("Database migrations applied.");
  Ok(())
}

/// Inserts a small demo catalog so a fresh deployment has something to show.
/// Runs only when the catalog is empty; existing data is never touched.
#[instrument(name = "db::seed_catalog", skip(pool))]
pub async fn seed_catalog(pool: &PgPool) -> Result<()> {
  let product_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products").fetch_one(pool).await?;
  if product_count > 0 {
    info!("Catalog already has {} products; skipping seed.", product_count);
    return Ok(());
  }

  let categories = [
    ("Tazas", "Tazas de cerámica con diseños personalizados."),
    ("Poleras", "Poleras estampadas a pedido."),
    ("Cuadernos", "Cuadernos y agendas con tapas a medida."),
  ];

  let mut category_ids = Vec::with_capacity(categories.len());
  for (name, description) in categories {
    let id: i64 = sqlx::query_scalar("INSERT INTO categories (name, description) VALUES ($1, $2) RETURNING id")
      .bind(name)
      .bind(description)
      .fetch_one(pool)
      .await?;
    category_ids.push(id);
  }

  let products: [(&str, &str, i64, i64); 6] = [
    ("Taza clásica", "Taza blanca de 330ml, impresión a todo color.", 6_990, category_ids[0]),
    ("Taza mágica", "Cambia de color con el calor.", 9_990, category_ids[0]),
    ("Polera estampada", "Algodón 100%, estampado frontal.", 12_990, category_ids[1]),
    ("Polera bordada", "Bordado personalizado en el pecho.", 16_990, category_ids[1]),
    ("Cuaderno A5", "Tapa dura personalizada, 120 hojas.", 8_490, category_ids[2]),
    ("Agenda anual", "Agenda con nombre y diseño propio.", 11_990, category_ids[2]),
  ];

  for (name, description, price_cents, category_id) in products {
    sqlx::query("INSERT INTO products (category_id, name, description, base_price_cents) VALUES ($1, $2, $3, $4)")
      .bind(category_id)
      .bind(name)
      .bind(description)
      .bind(price_cents)
      .execute(pool)
      .await?;
  }

  info!("Seeded demo catalog: {} categories, {} products.", categories.len(), products.len());
  Ok(())
}
