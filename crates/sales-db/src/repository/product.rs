//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Price Storage
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Product { unit_price: Price(9.99) }                                    │
//! │       │  .hundredths()                                                  │
//! │       ▼                                                                 │
//! │  products.unit_price = 999   (INTEGER, never REAL)                      │
//! │       │  Price::try_from(i64)                                           │
//! │       ▼                                                                 │
//! │  Product { unit_price: Price(9.99) }                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Deleting Products
//! Whether a referenced product can be deleted depends on the registry's
//! product delete policy: RESTRICT (default) rejects the delete with a
//! foreign key violation, CASCADE removes the referencing sale details.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use sales_core::{CoreError, NewProduct, Price, Product, SaleDetail};

/// A `products` row as stored, before the price is range-checked.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    unit_price: i64,
}

impl TryFrom<ProductRow> for Product {
    type Error = CoreError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        Ok(Product {
            id: row.id,
            name: row.name,
            unit_price: Price::try_from(row.unit_price)?,
        })
    }
}

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a product and returns it with its generated id.
    pub async fn insert(&self, product: &NewProduct) -> DbResult<Product> {
        debug!(name = %product.name, unit_price = %product.unit_price, "Inserting product");

        let id = sqlx::query("INSERT INTO products (name, unit_price) VALUES (?1, ?2)")
            .bind(&product.name)
            .bind(product.unit_price.hundredths())
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        Ok(Product {
            id,
            name: product.name.clone(),
            unit_price: product.unit_price,
        })
    }

    /// Gets a product by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, unit_price FROM products WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::try_from).transpose()?)
    }

    /// Lists all products ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, unit_price FROM products ORDER BY name, id",
        )
        .fetch_all(&self.pool)
        .await?;

        let products = rows
            .into_iter()
            .map(Product::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(products)
    }

    /// Updates name and unit price. The id is never changed.
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = product.id, "Updating product");

        let result = sqlx::query("UPDATE products SET name = ?2, unit_price = ?3 WHERE id = ?1")
            .bind(product.id)
            .bind(&product.name)
            .bind(product.unit_price.hundredths())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", product.id));
        }

        Ok(())
    }

    /// Deletes a product, subject to the product delete policy.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Sale details that reference a product.
    pub async fn details(&self, product_id: i64) -> DbResult<Vec<SaleDetail>> {
        let details = sqlx::query_as::<_, SaleDetail>(
            r#"
            SELECT id, sale_id, product_id, units
            FROM sales_details
            WHERE product_id = ?1
            ORDER BY id
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(details)
    }

    /// Gets total product count.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
