//! # Sale Repository
//!
//! Database operations for sales.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. INSERT                                                             │
//! │     └── insert(NewSale { branch_id, sale_date }) → Sale { id }         │
//! │         (branch_id must exist, else ForeignKeyViolation)               │
//! │                                                                         │
//! │  2. ADD LINE ITEMS                                                     │
//! │     └── sale_details().insert(NewSaleDetail { sale_id, ... })          │
//! │                                                                         │
//! │  3. UPDATE (optional)                                                  │
//! │     └── update_date() / reassign_branch()                              │
//! │                                                                         │
//! │  4. DELETE                                                             │
//! │     └── delete(id) or deleting the owning branch                       │
//! │         └── details are removed by cascade                             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::debug;

use crate::error::{DbError, DbResult};
use sales_core::{NewSale, Sale, SaleDetail, SaleWithDetails};

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Inserts a sale and returns it with its generated id.
    ///
    /// ## Errors
    /// `ForeignKeyViolation` if `branch_id` does not exist.
    pub async fn insert(&self, sale: &NewSale) -> DbResult<Sale> {
        debug!(branch_id = sale.branch_id, sale_date = %sale.sale_date, "Inserting sale");

        let id = sqlx::query("INSERT INTO sales (sale_date, branch_id) VALUES (?1, ?2)")
            .bind(sale.sale_date)
            .bind(sale.branch_id)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        Ok(Sale {
            id,
            sale_date: sale.sale_date,
            branch_id: sale.branch_id,
        })
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            "SELECT id, sale_date, branch_id FROM sales WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Sales of one branch, oldest first.
    pub async fn list_for_branch(&self, branch_id: i64) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, sale_date, branch_id
            FROM sales
            WHERE branch_id = ?1
            ORDER BY sale_date, id
            "#,
        )
        .bind(branch_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Changes the date of a sale.
    pub async fn update_date(&self, id: i64, sale_date: NaiveDate) -> DbResult<()> {
        let result = sqlx::query("UPDATE sales SET sale_date = ?2 WHERE id = ?1")
            .bind(id)
            .bind(sale_date)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", id));
        }

        Ok(())
    }

    /// Moves a sale to another branch.
    ///
    /// ## Errors
    /// `ForeignKeyViolation` if `branch_id` does not exist.
    pub async fn reassign_branch(&self, id: i64, branch_id: i64) -> DbResult<()> {
        debug!(id, branch_id, "Reassigning sale");

        let result = sqlx::query("UPDATE sales SET branch_id = ?2 WHERE id = ?1")
            .bind(id)
            .bind(branch_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", id));
        }

        Ok(())
    }

    /// Deletes a sale and, by cascade, its details.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting sale");

        let result = sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", id));
        }

        Ok(())
    }

    /// Line items of a sale.
    pub async fn details(&self, sale_id: i64) -> DbResult<Vec<SaleDetail>> {
        let details = sqlx::query_as::<_, SaleDetail>(
            r#"
            SELECT id, sale_id, product_id, units
            FROM sales_details
            WHERE sale_id = ?1
            ORDER BY id
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(details)
    }

    /// Every sale of a branch together with its line items.
    ///
    /// Two queries: the branch's sales, then all of their details in one
    /// pass, grouped in memory.
    pub async fn with_details_for_branch(&self, branch_id: i64) -> DbResult<Vec<SaleWithDetails>> {
        let sales = self.list_for_branch(branch_id).await?;

        let details = sqlx::query_as::<_, SaleDetail>(
            r#"
            SELECT d.id, d.sale_id, d.product_id, d.units
            FROM sales_details d
            JOIN sales s ON s.id = d.sale_id
            WHERE s.branch_id = ?1
            ORDER BY d.id
            "#,
        )
        .bind(branch_id)
        .fetch_all(&self.pool)
        .await?;

        let mut by_sale: HashMap<i64, Vec<SaleDetail>> = HashMap::new();
        for detail in details {
            by_sale.entry(detail.sale_id).or_default().push(detail);
        }

        let aggregates = sales
            .into_iter()
            .map(|sale| {
                let details = by_sale.remove(&sale.id).unwrap_or_default();
                SaleWithDetails { sale, details }
            })
            .collect();

        Ok(aggregates)
    }

    /// Gets total sale count.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
