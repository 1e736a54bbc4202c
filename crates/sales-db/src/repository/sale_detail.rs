//! # Sale Detail Repository
//!
//! Database operations for sale line items (`sales_details`).
//!
//! Both `sale_id` and `product_id` are enforced by SQLite: inserting or
//! updating a detail that points at a missing row fails with
//! [`DbError::ForeignKeyViolation`].

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use sales_core::{NewSaleDetail, SaleDetail};

/// Repository for sale detail database operations.
#[derive(Debug, Clone)]
pub struct SaleDetailRepository {
    pool: SqlitePool,
}

impl SaleDetailRepository {
    /// Creates a new SaleDetailRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleDetailRepository { pool }
    }

    /// Inserts a line item and returns it with its generated id.
    pub async fn insert(&self, detail: &NewSaleDetail) -> DbResult<SaleDetail> {
        debug!(
            sale_id = detail.sale_id,
            product_id = detail.product_id,
            units = detail.units,
            "Adding sale detail"
        );

        let id = sqlx::query(
            "INSERT INTO sales_details (sale_id, product_id, units) VALUES (?1, ?2, ?3)",
        )
        .bind(detail.sale_id)
        .bind(detail.product_id)
        .bind(detail.units)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        Ok(SaleDetail {
            id,
            sale_id: detail.sale_id,
            product_id: detail.product_id,
            units: detail.units,
        })
    }

    /// Gets a line item by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<SaleDetail>> {
        let detail = sqlx::query_as::<_, SaleDetail>(
            "SELECT id, sale_id, product_id, units FROM sales_details WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(detail)
    }

    /// Changes the quantity of a line item.
    pub async fn update_units(&self, id: i64, units: f64) -> DbResult<()> {
        let result = sqlx::query("UPDATE sales_details SET units = ?2 WHERE id = ?1")
            .bind(id)
            .bind(units)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("SaleDetail", id));
        }

        Ok(())
    }

    /// Deletes a single line item.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM sales_details WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("SaleDetail", id));
        }

        Ok(())
    }

    /// Gets total line item count.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales_details")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::schema::SchemaRegistry;
    use chrono::NaiveDate;
    use sales_core::{NewBranch, NewProduct, NewSale, Price};

    /// Database with one branch, one product and one sale.
    async fn seeded() -> (Database, i64, i64) {
        let db = Database::open(DbConfig::in_memory(), &SchemaRegistry::default())
            .await
            .unwrap();
        let branch = db.branches().insert(&NewBranch::new("Downtown")).await.unwrap();
        let product = db
            .products()
            .insert(&NewProduct::new("Widget", "9.99".parse::<Price>().unwrap()))
            .await
            .unwrap();
        let sale = db
            .sales()
            .insert(&NewSale::new(
                branch.id,
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            ))
            .await
            .unwrap();
        (db, sale.id, product.id)
    }

    #[tokio::test]
    async fn test_missing_sale_rejected() {
        let (db, _, product_id) = seeded().await;

        let err = db
            .sale_details()
            .insert(&NewSaleDetail::new(999, product_id, 1.0))
            .await
            .unwrap_err();

        assert!(err.is_foreign_key_violation(), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn test_missing_product_rejected() {
        let (db, sale_id, _) = seeded().await;

        let err = db
            .sale_details()
            .insert(&NewSaleDetail::new(sale_id, 999, 1.0))
            .await
            .unwrap_err();

        assert!(err.is_foreign_key_violation(), "unexpected error: {err}");
        assert_eq!(db.sale_details().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_fractional_units() {
        let (db, sale_id, product_id) = seeded().await;
        let detail = db
            .sale_details()
            .insert(&NewSaleDetail::new(sale_id, product_id, 1.25))
            .await
            .unwrap();

        db.sale_details().update_units(detail.id, 0.75).await.unwrap();

        let fetched = db.sale_details().get_by_id(detail.id).await.unwrap().unwrap();
        assert_eq!(fetched.units, 0.75);
    }

    #[tokio::test]
    async fn test_delete_detail_keeps_sale() {
        let (db, sale_id, product_id) = seeded().await;
        let detail = db
            .sale_details()
            .insert(&NewSaleDetail::new(sale_id, product_id, 3.0))
            .await
            .unwrap();

        db.sale_details().delete(detail.id).await.unwrap();

        assert_eq!(db.sale_details().get_by_id(detail.id).await.unwrap(), None);
        assert!(db.sales().get_by_id(sale_id).await.unwrap().is_some());
        assert!(matches!(
            db.sale_details().delete(detail.id).await,
            Err(DbError::NotFound { .. })
        ));
    }
}
