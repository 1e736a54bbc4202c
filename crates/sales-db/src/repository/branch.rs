//! # Branch Repository
//!
//! Database operations for branches.
//!
//! ## Ownership
//! A branch owns its sales. Deleting a branch cascades to `sales`, and from
//! there to `sales_details`.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::sale::SaleRepository;
use sales_core::{Branch, NewBranch, Sale};

/// Repository for branch database operations.
///
/// ## Usage
/// ```rust,ignore
/// let downtown = db.branches().insert(&NewBranch::new("Downtown")).await?;
/// let sales = db.branches().sales(downtown.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct BranchRepository {
    pool: SqlitePool,
}

impl BranchRepository {
    /// Creates a new BranchRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BranchRepository { pool }
    }

    /// Inserts a branch and returns it with its generated id.
    pub async fn insert(&self, branch: &NewBranch) -> DbResult<Branch> {
        debug!(name = %branch.name, "Inserting branch");

        let id = sqlx::query("INSERT INTO branches (name) VALUES (?1)")
            .bind(&branch.name)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        Ok(Branch {
            id,
            name: branch.name.clone(),
        })
    }

    /// Gets a branch by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Branch>> {
        let branch = sqlx::query_as::<_, Branch>("SELECT id, name FROM branches WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(branch)
    }

    /// Lists all branches ordered by id.
    pub async fn list(&self) -> DbResult<Vec<Branch>> {
        let branches = sqlx::query_as::<_, Branch>("SELECT id, name FROM branches ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(branches)
    }

    /// Changes a branch's name.
    pub async fn rename(&self, id: i64, name: &str) -> DbResult<()> {
        debug!(id, name, "Renaming branch");

        let result = sqlx::query("UPDATE branches SET name = ?2 WHERE id = ?1")
            .bind(id)
            .bind(name)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Branch", id));
        }

        Ok(())
    }

    /// Deletes a branch together with its sales and their details.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting branch");

        let result = sqlx::query("DELETE FROM branches WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Branch", id));
        }

        Ok(())
    }

    /// Sales recorded at a branch, oldest first.
    pub async fn sales(&self, branch_id: i64) -> DbResult<Vec<Sale>> {
        SaleRepository::new(self.pool.clone())
            .list_for_branch(branch_id)
            .await
    }

    /// Gets total branch count.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM branches")
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
    use sales_core::NewSale;

    async fn db() -> Database {
        Database::open(DbConfig::in_memory(), &SchemaRegistry::default())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = db().await;
        let branch = db.branches().insert(&NewBranch::new("Downtown")).await.unwrap();

        assert!(branch.id > 0);
        let fetched = db.branches().get_by_id(branch.id).await.unwrap();
        assert_eq!(fetched, Some(branch));
    }

    #[tokio::test]
    async fn test_ids_are_generated_and_unique() {
        let db = db().await;
        let a = db.branches().insert(&NewBranch::new("North")).await.unwrap();
        let b = db.branches().insert(&NewBranch::new("South")).await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(db.branches().list().await.unwrap(), vec![a, b]);
    }

    #[tokio::test]
    async fn test_rename_keeps_id() {
        let db = db().await;
        let branch = db.branches().insert(&NewBranch::new("Old")).await.unwrap();

        db.branches().rename(branch.id, "New").await.unwrap();

        let fetched = db.branches().get_by_id(branch.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, branch.id);
        assert_eq!(fetched.name, "New");
    }

    #[tokio::test]
    async fn test_missing_branch() {
        let db = db().await;

        assert_eq!(db.branches().get_by_id(99).await.unwrap(), None);
        assert!(matches!(
            db.branches().rename(99, "x").await,
            Err(DbError::NotFound { .. })
        ));
        assert!(matches!(
            db.branches().delete(99).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_sales_match_sale_listing() {
        let db = db().await;
        let branch = db.branches().insert(&NewBranch::new("Downtown")).await.unwrap();
        let other = db.branches().insert(&NewBranch::new("Uptown")).await.unwrap();
        for (branch_id, day) in [(branch.id, 20), (other.id, 1), (branch.id, 5)] {
            let date = NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
            db.sales().insert(&NewSale::new(branch_id, date)).await.unwrap();
        }

        let sales = db.branches().sales(branch.id).await.unwrap();

        assert_eq!(sales, db.sales().list_for_branch(branch.id).await.unwrap());
        assert_eq!(sales.len(), 2);
        assert!(sales[0].sale_date < sales[1].sale_date);
    }
}
