//! # Schema Registry
//!
//! Declarative table definitions for the sales ledger and the DDL bootstrap.
//!
//! ## How Schema Creation Works
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Schema Creation                                    │
//! │                                                                         │
//! │  SchemaRegistry::default()   ← explicit, no global metadata            │
//! │       │                                                                 │
//! │       │  branches → sales → products → sales_details                   │
//! │       │  (parents always registered before children)                   │
//! │       ▼                                                                 │
//! │  create_statements()                                                   │
//! │       │  CREATE TABLE IF NOT EXISTS ...                                │
//! │       │  CREATE INDEX IF NOT EXISTS ... (one per foreign key)          │
//! │       ▼                                                                 │
//! │  initialize_schema(conn, &registry)                                    │
//! │       │  BEGIN                                                          │
//! │       │  execute every statement                                       │
//! │       │  COMMIT                                                         │
//! │       ▼                                                                 │
//! │  Tables exist. Running it again is a no-op.                            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Delete Policies
//! | Parent → Child            | Policy                               |
//! |---------------------------|--------------------------------------|
//! | branches → sales          | CASCADE                              |
//! | sales → sales_details     | CASCADE                              |
//! | products → sales_details  | RESTRICT (default) or CASCADE        |
//!
//! Deleting a product must not silently erase sale history, so the registry
//! defaults to RESTRICT. [`SchemaRegistry::with_product_delete_policy`]
//! opts back into CASCADE.

use serde::Serialize;
use sqlx::{Connection, SqliteConnection};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};

/// Table holding [`sales_core::Branch`] rows.
pub const BRANCHES: &str = "branches";
/// Table holding [`sales_core::Sale`] rows.
pub const SALES: &str = "sales";
/// Table holding [`sales_core::Product`] rows.
pub const PRODUCTS: &str = "products";
/// Table holding [`sales_core::SaleDetail`] rows.
pub const SALES_DETAILS: &str = "sales_details";

/// Upper bound for `name` columns.
pub const NAME_MAX_LEN: u32 = 255;

// =============================================================================
// Definitions
// =============================================================================

/// Storage class of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Auto-generated integer primary key.
    Id,
    Integer,
    /// Bounded text, `VARCHAR(n)`.
    Text { max_len: u32 },
    Real,
    /// Calendar date stored as ISO-8601 text.
    Date,
    /// NUMERIC(10, 2) stored as INTEGER hundredths.
    Price,
}

impl ColumnType {
    fn sql(&self) -> String {
        match self {
            ColumnType::Id => "INTEGER PRIMARY KEY AUTOINCREMENT".to_string(),
            ColumnType::Integer | ColumnType::Price => "INTEGER".to_string(),
            ColumnType::Text { max_len } => format!("VARCHAR({max_len})"),
            ColumnType::Real => "REAL".to_string(),
            ColumnType::Date => "DATE".to_string(),
        }
    }
}

/// A single column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDef {
    pub name: &'static str,
    pub column_type: ColumnType,
    pub nullable: bool,
}

impl ColumnDef {
    /// A required (NOT NULL) column.
    pub const fn required(name: &'static str, column_type: ColumnType) -> Self {
        ColumnDef {
            name,
            column_type,
            nullable: false,
        }
    }

    /// The generated `id` primary key.
    pub const fn id() -> Self {
        ColumnDef::required("id", ColumnType::Id)
    }

    fn sql(&self) -> String {
        let mut sql = format!("{} {}", self.name, self.column_type.sql());
        if !self.nullable && self.column_type != ColumnType::Id {
            sql.push_str(" NOT NULL");
        }
        // SQLite ignores VARCHAR lengths, so bound them explicitly
        if let ColumnType::Text { max_len } = self.column_type {
            sql.push_str(&format!(" CHECK (length({}) <= {max_len})", self.name));
        }
        sql
    }
}

/// What happens to child rows when the referenced parent row is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OnDelete {
    /// Delete the children together with the parent.
    Cascade,
    /// Refuse to delete a parent that still has children.
    Restrict,
}

impl OnDelete {
    fn sql(&self) -> &'static str {
        match self {
            OnDelete::Cascade => "CASCADE",
            OnDelete::Restrict => "RESTRICT",
        }
    }
}

/// `column REFERENCES table(id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignKeyDef {
    pub column: &'static str,
    pub references: &'static str,
    pub on_delete: OnDelete,
}

impl ForeignKeyDef {
    pub const fn new(column: &'static str, references: &'static str, on_delete: OnDelete) -> Self {
        ForeignKeyDef {
            column,
            references,
            on_delete,
        }
    }
}

/// A table with its columns and foreign keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableDef {
    pub name: &'static str,
    pub columns: Vec<ColumnDef>,
    pub foreign_keys: Vec<ForeignKeyDef>,
}

impl TableDef {
    pub fn new(name: &'static str) -> Self {
        TableDef {
            name,
            columns: vec![ColumnDef::id()],
            foreign_keys: Vec::new(),
        }
    }

    /// Adds a required column.
    pub fn column(mut self, name: &'static str, column_type: ColumnType) -> Self {
        self.columns.push(ColumnDef::required(name, column_type));
        self
    }

    /// Adds a required integer column referencing `references(id)`.
    pub fn foreign_key(mut self, column: &'static str, references: &'static str, on_delete: OnDelete) -> Self {
        self.columns.push(ColumnDef::required(column, ColumnType::Integer));
        self.foreign_keys
            .push(ForeignKeyDef::new(column, references, on_delete));
        self
    }

    /// `CREATE TABLE IF NOT EXISTS` for this table.
    pub fn create_table_sql(&self) -> String {
        let mut parts: Vec<String> = self.columns.iter().map(ColumnDef::sql).collect();
        parts.extend(self.foreign_keys.iter().map(|fk| {
            format!(
                "FOREIGN KEY ({}) REFERENCES {}(id) ON DELETE {}",
                fk.column,
                fk.references,
                fk.on_delete.sql()
            )
        }));

        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
            self.name,
            parts.join(",\n    ")
        )
    }

    /// One `CREATE INDEX IF NOT EXISTS` per foreign key column.
    ///
    /// SQLite does not index child columns itself; without these every
    /// cascading delete scans the child table.
    pub fn create_index_sql(&self) -> Vec<String> {
        self.foreign_keys
            .iter()
            .map(|fk| {
                format!(
                    "CREATE INDEX IF NOT EXISTS idx_{table}_{col} ON {table}({col})",
                    table = self.name,
                    col = fk.column
                )
            })
            .collect()
    }

    fn foreign_key_for(&self, column: &str) -> Option<&ForeignKeyDef> {
        self.foreign_keys.iter().find(|fk| fk.column == column)
    }
}

// =============================================================================
// Registry
// =============================================================================

/// The set of tables materialized by [`initialize_schema`].
///
/// Tables are kept in registration order, and a table may only reference
/// tables registered before it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaRegistry {
    tables: Vec<TableDef>,
}

impl SchemaRegistry {
    /// An empty registry.
    pub fn empty() -> Self {
        SchemaRegistry { tables: Vec::new() }
    }

    /// The sales ledger schema with the default (RESTRICT) product policy.
    pub fn new() -> Self {
        Self::with_product_delete_policy(OnDelete::Restrict)
    }

    /// The sales ledger schema with the given policy for
    /// `sales_details.product_id`.
    pub fn with_product_delete_policy(product_policy: OnDelete) -> Self {
        let text = ColumnType::Text {
            max_len: NAME_MAX_LEN,
        };

        SchemaRegistry {
            tables: vec![
                TableDef::new(BRANCHES).column("name", text),
                TableDef::new(SALES)
                    .column("sale_date", ColumnType::Date)
                    .foreign_key("branch_id", BRANCHES, OnDelete::Cascade),
                TableDef::new(PRODUCTS)
                    .column("name", text)
                    .column("unit_price", ColumnType::Price),
                TableDef::new(SALES_DETAILS)
                    .foreign_key("sale_id", SALES, OnDelete::Cascade)
                    .foreign_key("product_id", PRODUCTS, product_policy)
                    .column("units", ColumnType::Real),
            ],
        }
    }

    /// Adds a table.
    ///
    /// ## Errors
    /// - `InvalidSchema` if the name is already registered
    /// - `InvalidSchema` if a foreign key points at an unregistered table
    pub fn register(&mut self, table: TableDef) -> DbResult<()> {
        if self.table(table.name).is_some() {
            return Err(DbError::InvalidSchema(format!(
                "table '{}' is already registered",
                table.name
            )));
        }

        for fk in &table.foreign_keys {
            if fk.references != table.name && self.table(fk.references).is_none() {
                return Err(DbError::InvalidSchema(format!(
                    "{}.{} references unregistered table '{}'",
                    table.name, fk.column, fk.references
                )));
            }
        }

        self.tables.push(table);
        Ok(())
    }

    /// All tables, parents first.
    pub fn tables(&self) -> &[TableDef] {
        &self.tables
    }

    /// Looks up a table by name.
    pub fn table(&self, name: &str) -> Option<&TableDef> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Table names, parents first.
    pub fn table_names(&self) -> Vec<&'static str> {
        self.tables.iter().map(|t| t.name).collect()
    }

    /// The delete policy of `table.column`, if it is a foreign key.
    pub fn delete_policy(&self, table: &str, column: &str) -> Option<OnDelete> {
        self.table(table)
            .and_then(|t| t.foreign_key_for(column))
            .map(|fk| fk.on_delete)
    }

    /// Every DDL statement, in execution order.
    pub fn create_statements(&self) -> Vec<String> {
        let mut statements: Vec<String> = self.tables.iter().map(TableDef::create_table_sql).collect();
        statements.extend(self.tables.iter().flat_map(TableDef::create_index_sql));
        statements
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Bootstrap
// =============================================================================

/// Creates every table in `registry` that does not exist yet.
///
/// ## What This Does
/// - Opens a transaction on `conn`
/// - Executes each `CREATE ... IF NOT EXISTS` statement
/// - Commits; on error the transaction is rolled back when dropped
///
/// ## Safety
/// - Idempotent: safe to run multiple times
/// - Existing tables are left untouched, including their delete policies
///
/// ## Example
/// ```rust,ignore
/// let mut conn = pool.acquire().await?;
/// initialize_schema(&mut conn, &SchemaRegistry::default()).await?;
/// ```
pub async fn initialize_schema(conn: &mut SqliteConnection, registry: &SchemaRegistry) -> DbResult<()> {
    info!(tables = registry.tables().len(), "Creating schema");

    let mut tx = conn.begin().await?;

    for statement in registry.create_statements() {
        debug!(sql = %statement, "Executing DDL");
        sqlx::query(&statement).execute(&mut *tx).await?;
    }

    tx.commit().await?;

    info!("Schema ready");
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[test]
    fn test_default_registry_order() {
        let registry = SchemaRegistry::default();
        assert_eq!(
            registry.table_names(),
            vec![BRANCHES, SALES, PRODUCTS, SALES_DETAILS]
        );
    }

    #[test]
    fn test_delete_policies() {
        let registry = SchemaRegistry::default();
        assert_eq!(
            registry.delete_policy(SALES, "branch_id"),
            Some(OnDelete::Cascade)
        );
        assert_eq!(
            registry.delete_policy(SALES_DETAILS, "sale_id"),
            Some(OnDelete::Cascade)
        );
        assert_eq!(
            registry.delete_policy(SALES_DETAILS, "product_id"),
            Some(OnDelete::Restrict)
        );
        assert_eq!(registry.delete_policy(SALES, "sale_date"), None);

        let cascading = SchemaRegistry::with_product_delete_policy(OnDelete::Cascade);
        assert_eq!(
            cascading.delete_policy(SALES_DETAILS, "product_id"),
            Some(OnDelete::Cascade)
        );
    }

    #[test]
    fn test_create_table_sql() {
        let registry = SchemaRegistry::default();
        let sql = registry.table(SALES).unwrap().create_table_sql();

        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS sales ("));
        assert!(sql.contains("id INTEGER PRIMARY KEY AUTOINCREMENT"));
        assert!(sql.contains("sale_date DATE NOT NULL"));
        assert!(sql.contains("branch_id INTEGER NOT NULL"));
        assert!(sql.contains("FOREIGN KEY (branch_id) REFERENCES branches(id) ON DELETE CASCADE"));
    }

    #[test]
    fn test_index_per_foreign_key() {
        let registry = SchemaRegistry::default();
        let statements = registry.create_statements();

        // four tables + one index per foreign key (branch_id, sale_id, product_id)
        assert_eq!(statements.len(), 7);
        assert!(statements
            .iter()
            .any(|s| s == "CREATE INDEX IF NOT EXISTS idx_sales_details_product_id ON sales_details(product_id)"));
    }

    #[test]
    fn test_register_rejects_unknown_parent() {
        let mut registry = SchemaRegistry::empty();
        let orphan = TableDef::new("refunds").foreign_key("sale_id", SALES, OnDelete::Cascade);

        assert!(matches!(
            registry.register(orphan),
            Err(DbError::InvalidSchema(_))
        ));
    }

    #[test]
    fn test_register_rejects_duplicate() {
        let mut registry = SchemaRegistry::default();
        let err = registry.register(TableDef::new(BRANCHES)).unwrap_err();
        assert!(err.to_string().contains("already registered"));
    }

    #[test]
    fn test_register_extends_schema() {
        let mut registry = SchemaRegistry::default();
        registry
            .register(
                TableDef::new("refunds")
                    .foreign_key("sale_id", SALES, OnDelete::Cascade)
                    .column("reason", ColumnType::Text { max_len: 500 }),
            )
            .unwrap();

        assert_eq!(registry.tables().len(), 5);
        assert_eq!(registry.table_names().last(), Some(&"refunds"));
    }

    #[tokio::test]
    async fn test_initialize_schema_creates_tables() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();

        initialize_schema(&mut conn, &SchemaRegistry::default())
            .await
            .unwrap();

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&mut *conn)
        .await
        .unwrap();

        assert_eq!(tables, vec!["branches", "products", "sales", "sales_details"]);
    }

    #[tokio::test]
    async fn test_initialize_schema_twice() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let registry = SchemaRegistry::default();
        let mut conn = db.pool().acquire().await.unwrap();

        initialize_schema(&mut conn, &registry).await.unwrap();
        initialize_schema(&mut conn, &registry).await.unwrap();
    }

    #[tokio::test]
    async fn test_name_length_enforced() {
        let db = Database::open(DbConfig::in_memory(), &SchemaRegistry::default())
            .await
            .unwrap();

        let too_long = "x".repeat(NAME_MAX_LEN as usize + 1);
        let err = sqlx::query("INSERT INTO branches (name) VALUES (?1)")
            .bind(too_long)
            .execute(db.pool())
            .await
            .map_err(DbError::from)
            .unwrap_err();

        assert!(matches!(err, DbError::ConstraintViolation { .. }));
    }
}
