//! # sales-db: Schema Module and Database Layer
//!
//! Declares the sales ledger schema, materializes it in SQLite and provides
//! repository access to the four tables. Uses sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     sales-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │    Schema    │  │   │
//! │  │   │   (pool.rs)   │    │  branch, sale │    │  registry +  │  │   │
//! │  │   │               │◄───│  product,     │    │  bootstrap   │  │   │
//! │  │   │  SqlitePool   │    │  sale_detail  │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │   SQLite: branches, sales, products, sales_details              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`schema`] - Schema registry and `initialize_schema`
//! - [`bootstrap`] - Connect, create tables, disconnect
//! - [`pool`] - Connection pool creation and configuration
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sales_db::{Database, DbConfig, SchemaRegistry};
//!
//! let db = Database::open(DbConfig::in_memory(), &SchemaRegistry::default()).await?;
//! let downtown = db.branches().insert(&NewBranch::new("Downtown")).await?;
//! ```

pub mod bootstrap;
pub mod error;
pub mod pool;
pub mod repository;
pub mod schema;

pub use bootstrap::{bootstrap, bootstrap_with};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use schema::{initialize_schema, OnDelete, SchemaRegistry};

pub use repository::branch::BranchRepository;
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
pub use repository::sale_detail::SaleDetailRepository;
