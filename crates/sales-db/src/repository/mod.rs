//! # Repository Module
//!
//! Database repository implementations for the sales ledger.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Caller                                                                │
//! │       │  db.branches().sales(branch_id)                                │
//! │       ▼                                                                 │
//! │  BranchRepository / SaleRepository / ProductRepository /               │
//! │  SaleDetailRepository                                                  │
//! │  ├── insert(&New*)     → row with generated id                         │
//! │  ├── get_by_id(id)     → Option<row>                                   │
//! │  ├── update / rename   → NotFound if the id is missing                 │
//! │  ├── delete(id)        → cascades per the schema registry              │
//! │  └── relationship navigation (sales, details)                          │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database (foreign keys enforced)                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`BranchRepository`](branch::BranchRepository) - Branches and their sales
//! - [`SaleRepository`](sale::SaleRepository) - Sales and their details
//! - [`ProductRepository`](product::ProductRepository) - Products and prices
//! - [`SaleDetailRepository`](sale_detail::SaleDetailRepository) - Line items

pub mod branch;
pub mod product;
pub mod sale;
pub mod sale_detail;
