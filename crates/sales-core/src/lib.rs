//! # sales-core: Entity Types for the Sales Ledger
//!
//! Plain data types shared by every layer. No I/O lives here.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               ★ sales-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐  ┌───────────────┐  ┌───────────────┐      │   │
//! │  │   │     types     │  │     price     │  │     error     │      │   │
//! │  │   │ Branch, Sale  │  │ Price (10, 2) │  │   CoreError   │      │   │
//! │  │   │ Product, ...  │  │               │  │               │      │   │
//! │  │   └───────────────┘  └───────────────┘  └───────────────┘      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    sales-db (Database Layer)                    │   │
//! │  │        Schema registry, bootstrap, repositories (SQLite)        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Branch, Sale, Product, SaleDetail and insert payloads
//! - [`price`] - Fixed-point unit price
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use sales_core::{NewProduct, Price};
//!
//! let widget = NewProduct::new("Widget", "9.99".parse::<Price>().unwrap());
//! assert_eq!(widget.unit_price.hundredths(), 999);
//! ```

pub mod error;
pub mod price;
pub mod types;

pub use error::{CoreError, CoreResult};
pub use price::Price;
pub use types::*;
