//! # Domain Types
//!
//! The four persisted entities of the sales ledger and their insert payloads.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐  1   *  ┌─────────────────┐                        │
//! │  │     Branch      │────────►│      Sale       │                        │
//! │  │  id, name       │ cascade │  id, sale_date  │                        │
//! │  └─────────────────┘         │  branch_id (FK) │                        │
//! │                              └────────┬────────┘                        │
//! │                                       │ 1 cascade                       │
//! │                                       ▼ *                               │
//! │  ┌─────────────────┐  1   *  ┌─────────────────┐                        │
//! │  │    Product      │────────►│   SaleDetail    │                        │
//! │  │  id, name       │ policy  │  sale_id (FK)   │                        │
//! │  │  unit_price     │         │  product_id(FK) │                        │
//! │  └─────────────────┘         │  units          │                        │
//! │                              └─────────────────┘                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every row has an `id: i64` generated by the database. The `New*` payloads
//! carry no id, so a primary key can be neither chosen nor changed by callers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::price::Price;

// =============================================================================
// Branch
// =============================================================================

/// A physical or organizational sales location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Branch {
    pub id: i64,
    pub name: String,
}

/// Insert payload for [`Branch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBranch {
    pub name: String,
}

impl NewBranch {
    pub fn new(name: impl Into<String>) -> Self {
        NewBranch { name: name.into() }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A transaction record tied to one branch and one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: i64,
    pub sale_date: NaiveDate,
    pub branch_id: i64,
}

/// Insert payload for [`Sale`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSale {
    pub sale_date: NaiveDate,
    pub branch_id: i64,
}

impl NewSale {
    pub fn new(branch_id: i64, sale_date: NaiveDate) -> Self {
        NewSale {
            sale_date,
            branch_id,
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// An item available for sale.
///
/// No `FromRow` derive: the stored price is INTEGER hundredths and is
/// range-checked into a [`Price`] by the database layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub unit_price: Price,
}

/// Insert payload for [`Product`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub unit_price: Price,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, unit_price: Price) -> Self {
        NewProduct {
            name: name.into(),
            unit_price,
        }
    }
}

// =============================================================================
// Sale Detail
// =============================================================================

/// A line item linking a sale to a product and a quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleDetail {
    pub id: i64,
    pub sale_id: i64,
    pub product_id: i64,
    /// Quantity sold. Fractional for goods sold by weight or volume.
    pub units: f64,
}

/// Insert payload for [`SaleDetail`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSaleDetail {
    pub sale_id: i64,
    pub product_id: i64,
    pub units: f64,
}

impl NewSaleDetail {
    pub fn new(sale_id: i64, product_id: i64, units: f64) -> Self {
        NewSaleDetail {
            sale_id,
            product_id,
            units,
        }
    }
}

// =============================================================================
// Aggregates
// =============================================================================

/// A sale loaded together with its line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleWithDetails {
    pub sale: Sale,
    pub details: Vec<SaleDetail>,
}

impl SaleWithDetails {
    /// Sum of `units` across all line items.
    pub fn total_units(&self) -> f64 {
        self.details.iter().map(|d| d.units).sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_product_serializes_price_as_decimal_string() {
        let product = Product {
            id: 1,
            name: "Widget".to_string(),
            unit_price: Price::new(dec!(9.99)).unwrap(),
        };
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["unit_price"], "9.99");
    }

    #[test]
    fn test_total_units() {
        let sale = Sale {
            id: 1,
            sale_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            branch_id: 1,
        };
        let aggregate = SaleWithDetails {
            sale,
            details: vec![
                SaleDetail {
                    id: 1,
                    sale_id: 1,
                    product_id: 1,
                    units: 3.0,
                },
                SaleDetail {
                    id: 2,
                    sale_id: 1,
                    product_id: 2,
                    units: 0.5,
                },
            ],
        };
        assert!((aggregate.total_units() - 3.5).abs() < f64::EPSILON);
    }
}
