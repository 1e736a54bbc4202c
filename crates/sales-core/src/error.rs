//! # Error Types
//!
//! Domain-specific error types for sales-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  sales-core errors (this file)                                         │
//! │  └── CoreError        - Values that cannot be represented              │
//! │                                                                         │
//! │  sales-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Flow: CoreError → DbError → caller                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Core domain errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Price does not fit NUMERIC(10, 2).
    ///
    /// ## When This Occurs
    /// - More than 8 digits before the decimal point
    /// - A stored integer outside ±9,999,999,999 hundredths
    #[error("Price {value} exceeds {precision} digits with scale {scale}")]
    PriceOutOfRange {
        value: String,
        precision: u32,
        scale: u32,
    },

    /// Text could not be parsed as a decimal price.
    #[error("Invalid price '{input}': {reason}")]
    InvalidPrice { input: String, reason: String },
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
