//! # Schema Bootstrap
//!
//! Creates a transient in-memory database, materializes every table of the
//! sales ledger schema and closes the connection.
//!
//! ## Usage
//! ```bash
//! cargo run -p sales-db --bin bootstrap
//!
//! # Also show sqlx's statement log
//! RUST_LOG=sales_db=debug,sqlx=info cargo run -p sales-db --bin bootstrap
//! ```
//!
//! Prints the registered schema as JSON on success. Any failure aborts the
//! process with a non-zero exit code.

use sales_db::{bootstrap, DbConfig, SchemaRegistry};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let registry = SchemaRegistry::default();

    bootstrap(DbConfig::in_memory(), &registry, None).await?;

    println!("{}", serde_json::to_string_pretty(&registry)?);

    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - Default: INFO level, every DDL statement from this crate at DEBUG,
///   sqlx at WARN
/// - `RUST_LOG=...` - Overrides the default filter
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sales_db=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
