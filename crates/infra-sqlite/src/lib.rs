// Festival Infrastructure - SQLite Adapter
// Implements: FestivalRepository, CatalogRepository, TransactionalLedgerStore

mod config;
mod connection;
mod error;
mod festival_store;
mod migration;
mod transaction;

pub use config::StoreConfig;
pub use connection::{create_pool, create_pool_with};
pub use festival_store::SqliteFestivalStore;
pub use migration::run_migrations;
pub use transaction::SqliteLedgerTransaction;

// Note: sqlx::Error conversion is handled by error::map_sqlx_error
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)
