// Port Layer - Interfaces for external dependencies

pub mod catalog;
pub mod festival_repository;
pub mod id_provider; // For deterministic testing
pub mod transaction;

// Re-exports
pub use catalog::{CatalogRepository, RecordStream};
pub use festival_repository::FestivalRepository;
pub use id_provider::IdProvider;
pub use transaction::{CapacityChange, LedgerTransaction, Transaction, TransactionalLedgerStore};
