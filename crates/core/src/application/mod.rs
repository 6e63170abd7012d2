// Application Layer - Use Cases

pub mod catalog;
pub mod ledger;
pub mod registry;

// Re-exports
pub use catalog::CatalogService;
pub use ledger::{cancel_channel, CancelHandle, CancelToken, TicketLedger};
pub use registry::RegistryService;
