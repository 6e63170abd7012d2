// Festival Core - Domain Logic & Ports
// NO infrastructure dependencies (hexagonal: adapters implement the ports)

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;

pub use config::LedgerConfig;
pub use error::{AppError, LedgerError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
