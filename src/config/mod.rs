//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → MintConfig (validated, immutable)
//!     → handed to the wallet bridge, contract, watcher and UI
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults so an empty file is a valid config
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::MintConfig;
pub use schema::WalletConfig;
pub use schema::ContractConfig;
pub use schema::UiConfig;
pub use schema::ObservabilityConfig;
