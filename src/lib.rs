//! NFT mint client library.

pub mod app;
pub mod blockchain;
pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod session;
pub mod ui;

pub use app::App;
pub use config::schema::MintConfig;
pub use lifecycle::Shutdown;
pub use session::MintSession;
