//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment (optional private key) + [wallet] config
//!     → wallet.rs (wallet bridge: accounts, chain id)
//!     → client.rs (RPC connection with timeouts and failover)
//!     → contract.rs (mint count read, mint transaction)
//!     → events.rs (mint confirmation events)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod contract;
pub mod events;
pub mod types;
pub mod wallet;

pub use client::BlockchainClient;
pub use contract::{MintContract, NftContract};
pub use events::MintWatcher;
pub use types::{BlockchainError, BlockchainResult, ChainId, MintEvent, MintReceipt};
pub use wallet::{RpcWallet, Wallet, WalletBridge};
