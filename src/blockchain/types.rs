//! Chain-specific types and error definitions.

use alloy::primitives::{Address, TxHash, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Errors that can occur during wallet and contract operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// No wallet endpoint is configured.
    #[error("No wallet found. Get a wallet and point wallet.rpc_url at it")]
    WalletMissing,

    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// The wallet returned no authorized accounts.
    #[error("Wallet has no authorized accounts")]
    NoAccounts,

    /// Transaction was reverted on-chain.
    #[error("Transaction reverted: {0}")]
    Reverted(String),

    /// Invalid private key format or signing error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Contract returned data that does not match its ABI.
    #[error("Contract decode error: {0}")]
    Decode(String),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// A confirmed `NewEpicNFTMinted` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintEvent {
    /// Account the token was minted for.
    pub sender: Address,
    /// Token ID assigned by the contract.
    pub token_id: U256,
    /// The transaction hash.
    pub tx_hash: Option<TxHash>,
    /// Block number where the event occurred.
    pub block_number: Option<u64>,
}

/// Outcome of a mined mint transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintReceipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    /// Mint events found in the receipt's logs.
    pub events: Vec<MintEvent>,
}
