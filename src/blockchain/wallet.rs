//! Wallet provider bridge and local key handling.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables
//! - Keys are never logged or serialized
//!
//! Two kinds of wallet sit behind [`WalletBridge`]:
//! - an external wallet reachable over JSON-RPC that owns and signs for its
//!   accounts (`eth_accounts` / `eth_requestAccounts`)
//! - a local key from the environment, which is then the only account

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use std::future::Future;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainId};
use crate::config::WalletConfig;

/// Environment variable name for the private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "MINT_WALLET_PRIVATE_KEY";

/// Account access as exposed by a wallet provider.
pub trait WalletBridge: Send + Sync {
    /// Whether a wallet is available at all.
    fn is_installed(&self) -> bool;

    /// Accounts already authorized for this client. Never prompts.
    fn accounts(&self) -> impl Future<Output = BlockchainResult<Vec<Address>>> + Send;

    /// Ask the wallet to authorize accounts; may prompt the user.
    fn request_accounts(&self) -> impl Future<Output = BlockchainResult<Vec<Address>>> + Send;

    /// Chain the wallet is currently connected to.
    fn chain_id(&self) -> impl Future<Output = BlockchainResult<ChainId>> + Send;
}

/// A local signing key.
#[derive(Debug, Clone)]
pub struct Wallet {
    signer: PrivateKeySigner,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    pub fn from_private_key(private_key_hex: &str) -> BlockchainResult<Self> {
        let key_hex = private_key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| BlockchainError::Wallet(format!("Invalid private key format: {}", e)))?;

        tracing::info!(address = %signer.address(), "Local wallet loaded");

        Ok(Self { signer })
    }

    /// Load wallet from environment variable, if it is set.
    ///
    /// Reads `MINT_WALLET_PRIVATE_KEY` from environment.
    pub fn from_env() -> BlockchainResult<Option<Self>> {
        match std::env::var(PRIVATE_KEY_ENV_VAR) {
            Ok(key) if !key.trim().is_empty() => Self::from_private_key(&key).map(Some),
            _ => Ok(None),
        }
    }

    /// Get the wallet's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// The signer, for handing to a provider.
    pub fn signer(&self) -> PrivateKeySigner {
        self.signer.clone()
    }
}

/// Wallet bridge backed by a JSON-RPC endpoint.
#[derive(Debug, Clone)]
pub struct RpcWallet {
    client: Option<BlockchainClient>,
    local: Option<Wallet>,
}

impl RpcWallet {
    /// Build the bridge. A missing `rpc_url` yields a bridge that reports
    /// itself as not installed rather than an error.
    pub fn connect(config: &WalletConfig, local: Option<Wallet>) -> BlockchainResult<Self> {
        let client = match BlockchainClient::new(config, local.as_ref().map(Wallet::signer)) {
            Ok(client) => Some(client),
            Err(BlockchainError::WalletMissing) => None,
            Err(e) => return Err(e),
        };
        Ok(Self { client, local })
    }

    /// The RPC client, or `WalletMissing`.
    pub fn client(&self) -> BlockchainResult<&BlockchainClient> {
        self.client.as_ref().ok_or(BlockchainError::WalletMissing)
    }

    /// Address of the local key, if one is loaded.
    pub fn local_address(&self) -> Option<Address> {
        self.local.as_ref().map(Wallet::address)
    }
}

impl WalletBridge for RpcWallet {
    fn is_installed(&self) -> bool {
        self.client.is_some()
    }

    async fn accounts(&self) -> BlockchainResult<Vec<Address>> {
        let client = self.client()?;
        if let Some(address) = self.local_address() {
            return Ok(vec![address]);
        }
        client.get_accounts().await
    }

    async fn request_accounts(&self) -> BlockchainResult<Vec<Address>> {
        let client = self.client()?;
        if let Some(address) = self.local_address() {
            return Ok(vec![address]);
        }
        let accounts = client.request_accounts().await?;
        if accounts.is_empty() {
            return Err(BlockchainError::NoAccounts);
        }
        Ok(accounts)
    }

    async fn chain_id(&self) -> BlockchainResult<ChainId> {
        self.client()?.get_chain_id().await
    }
}
