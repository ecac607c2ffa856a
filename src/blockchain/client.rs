//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to the wallet's JSON-RPC endpoint
//! - Query chain state (chain id, block number, accounts, logs)
//! - Forward contract calls and transactions
//! - Handle timeouts and network errors gracefully

use alloy::primitives::{Address, Bytes};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{Filter, Log, TransactionReceipt, TransactionRequest};
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::TransportResult;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainId};
use crate::config::WalletConfig;
use crate::observability::metrics;

/// A provider shared between clones of the client.
pub type SharedProvider = Arc<dyn Provider + Send + Sync>;

/// Blockchain RPC client wrapper with failover support.
#[derive(Clone)]
pub struct BlockchainClient {
    /// List of providers (primary + failovers).
    providers: Vec<SharedProvider>,
    /// Primary endpoint, kept for diagnostics.
    rpc_url: String,
    /// Expected chain ID.
    chain_id: u64,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Create a new blockchain client.
    ///
    /// No network traffic happens here; endpoints are contacted lazily.
    /// With a `signer`, transactions are signed locally. Without one, the
    /// endpoint itself is expected to sign (`eth_sendTransaction`).
    pub fn new(config: &WalletConfig, signer: Option<PrivateKeySigner>) -> BlockchainResult<Self> {
        let rpc_url = config.rpc_url.clone().ok_or(BlockchainError::WalletMissing)?;
        let mut providers = Vec::new();

        let primary_url: url::Url = rpc_url
            .parse()
            .map_err(|e| BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", rpc_url, e)))?;
        providers.push(build_provider(primary_url, signer.clone()));

        for url_str in &config.failover_urls {
            match url_str.parse() {
                Ok(url) => providers.push(build_provider(url, signer.clone())),
                Err(_) => tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL"),
            }
        }

        tracing::info!(
            rpc_url = %rpc_url,
            failovers = providers.len() - 1,
            chain_id = config.chain_id,
            local_signer = signer.is_some(),
            "Blockchain client initialized"
        );

        Self::from_providers(
            providers,
            rpc_url,
            config.chain_id,
            Duration::from_secs(config.rpc_timeout_secs),
        )
    }

    /// Build a client over already-connected providers, primary first.
    pub fn from_providers(
        providers: Vec<SharedProvider>,
        rpc_url: impl Into<String>,
        chain_id: u64,
        timeout_duration: Duration,
    ) -> BlockchainResult<Self> {
        if providers.is_empty() {
            return Err(BlockchainError::WalletMissing);
        }
        Ok(Self {
            providers,
            rpc_url: rpc_url.into(),
            chain_id,
            timeout_duration,
        })
    }

    /// Run a read-only request against each provider in turn until one answers.
    async fn with_failover<T, F, Fut>(&self, op: &'static str, f: F) -> BlockchainResult<T>
    where
        F: Fn(SharedProvider) -> Fut,
        Fut: Future<Output = TransportResult<T>>,
    {
        for (i, provider) in self.providers.iter().enumerate() {
            match timeout(self.timeout_duration, f(provider.clone())).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, op, error = %e, "RPC error, trying next provider");
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, op, "RPC timeout, trying next provider");
                }
            }
        }
        Err(BlockchainError::Rpc(format!("All RPC providers failed ({})", op)))
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        self.with_failover("eth_chainId", |p| async move { p.get_chain_id().await })
            .await
            .map(ChainId)
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> BlockchainResult<u64> {
        self.with_failover("eth_blockNumber", |p| async move { p.get_block_number().await })
            .await
    }

    /// Accounts the wallet has already authorized (`eth_accounts`).
    pub async fn get_accounts(&self) -> BlockchainResult<Vec<Address>> {
        self.with_failover("eth_accounts", |p| async move { p.get_accounts().await })
            .await
    }

    /// Ask the wallet to authorize accounts (`eth_requestAccounts`).
    ///
    /// Only the primary endpoint is asked: this may prompt the user, and a
    /// failover node has no say over the user's wallet.
    pub async fn request_accounts(&self) -> BlockchainResult<Vec<Address>> {
        self.primary()
            .client()
            .request_noparams::<Vec<Address>>("eth_requestAccounts")
            .await
            .map_err(|e| BlockchainError::Rpc(e.to_string()))
    }

    /// Execute a read-only contract call (`eth_call`).
    pub async fn call(&self, tx: TransactionRequest) -> BlockchainResult<Bytes> {
        self.with_failover("eth_call", |p| {
            let tx = tx.clone();
            async move { p.call(tx).await }
        })
        .await
    }

    /// Broadcast a transaction on the primary endpoint and wait until it is mined.
    ///
    /// Submission is bounded by the RPC timeout; mining is not.
    pub async fn send_and_confirm(&self, tx: TransactionRequest) -> BlockchainResult<TransactionReceipt> {
        let pending = match timeout(self.timeout_duration, self.primary().send_transaction(tx)).await {
            Ok(Ok(pending)) => pending,
            Ok(Err(e)) => return Err(BlockchainError::Rpc(e.to_string())),
            Err(_) => return Err(BlockchainError::Timeout(self.timeout_duration.as_secs())),
        };

        let tx_hash = *pending.tx_hash();
        tracing::info!(tx_hash = %tx_hash, "Transaction submitted, waiting to be mined");

        pending
            .get_receipt()
            .await
            .map_err(|e| BlockchainError::Rpc(format!("Waiting for {} failed: {}", tx_hash, e)))
    }

    /// Fetch logs matching a filter.
    pub async fn get_logs(&self, filter: &Filter) -> BlockchainResult<Vec<Log>> {
        self.with_failover("eth_getLogs", |p| {
            let filter = filter.clone();
            async move { p.get_logs(&filter).await }
        })
        .await
    }

    /// Check if the wallet endpoint is reachable and healthy.
    ///
    /// Returns true if we can query the block number.
    pub async fn is_healthy(&self) -> bool {
        let healthy = self.get_block_number().await.is_ok();
        metrics::record_rpc_health(healthy);
        healthy
    }

    /// Get the underlying primary provider.
    pub fn primary(&self) -> &(dyn Provider + Send + Sync) {
        self.providers[0].as_ref()
    }

    /// Chain ID the client expects to talk to.
    pub fn expected_chain_id(&self) -> u64 {
        self.chain_id
    }
}

fn build_provider(url: url::Url, signer: Option<PrivateKeySigner>) -> SharedProvider {
    match signer {
        Some(signer) => Arc::new(ProviderBuilder::new().wallet(signer).connect_http(url)) as SharedProvider,
        None => Arc::new(ProviderBuilder::new().connect_http(url)) as SharedProvider,
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("rpc_url", &self.rpc_url)
            .field("providers", &self.providers.len())
            .field("chain_id", &self.chain_id)
            .field("timeout_secs", &self.timeout_duration.as_secs())
            .finish()
    }
}

/// Client over alloy's mocked transport, answering from `asserter` in order.
#[cfg(test)]
pub(crate) fn mocked_client(asserter: &alloy::providers::mock::Asserter) -> BlockchainClient {
    let provider = ProviderBuilder::new().connect_mocked_client(asserter.clone());
    let providers = vec![Arc::new(provider) as SharedProvider];
    match BlockchainClient::from_providers(providers, "mock://", 31337, Duration::from_secs(2)) {
        Ok(client) => client,
        Err(e) => panic!("mocked client: {}", e),
    }
}
