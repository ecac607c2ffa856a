//! The collection contract: ABI, reads and the mint transaction.

use alloy::network::{ReceiptResponse, TransactionBuilder};
use alloy::primitives::{Address, U256};
use alloy::rpc::types::{Log, TransactionRequest};
use alloy::sol;
use alloy::sol_types::SolCall;
use std::future::Future;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::types::{BlockchainError, BlockchainResult, MintEvent, MintReceipt};

sol! {
    /// Minimal ABI of the collection contract.
    #[derive(Debug, PartialEq, Eq)]
    interface EpicNft {
        /// Mint a new token for the caller.
        function makeAnEpicNFT() external;

        /// Number of tokens minted so far.
        function getTotalNFTsMintedSoFar() external view returns (uint256);

        /// Emitted once a token has been minted.
        event NewEpicNFTMinted(address sender, uint256 tokenId);
    }
}

/// Operations the client needs from the collection contract.
pub trait MintContract: Send + Sync {
    /// Address of the contract.
    fn address(&self) -> Address;

    /// Read the total-minted-so-far counter.
    fn total_minted(&self) -> impl Future<Output = BlockchainResult<u64>> + Send;

    /// Send the mint transaction from `from` and wait for it to be mined.
    fn mint(&self, from: Address) -> impl Future<Output = BlockchainResult<MintReceipt>> + Send;
}

/// [`MintContract`] over JSON-RPC.
#[derive(Debug, Clone)]
pub struct NftContract {
    client: Option<BlockchainClient>,
    address: Address,
}

impl NftContract {
    /// Bind to a deployed contract. Without a client every call reports a
    /// missing wallet.
    pub fn new(client: Option<BlockchainClient>, address: Address) -> Self {
        Self { client, address }
    }

    fn client(&self) -> BlockchainResult<&BlockchainClient> {
        self.client.as_ref().ok_or(BlockchainError::WalletMissing)
    }
}

impl MintContract for NftContract {
    fn address(&self) -> Address {
        self.address
    }

    async fn total_minted(&self) -> BlockchainResult<u64> {
        let tx = TransactionRequest::default()
            .with_to(self.address)
            .with_input(EpicNft::getTotalNFTsMintedSoFarCall {}.abi_encode());

        let output = self.client()?.call(tx).await?;
        let total = EpicNft::getTotalNFTsMintedSoFarCall::abi_decode_returns(&output)
            .map_err(|e| BlockchainError::Decode(e.to_string()))?;

        u64::try_from(total)
            .map_err(|_| BlockchainError::Decode(format!("minted count {} does not fit in u64", total)))
    }

    async fn mint(&self, from: Address) -> BlockchainResult<MintReceipt> {
        let client = self.client()?;
        let tx = TransactionRequest::default()
            .with_from(from)
            .with_to(self.address)
            .with_value(U256::ZERO)
            .with_input(EpicNft::makeAnEpicNFTCall {}.abi_encode());

        tracing::info!(from = %from, contract = %self.address, "Sending mint transaction");
        let receipt = client.send_and_confirm(tx).await?;

        if !receipt.status() {
            return Err(BlockchainError::Reverted(format!(
                "mint transaction {} reverted",
                receipt.transaction_hash
            )));
        }

        let events = decode_mint_logs(self.address, receipt.inner.logs());
        tracing::info!(
            tx_hash = %receipt.transaction_hash,
            block_number = ?receipt.block_number,
            events = events.len(),
            "Mint transaction mined"
        );

        Ok(MintReceipt {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            events,
        })
    }
}

/// Decode every `NewEpicNFTMinted` log emitted by `contract`, skipping
/// unrelated logs.
pub fn decode_mint_logs(contract: Address, logs: &[Log]) -> Vec<MintEvent> {
    logs.iter()
        .filter(|log| log.address() == contract)
        .filter_map(|log| {
            let decoded = log.log_decode::<EpicNft::NewEpicNFTMinted>().ok()?;
            Some(MintEvent {
                sender: decoded.inner.data.sender,
                token_id: decoded.inner.data.tokenId,
                tx_hash: log.transaction_hash,
                block_number: log.block_number,
            })
        })
        .collect()
}
