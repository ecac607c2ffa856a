//! Mint event watcher.
//!
//! Polls the contract's `NewEpicNFTMinted` logs and forwards every decoded
//! event to the session over a channel.

use alloy::primitives::Address;
use alloy::rpc::types::Filter;
use alloy::sol_types::SolEvent;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::contract::{decode_mint_logs, EpicNft};
use crate::blockchain::types::{BlockchainResult, MintEvent};
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics;

/// Service that watches the chain for mint confirmations.
pub struct MintWatcher {
    client: BlockchainClient,
    contract_address: Address,
    poll_interval: Duration,
    /// First block not yet scanned. `None` until the first poll.
    next_block: Option<u64>,
    events_tx: mpsc::Sender<MintEvent>,
}

impl MintWatcher {
    /// Create a watcher and the receiver its events arrive on.
    ///
    /// `from_block` is the first block to scan; by default scanning starts
    /// after the head at the time of the first poll.
    pub fn new(
        client: BlockchainClient,
        contract_address: Address,
        poll_interval: Duration,
        from_block: Option<u64>,
    ) -> (Self, mpsc::Receiver<MintEvent>) {
        let (events_tx, events_rx) = mpsc::channel(64);
        let watcher = Self {
            client,
            contract_address,
            poll_interval,
            next_block: from_block,
            events_tx,
        };
        (watcher, events_rx)
    }

    /// Run the polling loop until shutdown or until the receiver is dropped.
    pub async fn run(mut self, mut shutdown: ShutdownSignal) {
        tracing::info!(
            contract = %self.contract_address,
            interval_ms = self.poll_interval.as_millis() as u64,
            "Mint watcher starting"
        );

        let mut ticker = interval(self.poll_interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.poll_events().await {
                        Ok(true) => {}
                        Ok(false) => {
                            tracing::debug!("Mint event receiver dropped, stopping watcher");
                            break;
                        }
                        Err(e) => tracing::warn!(error = %e, "Error polling mint events"),
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("Mint watcher received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Scan new blocks once. Returns `Ok(false)` when nobody is listening anymore.
    async fn poll_events(&mut self) -> BlockchainResult<bool> {
        let current_block = self.client.get_block_number().await?;

        let Some(next_block) = self.next_block else {
            self.next_block = Some(current_block + 1);
            tracing::info!(block = current_block, "Initialized mint watcher at block");
            return Ok(true);
        };

        if current_block < next_block {
            return Ok(true);
        }

        let filter = Filter::new()
            .address(self.contract_address)
            .from_block(next_block)
            .to_block(current_block)
            .event_signature(EpicNft::NewEpicNFTMinted::SIGNATURE_HASH);

        let logs = self.client.get_logs(&filter).await?;

        for event in decode_mint_logs(self.contract_address, &logs) {
            tracing::info!(
                sender = %event.sender,
                token_id = %event.token_id,
                block_number = ?event.block_number,
                "Mint event observed"
            );
            metrics::record_mint_event();
            if self.events_tx.send(event).await.is_err() {
                return Ok(false);
            }
        }

        self.next_block = Some(current_block + 1);
        Ok(true)
    }
}
