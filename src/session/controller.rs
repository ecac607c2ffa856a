//! Session controller: the wallet and contract operations behind each
//! user action, and how their outcomes land in [`SessionState`].
//!
//! Errors never escape from here. They are logged and turned into toasts;
//! nothing is retried.

use alloy::primitives::{Address, U256};
use std::time::{Duration, Instant};

use crate::blockchain::{
    BlockchainError, BlockchainResult, ChainId, MintContract, MintEvent, MintReceipt, WalletBridge,
};
use crate::config::MintConfig;
use crate::observability::metrics;
use crate::session::state::SessionState;
use crate::ui::toast::ToastKind;

/// Message shown when no wallet is available and the user tries to use one.
pub const GET_WALLET_MESSAGE: &str = "Get a wallet! Set wallet.rpc_url or MINT_WALLET_PRIVATE_KEY";

/// Knobs the controller needs from the config.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub expected_chain_id: u64,
    pub marketplace_url: String,
    pub toast_ttl: Duration,
    pub confetti_duration: Duration,
}

impl From<&MintConfig> for SessionSettings {
    fn from(config: &MintConfig) -> Self {
        Self {
            expected_chain_id: config.wallet.chain_id,
            marketplace_url: config.contract.marketplace_url.clone(),
            toast_ttl: Duration::from_secs(config.ui.toast_secs),
            confetti_duration: Duration::from_secs(config.ui.confetti_secs),
        }
    }
}

/// The wallet's answer to a connection request.
#[derive(Debug)]
pub struct Connection {
    pub accounts: Vec<Address>,
    /// Chain the wallet is on, queried right after approval.
    pub chain_id: BlockchainResult<ChainId>,
}

/// Ask `wallet` for access. May wait on a user prompt for a long time.
pub async fn request_connection<W: WalletBridge>(wallet: &W) -> BlockchainResult<Connection> {
    let accounts = wallet.request_accounts().await?;
    let chain_id = wallet.chain_id().await;
    Ok(Connection { accounts, chain_id })
}

pub struct MintSession<W, C> {
    wallet: W,
    contract: C,
    settings: SessionSettings,
    state: SessionState,
}

impl<W: WalletBridge, C: MintContract> MintSession<W, C> {
    pub fn new(wallet: W, contract: C, settings: SessionSettings) -> Self {
        let state = SessionState::new(settings.toast_ttl);
        Self {
            wallet,
            contract,
            settings,
            state,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn contract(&self) -> &C {
        &self.contract
    }

    pub fn wallet(&self) -> &W {
        &self.wallet
    }

    /// Show a toast that did not come from a wallet or contract operation.
    pub fn notify(&mut self, kind: ToastKind, message: impl Into<String>) {
        self.state.toast(kind, message);
    }

    /// Pick up an already-authorized account without prompting. Runs once
    /// at startup.
    pub async fn check_if_wallet_is_connected(&mut self) {
        if !self.wallet.is_installed() {
            tracing::info!("Make sure you have a wallet!");
            return;
        }
        tracing::debug!("Wallet provider available");

        match self.wallet.accounts().await {
            Ok(accounts) => match accounts.first() {
                Some(account) => {
                    tracing::info!(account = %account, "Found an authorized account");
                    self.state.current_account = Some(*account);
                }
                None => tracing::info!("No authorized account found"),
            },
            Err(e) => tracing::warn!(error = %e, "Could not list wallet accounts"),
        }
    }

    /// Ask the wallet for access and take its first account.
    pub async fn connect_wallet(&mut self) {
        if !self.begin_connect() {
            return;
        }
        let result = request_connection(&self.wallet).await;
        self.finish_connect(result);
    }

    /// Validate a connect request and raise the `connecting` flag.
    ///
    /// Returns false (with a toast) when there is nothing to ask.
    pub fn begin_connect(&mut self) -> bool {
        if !self.wallet.is_installed() {
            self.state.toast(ToastKind::Error, GET_WALLET_MESSAGE);
            return false;
        }
        if self.state.connecting {
            self.state
                .toast(ToastKind::Info, "Waiting for the wallet to approve the connection");
            return false;
        }
        self.state.connecting = true;
        true
    }

    /// Lower the `connecting` flag and apply the wallet's answer.
    pub fn finish_connect(&mut self, result: BlockchainResult<Connection>) {
        self.state.connecting = false;

        let connection = match result {
            Ok(connection) => connection,
            Err(e) => {
                tracing::error!(error = %e, "Connecting wallet failed");
                self.state.toast(ToastKind::Error, format!("Could not connect wallet: {}", e));
                return;
            }
        };

        let Some(account) = connection.accounts.first().copied() else {
            tracing::warn!("Wallet authorized no accounts");
            self.state.toast(ToastKind::Error, "Wallet authorized no accounts");
            return;
        };

        tracing::info!(account = %account, "Connected");
        self.state.current_account = Some(account);
        self.state
            .toast(ToastKind::Success, format!("Connected {}", short_address(&account)));

        self.check_chain(connection.chain_id);
    }

    /// Warn when the wallet is on a different chain than the contract.
    fn check_chain(&mut self, chain_id: BlockchainResult<ChainId>) {
        match chain_id {
            Ok(chain_id) if chain_id.0 != self.settings.expected_chain_id => {
                let err = BlockchainError::ChainMismatch {
                    expected: self.settings.expected_chain_id,
                    actual: chain_id.0,
                };
                tracing::warn!(error = %err, "Wallet is on the wrong network");
                self.state.toast(
                    ToastKind::Error,
                    format!(
                        "You are not connected to chain {} (wallet is on {})",
                        self.settings.expected_chain_id, chain_id.0
                    ),
                );
            }
            Ok(chain_id) => tracing::debug!(chain_id = chain_id.0, "Wallet chain verified"),
            Err(e) => tracing::warn!(error = %e, "Could not query wallet chain id"),
        }
    }

    /// Refresh the minted counter.
    pub async fn fetch_minted_count(&mut self) {
        let result = self.contract.total_minted().await;
        self.apply_minted_count(result);
    }

    /// Apply a counter read made elsewhere. A failed read keeps the last value.
    pub fn apply_minted_count(&mut self, result: BlockchainResult<u64>) {
        match result {
            Ok(count) => {
                tracing::debug!(count, "Minted count fetched");
                metrics::record_minted_count(count);
                self.state.minted_count = Some(count);
            }
            Err(e) => tracing::warn!(error = %e, "Could not fetch minted count"),
        }
    }

    /// Validate a mint request and raise the loading flag.
    ///
    /// Returns the account to mint from, or `None` (with a toast) when the
    /// mint cannot start.
    pub fn begin_mint(&mut self) -> Option<Address> {
        if self.state.loading {
            self.state.toast(ToastKind::Info, "A mint is already in progress");
            return None;
        }
        if !self.wallet.is_installed() {
            self.state.toast(ToastKind::Error, GET_WALLET_MESSAGE);
            return None;
        }
        let Some(account) = self.state.current_account else {
            self.state.toast(ToastKind::Info, "Connect your wallet first");
            return None;
        };

        tracing::info!(account = %account, "Going to pop wallet now to pay gas...");
        self.state.loading = true;
        Some(account)
    }

    /// Lower the loading flag and apply the outcome of a mint round-trip.
    pub async fn finish_mint(&mut self, result: BlockchainResult<MintReceipt>) -> Option<MintReceipt> {
        self.state.loading = false;

        match result {
            Ok(receipt) => {
                metrics::record_mint_attempt("success");
                tracing::info!(tx_hash = %receipt.tx_hash, "Mined");
                self.state
                    .toast(ToastKind::Info, format!("Mined, see transaction {}", receipt.tx_hash));
                for event in receipt.events.clone() {
                    self.announce(event);
                }
                self.fetch_minted_count().await;
                Some(receipt)
            }
            Err(e) => {
                let outcome = match &e {
                    BlockchainError::Reverted(_) => "reverted",
                    _ => "error",
                };
                metrics::record_mint_attempt(outcome);
                tracing::error!(error = %e, "Mint failed");
                self.state.toast(ToastKind::Error, format!("Mint failed: {}", e));
                None
            }
        }
    }

    /// Mint one token for the connected account and wait for it.
    pub async fn mint_nft(&mut self) -> Option<MintReceipt> {
        let account = self.begin_mint()?;
        let result = self.contract.mint(account).await;
        self.finish_mint(result).await
    }

    /// Handle a mint event from the watcher.
    pub async fn on_minted(&mut self, event: MintEvent) {
        if self.announce(event) {
            self.fetch_minted_count().await;
        }
    }

    /// Announce a mint once. Returns false for tokens already announced.
    fn announce(&mut self, event: MintEvent) -> bool {
        if !self.state.record_mint(&event) {
            return false;
        }

        if Some(event.sender) != self.state.current_account {
            tracing::debug!(sender = %event.sender, token_id = %event.token_id, "Someone else minted");
            return true;
        }

        let mut message = format!(
            "Hey there! We've minted your NFT #{} and sent it to your wallet.",
            event.token_id
        );
        if let Some(link) = self.marketplace_link(event.token_id) {
            message.push_str(&format!(" It can take a few minutes to show up: {}", link));
        }
        self.state.toast(ToastKind::Success, message);
        self.state
            .show_confetti(Instant::now(), self.settings.confetti_duration);
        true
    }

    /// Marketplace page of a token, if a marketplace is configured.
    pub fn marketplace_link(&self, token_id: U256) -> Option<String> {
        let base = self.settings.marketplace_url.trim_end_matches('/');
        if base.is_empty() {
            return None;
        }
        Some(format!("{}/{}/{}", base, self.contract.address(), token_id))
    }

    /// Advance UI time. Returns true if something visible expired.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.state.advance(now)
    }
}

/// `0xabcd…1234` form of an address.
pub fn short_address(address: &Address) -> String {
    let full = address.to_string();
    format!("{}…{}", &full[..6], &full[full.len() - 4..])
}
