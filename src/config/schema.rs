//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the mint client.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Address of the deployed collection contract.
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0x6e76563C444F2bABDA96039d6c73E6192f8d9aCB";

/// Supply cap shown next to the minted counter.
pub const TOTAL_MINT_COUNT: u64 = 50;

/// Root configuration for the mint client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MintConfig {
    /// Wallet provider endpoint settings.
    pub wallet: WalletConfig,

    /// Collection contract settings.
    pub contract: ContractConfig,

    /// Terminal UI settings.
    pub ui: UiConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Wallet provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletConfig {
    /// JSON-RPC endpoint of the wallet. `None` means no wallet is installed.
    pub rpc_url: Option<String>,

    /// Failover JSON-RPC endpoint URLs.
    pub failover_urls: Vec<String>,

    /// Chain ID the contract lives on (e.g., 11155111 for Sepolia, 31337 for local Anvil).
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            rpc_url: None,
            failover_urls: Vec::new(),
            chain_id: 11_155_111,
            rpc_timeout_secs: 10,
        }
    }
}

/// Collection contract configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Contract address (hex, checksummed or not).
    pub address: String,

    /// Supply cap displayed to the user. Enforcement is the contract's job.
    pub total_mint_count: u64,

    /// Marketplace base URL used to link freshly minted tokens.
    /// Empty disables the link.
    pub marketplace_url: String,

    /// Event polling interval in milliseconds.
    pub poll_interval_ms: u64,

    /// First block to scan for mint events. Defaults to the current head.
    pub from_block: Option<u64>,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_CONTRACT_ADDRESS.to_string(),
            total_mint_count: TOTAL_MINT_COUNT,
            marketplace_url: String::new(),
            poll_interval_ms: 4000,
            from_block: None,
        }
    }
}

/// Terminal UI configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UiConfig {
    /// How long a toast stays on screen, in seconds.
    pub toast_secs: u64,

    /// How long confetti is shown after a successful mint, in seconds.
    pub confetti_secs: u64,

    /// Redraw interval in milliseconds (drives the spinner).
    pub tick_ms: u64,

    /// Emit ANSI colour codes.
    pub color: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            toast_secs: 6,
            confetti_secs: 5,
            tick_ms: 120,
            color: true,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
