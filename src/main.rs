//! NFT mint client (v1)
//!
//! A terminal client for a single NFT collection contract.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────┐
//!   │                        NFT MINT CLIENT                        │
//!   │                                                               │
//!   │  stdin ──▶ app loop ──▶ session controller ──▶ wallet bridge ─┼──▶ JSON-RPC
//!   │               │               │                    │          │    wallet
//!   │               ▼               ▼                    ▼          │
//!   │           ui::view      session state        mint contract ───┼──▶ contract
//!   │               ▲               ▲                               │
//!   │               │               └────────── mint watcher ◀──────┼─── events
//!   │  stdout ◀─────┘                                               │
//!   │                                                               │
//!   │  config · observability (logs to stderr, metrics) · lifecycle │
//!   └──────────────────────────────────────────────────────────────┘
//! ```

use alloy::primitives::Address;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::BufReader;

use nft_mint::app::App;
use nft_mint::blockchain::{MintContract, MintWatcher, NftContract, RpcWallet, Wallet, WalletBridge};
use nft_mint::config::{load_config, MintConfig};
use nft_mint::lifecycle::signals::shutdown_on_signal;
use nft_mint::lifecycle::Shutdown;
use nft_mint::observability::{logging, metrics};
use nft_mint::session::{MintSession, SessionSettings};
use nft_mint::ui::ViewOptions;

#[derive(Parser)]
#[command(name = "nft-mint")]
#[command(about = "Connect a wallet and mint from the NFT collection", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Wallet JSON-RPC endpoint, overrides `wallet.rpc_url`.
    #[arg(long)]
    rpc_url: Option<String>,

    /// Log level, overrides `observability.log_level`.
    #[arg(long)]
    log_level: Option<String>,

    /// Disable ANSI colours.
    #[arg(long)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive session (default)
    Run,
    /// Show wallet account, chain and mint count
    Status,
    /// Ask the wallet for an account
    Connect,
    /// Print how many tokens have been minted
    Count,
    /// Mint one token and wait for it to be mined
    Mint,
    /// Print mint events until interrupted
    Watch,
}

type Session = MintSession<RpcWallet, NftContract>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => MintConfig::default(),
    };
    if let Some(rpc_url) = cli.rpc_url.clone() {
        config.wallet.rpc_url = Some(rpc_url);
        nft_mint::config::validation::validate_config(&config)
            .map_err(nft_mint::config::ConfigError::Validation)?;
    }
    if cli.no_color {
        config.ui.color = false;
    }

    let log_level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.observability.log_level.clone());
    logging::init_logging(&log_level);

    tracing::info!("nft-mint v0.1.0 starting");
    tracing::info!(
        rpc_url = ?config.wallet.rpc_url,
        chain_id = config.wallet.chain_id,
        contract = %config.contract.address,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let contract_address: Address = config.contract.address.parse()?;
    let wallet = RpcWallet::connect(&config.wallet, Wallet::from_env()?)?;
    let contract = NftContract::new(wallet.client().ok().cloned(), contract_address);
    let mut session = MintSession::new(wallet, contract, SessionSettings::from(&config));

    let shutdown = Shutdown::new();
    tokio::spawn(shutdown_on_signal(shutdown.clone()));

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_interactive(session, &config, shutdown).await?,
        Commands::Status => {
            session.check_if_wallet_is_connected().await;
            session.fetch_minted_count().await;
            print_status(&session, &config).await;
        }
        Commands::Connect => {
            session.connect_wallet().await;
            print_toasts(&session);
            if !session.state().is_connected() {
                return Err("wallet not connected".into());
            }
        }
        Commands::Count => {
            session.fetch_minted_count().await;
            match session.state().minted_count {
                Some(count) => println!("{}/{}", count, config.contract.total_mint_count),
                None => return Err("could not read minted count".into()),
            }
        }
        Commands::Mint => {
            session.check_if_wallet_is_connected().await;
            if !session.state().is_connected() {
                session.connect_wallet().await;
            }
            let receipt = session.mint_nft().await;
            print_toasts(&session);
            if receipt.is_none() {
                return Err("mint failed".into());
            }
        }
        Commands::Watch => watch(&session, &config, shutdown).await?,
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn run_interactive(
    session: Session,
    config: &MintConfig,
    shutdown: Shutdown,
) -> Result<(), Box<dyn std::error::Error>> {
    let (events, watcher) = match session.wallet().client() {
        Ok(client) => {
            let (watcher, events) = MintWatcher::new(
                client.clone(),
                session.contract().address(),
                Duration::from_millis(config.contract.poll_interval_ms),
                config.contract.from_block,
            );
            let handle = tokio::spawn(watcher.run(shutdown.subscribe()));
            (Some(events), Some(handle))
        }
        Err(_) => (None, None),
    };

    let view = ViewOptions {
        total_mint_count: config.contract.total_mint_count,
        color: config.ui.color,
        ..ViewOptions::default()
    };
    let mut app = App::new(session, view, Duration::from_millis(config.ui.tick_ms));

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    app.run(stdin, &mut stdout, events, shutdown.clone()).await?;

    // Stop the watcher when the loop ended on its own.
    shutdown.trigger();
    if let Some(handle) = watcher {
        tracing::debug!(subscribers = shutdown.receiver_count(), "Waiting for mint watcher");
        let _ = handle.await;
    }
    Ok(())
}

async fn watch(
    session: &Session,
    config: &MintConfig,
    shutdown: Shutdown,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = session.wallet().client()?.clone();
    let (watcher, mut events) = MintWatcher::new(
        client,
        session.contract().address(),
        Duration::from_millis(config.contract.poll_interval_ms),
        config.contract.from_block,
    );
    let handle = tokio::spawn(watcher.run(shutdown.subscribe()));

    while let Some(event) = events.recv().await {
        println!("{}", serde_json::to_string(&event)?);
    }

    handle.await?;
    Ok(())
}

async fn print_status(session: &Session, config: &MintConfig) {
    let state = session.state();
    let wallet = session.wallet();

    println!("wallet:   {}", if wallet.is_installed() { "available" } else { "missing" });
    match state.current_account {
        Some(account) => println!("account:  {}", account),
        None => println!("account:  not connected"),
    }
    if let Ok(client) = wallet.client() {
        let reachable = client.is_healthy().await;
        println!("rpc:      {}", if reachable { "reachable" } else { "unreachable" });
        match wallet.chain_id().await {
            Ok(chain_id) if chain_id.0 == config.wallet.chain_id => println!("chain:    {}", chain_id.0),
            Ok(chain_id) => println!(
                "chain:    {} (expected {})",
                chain_id.0, config.wallet.chain_id
            ),
            Err(e) => println!("chain:    unknown ({})", e),
        }
    }
    println!("contract: {}", session.contract().address());
    match state.minted_count {
        Some(count) => println!("minted:   {}/{}", count, config.contract.total_mint_count),
        None => println!("minted:   unknown"),
    }
}

fn print_toasts(session: &Session) {
    for toast in session.state().toasts.iter().rev() {
        println!("[{}] {}", toast.kind.label(), toast.message);
    }
}
