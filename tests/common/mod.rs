//! Shared in-memory doubles for the wallet bridge and the contract, and a
//! scriptable JSON-RPC endpoint.

#![allow(dead_code)]

use alloy::primitives::{Address, TxHash, U256};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use nft_mint::blockchain::{
    BlockchainError, BlockchainResult, ChainId, MintContract, MintEvent, MintReceipt, WalletBridge,
};
use nft_mint::session::{MintSession, SessionSettings};

pub const ALICE: Address = Address::repeat_byte(0xa1);
pub const BOB: Address = Address::repeat_byte(0xb0);
pub const CONTRACT: Address = Address::repeat_byte(0xc0);
pub const CHAIN_ID: u64 = 31337;

/// Wallet bridge with scripted accounts.
#[derive(Clone)]
pub struct MockWallet {
    pub installed: bool,
    /// Accounts returned by `accounts()` (already authorized).
    pub authorized: Arc<Mutex<Vec<Address>>>,
    /// Accounts granted by `request_accounts()`.
    pub grant: Vec<Address>,
    pub chain_id: u64,
    pub reject_request: bool,
    pub request_calls: Arc<AtomicUsize>,
    /// How long the user takes to answer the approval prompt.
    pub request_delay: Duration,
}

impl MockWallet {
    pub fn new() -> Self {
        Self {
            installed: true,
            authorized: Arc::new(Mutex::new(Vec::new())),
            grant: vec![ALICE],
            chain_id: CHAIN_ID,
            reject_request: false,
            request_calls: Arc::new(AtomicUsize::new(0)),
            request_delay: Duration::ZERO,
        }
    }

    pub fn missing() -> Self {
        Self {
            installed: false,
            ..Self::new()
        }
    }

    pub fn authorized(accounts: Vec<Address>) -> Self {
        let wallet = Self::new();
        *wallet.authorized.lock().unwrap() = accounts;
        wallet
    }
}

impl WalletBridge for MockWallet {
    fn is_installed(&self) -> bool {
        self.installed
    }

    async fn accounts(&self) -> BlockchainResult<Vec<Address>> {
        if !self.installed {
            return Err(BlockchainError::WalletMissing);
        }
        Ok(self.authorized.lock().unwrap().clone())
    }

    async fn request_accounts(&self) -> BlockchainResult<Vec<Address>> {
        if !self.installed {
            return Err(BlockchainError::WalletMissing);
        }
        self.request_calls.fetch_add(1, Ordering::SeqCst);
        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }
        if self.reject_request {
            return Err(BlockchainError::Rpc("User rejected the request.".to_string()));
        }
        *self.authorized.lock().unwrap() = self.grant.clone();
        Ok(self.grant.clone())
    }

    async fn chain_id(&self) -> BlockchainResult<ChainId> {
        Ok(ChainId(self.chain_id))
    }
}

/// How the mock contract answers a mint.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MintBehavior {
    Succeed,
    Revert,
}

/// Contract double keeping its own counter.
#[derive(Clone)]
pub struct MockContract {
    pub minted: Arc<AtomicU64>,
    pub mint_calls: Arc<AtomicUsize>,
    pub behavior: MintBehavior,
    pub fail_reads: Arc<AtomicBool>,
    pub mint_delay: Duration,
}

impl MockContract {
    pub fn new(minted: u64) -> Self {
        Self {
            minted: Arc::new(AtomicU64::new(minted)),
            mint_calls: Arc::new(AtomicUsize::new(0)),
            behavior: MintBehavior::Succeed,
            fail_reads: Arc::new(AtomicBool::new(false)),
            mint_delay: Duration::ZERO,
        }
    }
}

pub fn tx_hash(n: u8) -> TxHash {
    TxHash::repeat_byte(n)
}

impl MintContract for MockContract {
    fn address(&self) -> Address {
        CONTRACT
    }

    async fn total_minted(&self) -> BlockchainResult<u64> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(BlockchainError::Timeout(10));
        }
        Ok(self.minted.load(Ordering::SeqCst))
    }

    async fn mint(&self, from: Address) -> BlockchainResult<MintReceipt> {
        self.mint_calls.fetch_add(1, Ordering::SeqCst);
        if !self.mint_delay.is_zero() {
            tokio::time::sleep(self.mint_delay).await;
        }
        if self.behavior == MintBehavior::Revert {
            return Err(BlockchainError::Reverted("mint transaction reverted".to_string()));
        }

        let token_id = self.minted.fetch_add(1, Ordering::SeqCst);
        let hash = tx_hash(token_id as u8 + 1);
        Ok(MintReceipt {
            tx_hash: hash,
            block_number: Some(100 + token_id),
            events: vec![MintEvent {
                sender: from,
                token_id: U256::from(token_id),
                tx_hash: Some(hash),
                block_number: Some(100 + token_id),
            }],
        })
    }
}

pub fn settings() -> SessionSettings {
    SessionSettings {
        expected_chain_id: CHAIN_ID,
        marketplace_url: "https://market.example/assets/".to_string(),
        toast_ttl: Duration::from_secs(30),
        confetti_duration: Duration::from_secs(30),
    }
}

pub fn session(wallet: MockWallet, contract: MockContract) -> MintSession<MockWallet, MockContract> {
    MintSession::new(wallet, contract, settings())
}

/// Start a JSON-RPC endpoint on an ephemeral port.
///
/// `handler` maps a method and its params to a result or an error message.
/// Returns the bound address and the methods called so far.
pub async fn start_rpc_backend<F>(handler: F) -> (SocketAddr, Arc<Mutex<Vec<String>>>)
where
    F: Fn(&str, &Value) -> Result<Value, String> + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handler = Arc::new(handler);
    let calls = Arc::new(Mutex::new(Vec::new()));
    let seen = calls.clone();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let handler = handler.clone();
            let seen = seen.clone();
            tokio::spawn(async move {
                let Some(request) = read_request(&mut socket).await else {
                    return;
                };
                let method = request["method"].as_str().unwrap_or_default().to_string();
                seen.lock().unwrap().push(method.clone());

                let body = match handler(&method, &request["params"]) {
                    Ok(result) => json!({ "jsonrpc": "2.0", "id": request["id"], "result": result }),
                    Err(message) => json!({
                        "jsonrpc": "2.0",
                        "id": request["id"],
                        "error": { "code": -32000, "message": message },
                    }),
                }
                .to_string();

                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (addr, calls)
}

async fn read_request(socket: &mut TcpStream) -> Option<Value> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
    let content_length = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    serde_json::from_slice(&buf[header_end..header_end + content_length]).ok()
}
