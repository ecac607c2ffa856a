//! Session controller behaviour against in-memory wallet and contract doubles.

use alloy::primitives::U256;
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

use nft_mint::blockchain::{MintEvent, WalletBridge};
use nft_mint::session::controller::GET_WALLET_MESSAGE;
use nft_mint::session::request_connection;
use nft_mint::ui::ToastKind;

mod common;
use common::{MintBehavior, MockContract, MockWallet, ALICE, BOB, CONTRACT};

fn event(sender: alloy::primitives::Address, token_id: u64) -> MintEvent {
    MintEvent {
        sender,
        token_id: U256::from(token_id),
        tx_hash: None,
        block_number: None,
    }
}

#[tokio::test]
async fn test_missing_wallet() {
    let contract = MockContract::new(0);
    let mut session = common::session(MockWallet::missing(), contract.clone());

    session.check_if_wallet_is_connected().await;
    assert!(!session.state().is_connected());
    assert!(session.state().toasts.is_empty(), "startup check stays quiet");

    session.connect_wallet().await;
    let toast = session.state().toasts.latest().unwrap();
    assert_eq!(toast.kind, ToastKind::Error);
    assert_eq!(toast.message, GET_WALLET_MESSAGE);

    assert!(session.mint_nft().await.is_none());
    assert_eq!(contract.mint_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_picks_up_authorized_account_without_prompting() {
    let wallet = MockWallet::authorized(vec![BOB, ALICE]);
    let mut session = common::session(wallet.clone(), MockContract::new(0));

    session.check_if_wallet_is_connected().await;
    assert_eq!(session.state().current_account, Some(BOB));
    assert_eq!(wallet.request_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_connect_wallet() {
    let wallet = MockWallet::new();
    let mut session = common::session(wallet.clone(), MockContract::new(0));

    session.check_if_wallet_is_connected().await;
    assert!(!session.state().is_connected());

    session.connect_wallet().await;
    assert_eq!(session.state().current_account, Some(ALICE));
    assert_eq!(wallet.request_calls.load(Ordering::SeqCst), 1);
    assert_eq!(session.state().toasts.latest().unwrap().kind, ToastKind::Success);
    assert_eq!(session.wallet().accounts().await.unwrap(), vec![ALICE]);
}

#[tokio::test]
async fn test_connect_rejected() {
    let mut wallet = MockWallet::new();
    wallet.reject_request = true;
    let mut session = common::session(wallet, MockContract::new(0));

    session.connect_wallet().await;
    assert!(!session.state().is_connected());
    let toast = session.state().toasts.latest().unwrap();
    assert_eq!(toast.kind, ToastKind::Error);
    assert!(toast.message.contains("User rejected"));
}

#[tokio::test]
async fn test_second_connect_rejected_while_waiting() {
    let wallet = MockWallet::new();
    let mut session = common::session(wallet.clone(), MockContract::new(0));

    assert!(session.begin_connect());
    assert!(session.state().connecting);
    assert!(!session.begin_connect());
    assert_eq!(
        session.state().toasts.latest().unwrap().message,
        "Waiting for the wallet to approve the connection"
    );

    let answer = request_connection(&wallet).await;
    session.finish_connect(answer);
    assert!(!session.state().connecting);
    assert_eq!(session.state().current_account, Some(ALICE));
}

#[tokio::test]
async fn test_connect_on_wrong_chain_warns() {
    let mut wallet = MockWallet::new();
    wallet.chain_id = 1;
    let mut session = common::session(wallet, MockContract::new(0));

    session.connect_wallet().await;
    // Still connected; the mismatch is only reported.
    assert_eq!(session.state().current_account, Some(ALICE));
    let toast = session.state().toasts.latest().unwrap();
    assert_eq!(toast.kind, ToastKind::Error);
    assert!(toast.message.contains("not connected to chain 31337"));
}

#[tokio::test]
async fn test_failed_count_read_keeps_last_value() {
    let contract = MockContract::new(7);
    let mut session = common::session(MockWallet::new(), contract.clone());

    session.fetch_minted_count().await;
    assert_eq!(session.state().minted_count, Some(7));

    contract.minted.store(9, Ordering::SeqCst);
    contract.fail_reads.store(true, Ordering::SeqCst);
    session.fetch_minted_count().await;
    assert_eq!(session.state().minted_count, Some(7));

    contract.fail_reads.store(false, Ordering::SeqCst);
    session.fetch_minted_count().await;
    assert_eq!(session.state().minted_count, Some(9));
}

#[tokio::test]
async fn test_mint_requires_account() {
    let contract = MockContract::new(0);
    let mut session = common::session(MockWallet::new(), contract.clone());

    assert!(session.mint_nft().await.is_none());
    assert!(!session.state().loading);
    assert_eq!(session.state().toasts.latest().unwrap().message, "Connect your wallet first");
    assert_eq!(contract.mint_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_mint_success() {
    let contract = MockContract::new(4);
    let mut session = common::session(MockWallet::authorized(vec![ALICE]), contract.clone());
    session.check_if_wallet_is_connected().await;

    let receipt = session.mint_nft().await.expect("mint should succeed");
    assert_eq!(receipt.events.len(), 1);

    let state = session.state();
    assert!(!state.loading);
    assert_eq!(state.minted_count, Some(5));
    assert!(state.confetti_visible(Instant::now()));
    assert_eq!(state.last_minted.as_ref().unwrap().token_id, U256::from(4));

    let success = state
        .toasts
        .iter()
        .find(|t| t.kind == ToastKind::Success)
        .expect("success toast");
    assert!(success.message.contains("#4"));
    assert!(success
        .message
        .contains(&format!("https://market.example/assets/{}/4", CONTRACT)));
}

#[tokio::test]
async fn test_mint_reverted() {
    let mut contract = MockContract::new(2);
    contract.behavior = MintBehavior::Revert;
    let mut session = common::session(MockWallet::authorized(vec![ALICE]), contract.clone());
    session.check_if_wallet_is_connected().await;
    session.fetch_minted_count().await;

    assert!(session.mint_nft().await.is_none());
    let state = session.state();
    assert!(!state.loading, "loading is cleared on failure too");
    assert_eq!(state.minted_count, Some(2));
    assert!(!state.confetti_visible(Instant::now()));
    let toast = state.toasts.latest().unwrap();
    assert_eq!(toast.kind, ToastKind::Error);
    assert!(toast.message.contains("reverted"));
}

#[tokio::test]
async fn test_second_mint_rejected_while_loading() {
    let contract = MockContract::new(0);
    let mut session = common::session(MockWallet::authorized(vec![ALICE]), contract);
    session.check_if_wallet_is_connected().await;

    assert_eq!(session.begin_mint(), Some(ALICE));
    assert!(session.state().loading);
    assert_eq!(session.begin_mint(), None);
    assert_eq!(
        session.state().toasts.latest().unwrap().message,
        "A mint is already in progress"
    );
}

#[tokio::test]
async fn test_receipt_and_watcher_announce_once() {
    let contract = MockContract::new(0);
    let mut session = common::session(MockWallet::authorized(vec![ALICE]), contract);
    session.check_if_wallet_is_connected().await;

    let receipt = session.mint_nft().await.unwrap();
    let from_watcher = receipt.events[0].clone();
    session.on_minted(from_watcher).await;

    let successes = session
        .state()
        .toasts
        .iter()
        .filter(|t| t.kind == ToastKind::Success)
        .count();
    assert_eq!(successes, 1);
}

#[tokio::test]
async fn test_someone_else_minted() {
    let contract = MockContract::new(0);
    let mut session = common::session(MockWallet::authorized(vec![ALICE]), contract.clone());
    session.check_if_wallet_is_connected().await;

    // Another user's mint bumps the on-chain counter.
    contract.minted.store(1, Ordering::SeqCst);
    session.on_minted(event(BOB, 0)).await;

    let state = session.state();
    assert_eq!(state.minted_count, Some(1));
    assert!(!state.confetti_visible(Instant::now()));
    assert!(state.toasts.is_empty());
}

#[tokio::test]
async fn test_tick_expires_confetti_and_toasts() {
    let contract = MockContract::new(0);
    let mut session = common::session(MockWallet::authorized(vec![ALICE]), contract);
    session.check_if_wallet_is_connected().await;
    session.mint_nft().await.unwrap();

    assert!(!session.tick(Instant::now()));
    assert!(session.tick(Instant::now() + Duration::from_secs(31)));
    assert!(session.state().toasts.is_empty());
    assert!(session.state().confetti_until.is_none());
}

#[test]
fn test_marketplace_link_disabled_when_unset() {
    let mut settings = common::settings();
    settings.marketplace_url.clear();
    let session = nft_mint::MintSession::new(MockWallet::new(), MockContract::new(0), settings);
    assert!(session.marketplace_link(U256::from(1)).is_none());
}
