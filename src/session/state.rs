//! Per-session UI state.

use alloy::primitives::{Address, U256};
use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::blockchain::MintEvent;
use crate::ui::toast::{ToastKind, ToastQueue};

/// Everything the view renders. Owned by the session controller; each
/// field reflects the last successful read and is left as-is on failure.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Connected account, if any.
    pub current_account: Option<Address>,
    /// Last read of the contract's minted counter.
    pub minted_count: Option<u64>,
    /// A mint transaction is in flight.
    pub loading: bool,
    /// A connection request is waiting for the wallet's approval.
    pub connecting: bool,
    /// Confetti is visible until this instant.
    pub confetti_until: Option<Instant>,
    pub toasts: ToastQueue,
    pub last_minted: Option<MintEvent>,
    /// UI tick counter, drives the spinner.
    pub tick: u64,
    /// Tokens already announced; the receipt and the watcher both report them.
    seen_tokens: HashSet<U256>,
}

impl SessionState {
    pub fn new(toast_ttl: Duration) -> Self {
        Self {
            current_account: None,
            minted_count: None,
            loading: false,
            connecting: false,
            confetti_until: None,
            toasts: ToastQueue::new(toast_ttl),
            last_minted: None,
            tick: 0,
            seen_tokens: HashSet::new(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.current_account.is_some()
    }

    pub fn confetti_visible(&self, now: Instant) -> bool {
        self.confetti_until.is_some_and(|until| until > now)
    }

    pub fn show_confetti(&mut self, now: Instant, duration: Duration) {
        self.confetti_until = Some(now + duration);
    }

    pub fn toast(&mut self, kind: ToastKind, message: impl Into<String>) {
        self.toasts.push(kind, message, Instant::now());
    }

    /// Remember a minted token. Returns false if it was already seen.
    pub fn record_mint(&mut self, event: &MintEvent) -> bool {
        if !self.seen_tokens.insert(event.token_id) {
            return false;
        }
        self.last_minted = Some(event.clone());
        true
    }

    /// Advance the UI clock: expire toasts and confetti. Returns true if the
    /// screen needs redrawing for reasons other than the spinner.
    pub fn advance(&mut self, now: Instant) -> bool {
        self.tick = self.tick.wrapping_add(1);
        let mut changed = self.toasts.expire(now);
        if self.confetti_until.is_some_and(|until| until <= now) {
            self.confetti_until = None;
            changed = true;
        }
        changed
    }
}
