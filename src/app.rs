//! Interactive terminal loop.
//!
//! # Data Flow
//! ```text
//! stdin lines ──▶ parse_command ──▶ MintSession ──▶ render ──▶ stdout
//!                                      ▲   │
//! MintWatcher ──(mpsc MintEvent)───────┘   └─ spawned mint task ──(mpsc result)──┐
//!                                      ▲                                         │
//!                                      └─────────────────────────────────────────┘
//! ```
//!
//! Wallet round-trips run on their own tasks so the spinner keeps moving and
//! shutdown is never held up by a wallet prompt. The mint task leaves input
//! open and the `loading` flag rejects a second mint. While a connect or a
//! refresh is pending, input is not read, so later commands see its result.

use std::io::Write;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::time::interval;

use crate::blockchain::{BlockchainResult, MintContract, MintEvent, MintReceipt, WalletBridge};
use crate::lifecycle::Shutdown;
use crate::session::{request_connection, Connection, MintSession};
use crate::ui::toast::ToastKind;
use crate::ui::view::{render, ViewOptions};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// A line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Connect,
    Mint,
    Refresh,
    Quit,
    Unknown(String),
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Option<Command> {
    let word = line.trim().to_ascii_lowercase();
    let command = match word.as_str() {
        "" => return None,
        "c" | "connect" | "login" => Command::Connect,
        "m" | "mint" => Command::Mint,
        "r" | "refresh" => Command::Refresh,
        "q" | "quit" | "exit" => Command::Quit,
        _ => Command::Unknown(line.trim().to_string()),
    };
    Some(command)
}

/// The interactive application.
pub struct App<W, C> {
    session: MintSession<W, C>,
    view: ViewOptions,
    tick: Duration,
}

impl<W, C> App<W, C>
where
    W: WalletBridge + Clone + 'static,
    C: MintContract + Clone + 'static,
{
    pub fn new(session: MintSession<W, C>, view: ViewOptions, tick: Duration) -> Self {
        Self { session, view, tick }
    }

    pub fn session(&self) -> &MintSession<W, C> {
        &self.session
    }

    /// Run until `quit`, end of input, or shutdown.
    ///
    /// `events` carries confirmations from a [`crate::blockchain::MintWatcher`];
    /// pass `None` when no watcher is running.
    pub async fn run<I, O>(
        &mut self,
        input: I,
        out: &mut O,
        mut events: Option<mpsc::Receiver<MintEvent>>,
        shutdown: Shutdown,
    ) -> std::io::Result<()>
    where
        I: AsyncBufRead + Unpin,
        O: Write,
    {
        let session_id = uuid::Uuid::new_v4();
        tracing::info!(session_id = %session_id, "Session started");

        self.session.check_if_wallet_is_connected().await;
        self.session.fetch_minted_count().await;
        self.draw(out)?;

        let (mint_tx, mut mint_rx) = mpsc::channel::<BlockchainResult<MintReceipt>>(1);
        let (connect_tx, mut connect_rx) = mpsc::channel::<BlockchainResult<Connection>>(1);
        let (count_tx, mut count_rx) = mpsc::channel::<BlockchainResult<u64>>(1);
        let mut refreshing = false;
        let mut shutdown_rx = shutdown.subscribe();
        let mut lines = input.lines();
        let mut ticker = interval(self.tick);
        let mut input_open = true;
        let mut events_open = events.is_some();

        loop {
            let mut redraw = true;

            tokio::select! {
                _ = shutdown_rx.recv() => {
                    tracing::debug!(session_id = %session_id, "Shutdown requested");
                    break;
                }
                line = lines.next_line(), if input_open && !refreshing && !self.session.state().connecting => match line {
                    Ok(Some(line)) => match parse_command(&line) {
                        Some(Command::Quit) => break,
                        Some(Command::Connect) => self.start_connect(&connect_tx),
                        Some(Command::Mint) => self.start_mint(&mint_tx),
                        Some(Command::Refresh) => {
                            self.start_refresh(&count_tx);
                            refreshing = true;
                        }
                        Some(Command::Unknown(word)) => {
                            tracing::debug!(input = %word, "Unknown command");
                            self.toast_unknown(&word);
                        }
                        None => redraw = false,
                    },
                    Ok(None) => {
                        tracing::debug!("Input closed");
                        input_open = false;
                        if !self.session.state().loading {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Reading input failed");
                        input_open = false;
                        if !self.session.state().loading {
                            break;
                        }
                    }
                },
                Some(result) = connect_rx.recv() => {
                    self.session.finish_connect(result);
                }
                Some(result) = count_rx.recv() => {
                    refreshing = false;
                    self.session.apply_minted_count(result);
                }
                Some(result) = mint_rx.recv() => {
                    self.session.finish_mint(result).await;
                    if !input_open {
                        self.draw(out)?;
                        break;
                    }
                }
                event = next_event(&mut events), if events_open => match event {
                    Some(event) => self.session.on_minted(event).await,
                    None => {
                        tracing::warn!("Mint watcher stopped");
                        events_open = false;
                    }
                },
                _ = ticker.tick() => {
                    let now = Instant::now();
                    let expired = self.session.tick(now);
                    let state = self.session.state();
                    redraw = expired || state.loading || state.connecting || state.confetti_visible(now);
                }
            }

            if redraw {
                self.draw(out)?;
            }
        }

        tracing::info!(session_id = %session_id, "Session ended");
        Ok(())
    }

    fn start_connect(&mut self, results: &mpsc::Sender<BlockchainResult<Connection>>) {
        if !self.session.begin_connect() {
            return;
        }
        let wallet = self.session.wallet().clone();
        let results = results.clone();
        tokio::spawn(async move {
            let result = request_connection(&wallet).await;
            let _ = results.send(result).await;
        });
    }

    fn start_refresh(&self, results: &mpsc::Sender<BlockchainResult<u64>>) {
        let contract = self.session.contract().clone();
        let results = results.clone();
        tokio::spawn(async move {
            let _ = results.send(contract.total_minted().await).await;
        });
    }

    fn start_mint(&mut self, results: &mpsc::Sender<BlockchainResult<MintReceipt>>) {
        let Some(account) = self.session.begin_mint() else {
            return;
        };
        let contract = self.session.contract().clone();
        let results = results.clone();
        tokio::spawn(async move {
            let result = contract.mint(account).await;
            let _ = results.send(result).await;
        });
    }

    fn toast_unknown(&mut self, word: &str) {
        self.session.notify(
            ToastKind::Info,
            format!("Unknown command '{}'. Try connect, mint, refresh or quit", word),
        );
    }

    fn draw<O: Write>(&self, out: &mut O) -> std::io::Result<()> {
        let screen = render(
            self.session.state(),
            &self.view,
            Instant::now(),
            &mut rand::thread_rng(),
        );
        if self.view.color {
            write!(out, "{}", CLEAR_SCREEN)?;
        }
        writeln!(out, "{}\n", screen)?;
        out.flush()
    }
}

async fn next_event(events: &mut Option<mpsc::Receiver<MintEvent>>) -> Option<MintEvent> {
    match events {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
