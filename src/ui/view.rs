//! Rendering of the session state as a text screen.
//!
//! Rendering is a pure function of the state, the clock and an RNG (for
//! confetti), so the output can be asserted on directly.

use rand::Rng;
use std::time::Instant;

use crate::session::controller::short_address;
use crate::session::state::SessionState;
use crate::ui::confetti::confetti_line;
use crate::ui::spinner::{approval_line, mining_line};
use crate::ui::toast::ToastKind;

pub const TITLE: &str = "My NFT Collection";

const CONFETTI_ROWS: usize = 3;

/// Static rendering parameters.
#[derive(Debug, Clone)]
pub struct ViewOptions {
    pub total_mint_count: u64,
    pub color: bool,
    pub width: usize,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            total_mint_count: crate::config::schema::TOTAL_MINT_COUNT,
            color: false,
            width: 64,
        }
    }
}

fn paint(text: &str, code: &str, color: bool) -> String {
    if color {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

fn centered(text: &str, width: usize) -> String {
    let len = text.chars().count();
    let pad = width.saturating_sub(len) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

/// The header: title on the left, account or login button on the right.
pub fn render_header(state: &SessionState, opts: &ViewOptions) -> String {
    let right = match &state.current_account {
        Some(account) => format!("[@ {}]", short_address(account)),
        None => "[> Login]".to_string(),
    };
    let gap = opts
        .width
        .saturating_sub(TITLE.chars().count() + right.chars().count())
        .max(1);
    format!(
        "{}{}{}",
        paint(TITLE, "1;36", opts.color),
        " ".repeat(gap),
        paint(&right, "46;30", opts.color)
    )
}

/// The main call to action.
pub fn render_action(state: &SessionState, opts: &ViewOptions) -> String {
    if state.loading {
        return paint(&mining_line(state.tick), "33", opts.color);
    }
    if state.connecting {
        return paint(&approval_line(state.tick), "33", opts.color);
    }
    let label = if state.is_connected() {
        "[ Mint NFT ]"
    } else {
        "[ Connect to Wallet ]"
    };
    paint(label, "1;44;37", opts.color)
}

/// `"12/50 NFTs minted so far"`, or a placeholder before the first read.
pub fn render_counter(state: &SessionState, opts: &ViewOptions) -> String {
    match state.minted_count {
        Some(count) => format!("{}/{} NFTs minted so far", count, opts.total_mint_count),
        None => format!("?/{} NFTs minted so far", opts.total_mint_count),
    }
}

fn toast_tag(kind: ToastKind, color: bool) -> String {
    let code = match kind {
        ToastKind::Success => "32",
        ToastKind::Error => "31",
        ToastKind::Info => "34",
    };
    paint(&format!("[{}]", kind.label()), code, color)
}

/// Render the whole screen.
pub fn render<R: Rng + ?Sized>(state: &SessionState, opts: &ViewOptions, now: Instant, rng: &mut R) -> String {
    let rule = "-".repeat(opts.width);
    let mut lines = vec![render_header(state, opts), rule.clone(), String::new()];

    lines.push(centered(&format!("~ {} ~", TITLE), opts.width));
    lines.push(String::new());

    if state.confetti_visible(now) {
        for _ in 0..CONFETTI_ROWS {
            lines.push(confetti_line(rng, opts.width, opts.color));
        }
    }

    // Centre on the unpainted text so colour codes do not shift the layout.
    let action = render_action(state, opts);
    let plain_action_len = if state.loading {
        mining_line(state.tick).chars().count()
    } else if state.is_connected() {
        "[ Mint NFT ]".len()
    } else {
        "[ Connect to Wallet ]".len()
    };
    lines.push(format!(
        "{}{}",
        " ".repeat(opts.width.saturating_sub(plain_action_len) / 2),
        action
    ));
    lines.push(centered(&render_counter(state, opts), opts.width));
    lines.push(String::new());

    for toast in state.toasts.iter() {
        lines.push(format!("{} {}", toast_tag(toast.kind, opts.color), toast.message));
    }

    lines.push(rule);
    lines.push("commands: connect | mint | refresh | quit".to_string());
    lines.join("\n")
}
