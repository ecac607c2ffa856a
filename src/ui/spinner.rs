//! Loading indicator shown while a mint is being mined.

const FRAMES: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Spinner glyph for a given UI tick.
pub fn frame(tick: u64) -> char {
    FRAMES[(tick % FRAMES.len() as u64) as usize]
}

/// Full loading line, e.g. `⠙ Mining...`.
pub fn mining_line(tick: u64) -> String {
    format!("{} Mining...", frame(tick))
}

pub fn approval_line(tick: u64) -> String {
    format!("{} Waiting for wallet approval...", frame(tick))
}
