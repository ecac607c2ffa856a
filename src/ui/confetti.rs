//! Confetti burst shown after a successful mint.

use rand::seq::SliceRandom;
use rand::Rng;

const GLYPHS: [char; 8] = ['*', '+', 'o', '~', '°', '•', '✦', '✧'];

/// ANSI foreground colours used for the pieces.
const COLORS: [u8; 6] = [31, 32, 33, 34, 35, 36];

/// One line of confetti, `width` columns wide, roughly a third filled.
pub fn confetti_line<R: Rng + ?Sized>(rng: &mut R, width: usize, color: bool) -> String {
    let mut line = String::with_capacity(width * 2);
    for _ in 0..width {
        if !rng.gen_bool(0.35) {
            line.push(' ');
            continue;
        }
        let glyph = *GLYPHS.choose(rng).unwrap_or(&'*');
        if color {
            let code = *COLORS.choose(rng).unwrap_or(&33);
            line.push_str(&format!("\x1b[{}m{}\x1b[0m", code, glyph));
        } else {
            line.push(glyph);
        }
    }
    line
}
