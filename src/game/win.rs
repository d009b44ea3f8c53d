use crate::ring::Token;
use crate::types::Verdict;

/// With this many tokens or fewer left alive, blue can no longer coordinate.
pub const RED_WIN_THRESHOLD: usize = 2;

/// Demon death is checked first, so it wins for blue even when the table has
/// already shrunk to the red threshold. A table without a demon has no verdict.
pub fn evaluate(tokens: &[Token]) -> Verdict {
    let Some(demon) = tokens.iter().find(|token| token.is_demon()) else {
        return Verdict::None;
    };
    if !demon.alive {
        return Verdict::BlueWin;
    }
    let living = tokens.iter().filter(|token| token.alive).count();
    if living <= RED_WIN_THRESHOLD {
        return Verdict::RedWin;
    }
    Verdict::None
}
