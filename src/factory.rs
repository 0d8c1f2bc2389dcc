//! Piece factory
//!
//! Every draw is an independent uniform choice over the 7 kinds. There is no
//! bag, so the same kind may come up several times in a row.

use crate::piece::Piece;
use crate::tetromino::TetrominoType;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Uniform random piece source
#[derive(Debug, Clone)]
pub struct PieceFactory {
    rng: ChaCha8Rng,
}

impl Default for PieceFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceFactory {
    /// Create a factory with a random seed
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    /// Create a factory whose sequence is fixed by `seed`
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Draw a fresh piece at its spawn position
    pub fn create(&mut self) -> Piece {
        let kinds = TetrominoType::all();
        let kind = kinds[self.rng.gen_range(0..kinds.len())];
        Piece::new(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = PieceFactory::with_seed(42);
        let mut b = PieceFactory::with_seed(42);
        for _ in 0..50 {
            assert_eq!(a.create().kind, b.create().kind);
        }
    }

    #[test]
    fn test_created_piece_is_at_spawn() {
        let mut factory = PieceFactory::with_seed(7);
        for _ in 0..20 {
            let piece = factory.create();
            assert_eq!(piece, Piece::new(piece.kind));
        }
    }

    #[test]
    fn test_all_kinds_appear() {
        let mut factory = PieceFactory::with_seed(1);
        let mut counts: HashMap<TetrominoType, usize> = HashMap::new();
        for _ in 0..7000 {
            *counts.entry(factory.create().kind).or_default() += 1;
        }
        assert_eq!(counts.len(), 7);
        // Expected 1000 each; a wide band keeps this deterministic-seed test robust
        for (kind, count) in counts {
            assert!((700..1300).contains(&count), "{} drawn {} times", kind.name(), count);
        }
    }
}
