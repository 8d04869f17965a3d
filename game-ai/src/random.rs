//! 随机代理：在合法走法中均匀随机选择

use protocol::{Board, Color};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::agent::Agent;
use crate::error::Result;

pub struct RandomAgent {
    color: Color,
    rng: ChaCha8Rng,
}

impl RandomAgent {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// 固定种子，便于复现
    pub fn with_seed(color: Color, seed: u64) -> Self {
        Self {
            color,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl<B: Board> Agent<B> for RandomAgent {
    fn color(&self) -> Color {
        self.color
    }

    fn name(&self) -> &str {
        "random"
    }

    fn select_move(&mut self, position: &B) -> Result<Option<B::Move>> {
        let moves = position.legal_moves();
        debug!("随机代理: {} 个可选走法", moves.len());
        Ok(moves.choose(&mut self.rng).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{leaf, node, Nim, TreeBoard};

    #[test]
    fn test_no_moves() {
        let mut agent = RandomAgent::with_seed(Color::First, 1);
        let board = TreeBoard::new(leaf(0.0));
        assert_eq!(agent.select_move(&board).unwrap(), None);
    }

    #[test]
    fn test_picks_legal_moves() {
        let mut agent = RandomAgent::new(Color::Second);
        let board = Nim { pile: 2 };
        for _ in 0..50 {
            let mv = agent.select_move(&board).unwrap().unwrap();
            assert!(mv == 1 || mv == 2);
        }
    }

    #[test]
    fn test_covers_all_moves() {
        let mut agent = RandomAgent::with_seed(Color::First, 3);
        let board = TreeBoard::new(node(0.0, vec![leaf(0.0), leaf(0.0), leaf(0.0)]));
        let mut seen = [false; 3];
        for _ in 0..100 {
            let mv = agent.select_move(&board).unwrap().unwrap();
            seen[mv] = true;
        }
        assert_eq!(seen, [true; 3]);
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let board = Nim { pile: 9 };
        let run = || {
            let mut agent = RandomAgent::with_seed(Color::First, 77);
            (0..10)
                .map(|_| agent.select_move(&board).unwrap().unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}
