//! Seeded scramble generation.
//!
//! Moves are drawn uniformly from the twelve generators. Draws that would
//! waste moves are rejected and redrawn: a move directly followed by its own
//! inverse, or the same move three times in a row (which is just the inverse
//! turn). Rejection keeps the draw uniform over the remaining moves.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::cube::CubeState;
use crate::engine::apply_moves;
use crate::moves::{Algorithm, Move};

/// Default scramble length.
pub const DEFAULT_SCRAMBLE_LENGTH: usize = 20;

/// Scramble settings
#[derive(Debug, Clone)]
pub struct ScrambleConfig {
    /// Number of generators to draw
    pub length: usize,
    /// Fixed seed; `None` draws one from the thread RNG
    pub seed: Option<u64>,
}

impl Default for ScrambleConfig {
    fn default() -> Self {
        Self {
            length: DEFAULT_SCRAMBLE_LENGTH,
            seed: None,
        }
    }
}

impl ScrambleConfig {
    /// The configured seed, or a fresh random one.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| rand::thread_rng().gen())
    }
}

/// A move followed directly by its inverse cancels out.
pub fn is_banned_pair(a: Move, b: Move) -> bool {
    b == a.inverse()
}

/// Three identical quarter turns equal one inverse turn.
pub fn is_banned_trio(a: Move, b: Move, c: Move) -> bool {
    if is_banned_pair(a, b) || is_banned_pair(b, c) {
        return true;
    }
    a == b && b == c
}

/// Whether `candidate` may follow the moves drawn so far.
pub fn is_acceptable_next(previous: &[Move], candidate: Move) -> bool {
    match previous {
        [] => true,
        [.., last] if is_banned_pair(*last, candidate) => false,
        [.., a, b] => !is_banned_trio(*a, *b, candidate),
        [_] => true,
    }
}

/// Draw a scramble sequence from an RNG.
pub fn scramble_moves<R: Rng>(length: usize, rng: &mut R) -> Algorithm {
    let mut moves: Vec<Move> = Vec::with_capacity(length);
    while moves.len() < length {
        let candidate = Move::ALL[rng.gen_range(0..Move::ALL.len())];
        if is_acceptable_next(&moves, candidate) {
            moves.push(candidate);
        }
    }
    Algorithm::from(moves)
}

/// Scramble `state` with `length` moves drawn from a seeded RNG.
///
/// Returns the resulting state and the exact moves applied. The same seed
/// always yields the same moves.
pub fn scramble(state: &CubeState, length: usize, seed: u64) -> (CubeState, Algorithm) {
    let mut rng = StdRng::seed_from_u64(seed);
    let moves = scramble_moves(length, &mut rng);
    debug!(seed, length, scramble = %moves, "generated scramble");
    (apply_moves(state, &moves), moves)
}

/// Scramble using a [`ScrambleConfig`]; also returns the seed used.
pub fn scramble_with(state: &CubeState, config: &ScrambleConfig) -> (CubeState, Algorithm, u64) {
    let seed = config.resolve_seed();
    let (scrambled, moves) = scramble(state, config.length, seed);
    (scrambled, moves, seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_pair_banned() {
        let r: Move = "R".parse().unwrap();
        let r_prime: Move = "R'".parse().unwrap();
        let u: Move = "U".parse().unwrap();

        assert!(is_banned_pair(r, r_prime));
        assert!(is_banned_pair(r_prime, r));
        assert!(!is_banned_pair(r, r));
        assert!(!is_banned_pair(r, u));
    }

    #[test]
    fn test_triple_turn_banned() {
        let r: Move = "R".parse().unwrap();
        let u: Move = "U".parse().unwrap();

        assert!(is_banned_trio(r, r, r));
        assert!(!is_banned_trio(u, r, r));
        assert!(is_acceptable_next(&[u, r], r));
        assert!(!is_acceptable_next(&[r, r], r));
    }

    #[test]
    fn test_zero_length_is_identity() {
        let (state, moves) = scramble(&CubeState::solved(), 0, 99);
        assert!(moves.is_empty());
        assert!(state.is_solved());
    }

    #[test]
    fn test_same_seed_same_scramble() {
        let (a, moves_a) = scramble(&CubeState::solved(), 25, 1234);
        let (b, moves_b) = scramble(&CubeState::solved(), 25, 1234);
        assert_eq!(moves_a, moves_b);
        assert_eq!(a, b);
        assert_eq!(moves_a.len(), 25);

        let (_, moves_c) = scramble(&CubeState::solved(), 25, 4321);
        assert_ne!(moves_a, moves_c);
    }

    #[test]
    fn test_scramble_respects_policy() {
        for seed in 0..50 {
            let (_, moves) = scramble(&CubeState::solved(), 40, seed);
            let moves = moves.moves();
            for pair in moves.windows(2) {
                assert!(!is_banned_pair(pair[0], pair[1]));
            }
            for trio in moves.windows(3) {
                assert!(!(trio[0] == trio[1] && trio[1] == trio[2]));
            }
        }
    }

    #[test]
    fn test_inverse_returns_to_start() {
        let start = CubeState::solved();
        let (scrambled, moves) = scramble(&start, 30, 77);
        assert!(!scrambled.is_solved());
        assert_eq!(apply_moves(&scrambled, &moves.inverse()), start);
    }

    #[test]
    fn test_scramble_from_non_solved_start() {
        let (first, _) = scramble(&CubeState::solved(), 10, 1);
        let (second, moves) = scramble(&first, 10, 2);
        assert_eq!(apply_moves(&second, &moves.inverse()), first);
    }
}
