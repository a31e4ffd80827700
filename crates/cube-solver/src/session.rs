//! A cube session: one owned cube, the moves applied to it and the last
//! computed solution with a playback cursor.
//!
//! Playback replays the stored solution one move at a time and never calls
//! back into the solver. Any move that does not come from the solution
//! drops the stored solution, because it no longer matches the cube.

use serde::Serialize;
use tracing::{debug, info};

use crate::cube::CubeState;
use crate::engine::apply_move;
use crate::error::Result;
use crate::moves::{Algorithm, Move};
use crate::scramble::scramble;
use crate::solver::{Solution, Solver, SolverConfig};

/// Append-only record of applied moves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MoveHistory {
    moves: Vec<Move>,
}

impl MoveHistory {
    pub fn push(&mut self, m: Move) {
        self.moves.push(m);
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }

    pub fn to_algorithm(&self) -> Algorithm {
        self.moves.iter().copied().collect()
    }
}

/// Stored solution and how far playback has got.
#[derive(Debug, Clone)]
struct Playback {
    solution: Solution,
    moves: Vec<Move>,
    cursor: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    state: CubeState,
    history: MoveHistory,
    last_scramble: Option<Algorithm>,
    playback: Option<Playback>,
    solver: Solver,
}

impl Session {
    /// A solved cube with empty history.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_solver_config(config: SolverConfig) -> Self {
        Self {
            solver: Solver::new(config),
            ..Self::default()
        }
    }

    /// Start from an arbitrary state.
    pub fn from_state(state: CubeState) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }

    pub fn state(&self) -> &CubeState {
        &self.state
    }

    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    pub fn last_scramble(&self) -> Option<&Algorithm> {
        self.last_scramble.as_ref()
    }

    pub fn is_solved(&self) -> bool {
        self.state.is_solved()
    }

    fn record(&mut self, m: Move) {
        self.state = apply_move(&self.state, m);
        self.history.push(m);
    }

    /// Apply a manual move.
    pub fn apply_move(&mut self, m: Move) {
        self.record(m);
        self.playback = None;
    }

    /// Parse and apply one symbol. An invalid symbol changes nothing.
    pub fn apply_symbol(&mut self, symbol: &str) -> Result<Move> {
        let m: Move = symbol.parse()?;
        self.apply_move(m);
        Ok(m)
    }

    /// Parse a whole notation string, then apply it. Nothing is applied if
    /// any token is invalid.
    pub fn apply_sequence(&mut self, notation: &str) -> Result<Algorithm> {
        let algorithm = Algorithm::parse(notation)?;
        for &m in &algorithm {
            self.apply_move(m);
        }
        Ok(algorithm)
    }

    /// Replace the cube with a fresh scramble of `length` moves from solved.
    /// History and any stored solution are cleared.
    pub fn scramble(&mut self, length: usize, seed: u64) -> &Algorithm {
        let (state, moves) = scramble(&CubeState::solved(), length, seed);
        self.state = state;
        self.history.clear();
        self.playback = None;
        info!(length, seed, "session scrambled");
        self.last_scramble.insert(moves)
    }

    /// Back to solved, clearing history, scramble and solution.
    pub fn reset(&mut self) {
        self.state = CubeState::solved();
        self.history.clear();
        self.last_scramble = None;
        self.playback = None;
        debug!("session reset");
    }

    /// Compute and store a solution for the current cube. The cube itself
    /// is not changed.
    pub fn solve(&mut self) -> Result<&Solution> {
        let solution = self.solver.solve(&self.state)?;
        let moves = solution.moves().into_moves();
        let playback = self.playback.insert(Playback {
            solution,
            moves,
            cursor: 0,
        });
        Ok(&playback.solution)
    }

    pub fn solution(&self) -> Option<&Solution> {
        self.playback.as_ref().map(|p| &p.solution)
    }

    /// Moves of the stored solution not yet played.
    pub fn remaining_solution_moves(&self) -> &[Move] {
        match &self.playback {
            Some(p) => &p.moves[p.cursor..],
            None => &[],
        }
    }

    /// Play the next move of the stored solution, if any.
    pub fn next_solution_move(&mut self) -> Option<Move> {
        let playback = self.playback.as_mut()?;
        let m = *playback.moves.get(playback.cursor)?;
        playback.cursor += 1;
        self.record(m);
        Some(m)
    }

    /// Play every remaining solution move; returns how many were played.
    pub fn play_solution(&mut self) -> usize {
        let mut played = 0;
        while self.next_solution_move().is_some() {
            played += 1;
        }
        played
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CubeError;

    #[test]
    fn test_new_session_is_solved() {
        let session = Session::new();
        assert!(session.is_solved());
        assert!(session.history().is_empty());
        assert!(session.solution().is_none());
        assert!(session.last_scramble().is_none());
    }

    #[test]
    fn test_moves_are_recorded() {
        let mut session = Session::new();
        session.apply_symbol("R").unwrap();
        session.apply_sequence("U R'").unwrap();
        assert_eq!(session.history().to_algorithm().to_string(), "R U R'");
        assert!(!session.is_solved());
    }

    #[test]
    fn test_invalid_symbol_changes_nothing() {
        let mut session = Session::new();
        session.apply_symbol("F").unwrap();
        let before = *session.state();

        let err = session.apply_symbol("X").unwrap_err();
        assert_eq!(err, CubeError::invalid_move("X"));
        assert!(session.apply_sequence("R X").is_err());
        assert_eq!(*session.state(), before);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_scramble_clears_history() {
        let mut session = Session::new();
        session.apply_symbol("U").unwrap();
        let moves = session.scramble(15, 9).clone();
        assert_eq!(moves.len(), 15);
        assert!(session.history().is_empty());
        assert_eq!(session.last_scramble(), Some(&moves));

        session.reset();
        assert!(session.is_solved());
        assert!(session.last_scramble().is_none());
    }

    #[test]
    fn test_solve_then_play() {
        let mut session = Session::new();
        session.scramble(20, 3);
        let before = *session.state();
        let total = session.solve().unwrap().len();
        assert_eq!(*session.state(), before);
        assert_eq!(session.remaining_solution_moves().len(), total);

        let first = session.next_solution_move().unwrap();
        assert_eq!(session.history().moves(), &[first]);
        assert_eq!(session.remaining_solution_moves().len(), total - 1);

        assert_eq!(session.play_solution(), total - 1);
        assert!(session.is_solved());
        assert_eq!(session.next_solution_move(), None);
        assert_eq!(session.history().len(), total);
    }

    #[test]
    fn test_manual_move_drops_solution() {
        let mut session = Session::new();
        session.apply_sequence("R U").unwrap();
        session.solve().unwrap();
        session.apply_symbol("F").unwrap();
        assert!(session.solution().is_none());
        assert_eq!(session.next_solution_move(), None);
    }

    #[test]
    fn test_solve_on_solved_cube() {
        let mut session = Session::new();
        assert!(session.solve().unwrap().is_empty());
        assert_eq!(session.play_solution(), 0);
    }
}
