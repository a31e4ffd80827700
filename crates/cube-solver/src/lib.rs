//! Rubik's Cube core: facelet state, move engine, scrambler and a
//! deterministic layer-by-layer solver.
//!
//! The cube is a plain value. Callers own their `CubeState`, turn it with
//! the engine and hand it to the solver, which returns the moves that bring
//! it back to solved.

pub mod cube;
pub mod engine;
pub mod error;
pub mod moves;
pub mod pieces;
pub mod scramble;
pub mod session;
pub mod solver;

// Re-export main types
pub use cube::{Color, CubeState, Face};
pub use engine::{apply_move, apply_moves, apply_sequence, apply_symbol};
pub use error::{CubeError, Result};
pub use moves::{Algorithm, Move, Turn};
pub use pieces::validate_legal;
pub use scramble::{scramble, ScrambleConfig};
pub use session::{MoveHistory, Session};
pub use solver::{solve, Phase, PhaseSolution, Solution, Solver, SolverConfig};
