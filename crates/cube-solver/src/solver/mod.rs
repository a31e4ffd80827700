//! Layer-by-layer solver.
//!
//! Six phases run strictly in order: the Up cross, the Up corners, the
//! middle-layer edges, then the Down layer in four steps (edge orientation,
//! corner orientation, corner permutation plus edge permutation). Each phase
//! only searches short, fixed candidate lists, so a solve is deterministic
//! and always finishes. A phase that cannot recognise its situation fails
//! the whole solve instead of looping.

mod cases;
mod first_layer;
mod last_layer;
mod second_layer;

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, info};

use crate::cube::{CubeState, Face};
use crate::engine::apply_moves;
use crate::error::{CubeError, Result};
use crate::moves::{Algorithm, Move};
use crate::pieces::validate_legal;

pub use cases::{
    corners_aligned, edge_orientation, headlights, last_layer_oriented, CornerPermutation,
    EdgePattern, EdgePermutation, OllCase,
};

/// Solver phases, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Cross,
    FirstLayerCorners,
    SecondLayerEdges,
    LastLayerCross,
    OrientLastLayer,
    PermuteLastLayer,
}

impl Phase {
    pub const ALL: [Phase; 6] = [
        Phase::Cross,
        Phase::FirstLayerCorners,
        Phase::SecondLayerEdges,
        Phase::LastLayerCross,
        Phase::OrientLastLayer,
        Phase::PermuteLastLayer,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Phase::Cross => "cross",
            Phase::FirstLayerCorners => "first-layer corners",
            Phase::SecondLayerEdges => "second-layer edges",
            Phase::LastLayerCross => "last-layer cross",
            Phase::OrientLastLayer => "orient last layer",
            Phase::PermuteLastLayer => "permute last layer",
        }
    }

    /// Postcondition after this phase. Each one includes every earlier
    /// phase's postcondition.
    pub fn is_complete(self, state: &CubeState) -> bool {
        match self {
            Phase::Cross => first_layer::cross_placed(state, 4),
            Phase::FirstLayerCorners => first_layer::first_layer_placed(state, 4),
            Phase::SecondLayerEdges => second_layer::two_layers_placed(state, 4),
            Phase::LastLayerCross => {
                second_layer::two_layers_placed(state, 4)
                    && edge_orientation(state).iter().all(|&o| o)
            }
            Phase::OrientLastLayer => {
                second_layer::two_layers_placed(state, 4) && last_layer_oriented(state)
            }
            Phase::PermuteLastLayer => state.is_solved(),
        }
    }

    fn run(self, bench: &mut Workbench) -> Result<()> {
        match self {
            Phase::Cross => first_layer::solve_cross(bench),
            Phase::FirstLayerCorners => first_layer::solve_corners(bench),
            Phase::SecondLayerEdges => second_layer::solve_middle_edges(bench),
            Phase::LastLayerCross => last_layer::solve_edge_orientation(bench),
            Phase::OrientLastLayer => last_layer::solve_corner_orientation(bench),
            Phase::PermuteLastLayer => last_layer::solve_permutation(bench),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration for the solver
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Check each phase's postcondition after applying its moves
    pub verify_phases: bool,
    /// Cancel adjacent same-face turns inside each phase
    pub simplify: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            verify_phases: true,
            simplify: true,
        }
    }
}

/// Moves emitted by one phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseSolution {
    pub phase: Phase,
    pub moves: Algorithm,
}

/// A full solution with its per-phase breakdown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    phases: Vec<PhaseSolution>,
}

impl Solution {
    pub fn phases(&self) -> &[PhaseSolution] {
        &self.phases
    }

    /// Moves of one phase, if it ran.
    pub fn phase(&self, phase: Phase) -> Option<&Algorithm> {
        self.phases
            .iter()
            .find(|p| p.phase == phase)
            .map(|p| &p.moves)
    }

    /// All moves in order.
    pub fn moves(&self) -> Algorithm {
        self.phases
            .iter()
            .flat_map(|p| p.moves.iter().copied())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.phases.iter().map(|p| p.moves.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Candidate move buffer. Long enough for the longest last-layer algorithm
/// with alignment turns on both sides.
pub(crate) type Candidate = SmallVec<[Move; 24]>;

const D: Move = Move::clockwise(Face::Down);
const D_PRIME: Move = Move::counter_clockwise(Face::Down);

/// `k` quarter turns of the Down face, with three written as `D'`.
pub(crate) fn down_turns(k: usize) -> Candidate {
    let mut turns = Candidate::new();
    match k % 4 {
        0 => {}
        1 => turns.push(D),
        2 => turns.extend_from_slice(&[D, D]),
        _ => turns.push(D_PRIME),
    }
    turns
}

/// `down_turns(k)` followed by `alg`.
pub(crate) fn aligned(k: usize, alg: &[Move]) -> Candidate {
    let mut candidate = down_turns(k);
    candidate.extend_from_slice(alg);
    candidate
}

/// Scratch state for a single phase, recording every move it applies.
pub(crate) struct Workbench {
    state: CubeState,
    moves: Vec<Move>,
}

impl Workbench {
    fn new(state: CubeState) -> Self {
        Self {
            state,
            moves: Vec::new(),
        }
    }

    pub(crate) fn state(&self) -> &CubeState {
        &self.state
    }

    pub(crate) fn apply(&mut self, moves: &[Move]) {
        self.state = apply_moves(&self.state, moves);
        self.moves.extend_from_slice(moves);
    }

    /// Apply the first candidate whose result passes `accept`. Returns false
    /// and leaves the bench untouched when none does.
    pub(crate) fn apply_first<I, P>(&mut self, candidates: I, accept: P) -> bool
    where
        I: IntoIterator<Item = Candidate>,
        P: Fn(&CubeState) -> bool,
    {
        for candidate in candidates {
            let next = apply_moves(&self.state, &candidate);
            if accept(&next) {
                self.state = next;
                self.moves.extend_from_slice(&candidate);
                return true;
            }
        }
        false
    }

    fn into_moves(self) -> Vec<Move> {
        self.moves
    }
}

/// Error for a phase that ran out of candidates.
pub(crate) fn stuck(phase: Phase, detail: impl fmt::Display) -> CubeError {
    CubeError::unsolvable(format!("{} phase failed: {}", phase, detail))
}

/// Layer-by-layer solver
#[derive(Debug, Clone, Default)]
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Compute a solution for `state`. The input is not modified; replaying
    /// the returned moves on it reaches the solved state.
    pub fn solve(&self, state: &CubeState) -> Result<Solution> {
        validate_legal(state)?;
        if state.is_solved() {
            info!("cube already solved");
            return Ok(Solution::default());
        }

        let mut current = *state;
        let mut phases = Vec::with_capacity(Phase::ALL.len());
        for phase in Phase::ALL {
            debug!(phase = phase.name(), "phase started");
            let mut bench = Workbench::new(current);
            phase.run(&mut bench)?;

            let mut moves = Algorithm::from(bench.into_moves());
            if self.config.simplify {
                moves = moves.simplify();
            }
            current = apply_moves(&current, &moves);
            if self.config.verify_phases && !phase.is_complete(&current) {
                return Err(stuck(phase, "postcondition does not hold"));
            }
            debug!(phase = phase.name(), count = moves.len(), moves = %moves, "phase finished");
            phases.push(PhaseSolution { phase, moves });
        }

        if !current.is_solved() {
            return Err(CubeError::unsolvable("solution does not reach the solved state"));
        }
        let solution = Solution { phases };
        info!(moves = solution.len(), "cube solved");
        Ok(solution)
    }
}

/// Solve with the default configuration.
pub fn solve(state: &CubeState) -> Result<Solution> {
    Solver::default().solve(state)
}
