//! Up-layer phases: the white cross, then the white corners.

use smallvec::smallvec;

use super::{aligned, down_turns, stuck, Candidate, Phase, Workbench};
use crate::cube::{CubeState, Face};
use crate::error::Result;
use crate::moves::Move;
use crate::pieces::{
    is_corner_solved, is_edge_solved, locate_corner, locate_edge, Corner, Edge, Layer,
};

/// Cross edges in solving order.
const CROSS_EDGES: [Edge; 4] = [Edge::Uf, Edge::Ur, Edge::Ub, Edge::Ul];

/// Up corner slots in solving order, with the face turned by the slot's
/// `X' D' X D` insertion and the Down slot directly below.
const CORNER_SLOTS: [(Corner, Face, Corner); 4] = [
    (Corner::Urf, Face::Right, Corner::Dfr),
    (Corner::Ubr, Face::Back, Corner::Drb),
    (Corner::Ulb, Face::Left, Corner::Dbl),
    (Corner::Ufl, Face::Front, Corner::Dlf),
];

/// The first `count` cross edges are solved.
pub(super) fn cross_placed(state: &CubeState, count: usize) -> bool {
    CROSS_EDGES[..count]
        .iter()
        .all(|&edge| is_edge_solved(state, edge))
}

/// Full cross plus the first `corners` Up corners.
pub(super) fn first_layer_placed(state: &CubeState, corners: usize) -> bool {
    cross_placed(state, 4)
        && CORNER_SLOTS[..corners]
            .iter()
            .all(|&(corner, _, _)| is_corner_solved(state, corner))
}

fn cw(face: Face) -> Move {
    Move::clockwise(face)
}

fn ccw(face: Face) -> Move {
    Move::counter_clockwise(face)
}

fn edge_layer(state: &CubeState, edge: Edge) -> Option<Layer> {
    locate_edge(state, edge.home_colors()).map(Edge::layer)
}

pub(super) fn solve_cross(bench: &mut Workbench) -> Result<()> {
    for (placed, &edge) in CROSS_EDGES.iter().enumerate() {
        if is_edge_solved(bench.state(), edge) {
            continue;
        }
        let slot = locate_edge(bench.state(), edge.home_colors())
            .ok_or_else(|| stuck(Phase::Cross, format!("edge {:?} not found", edge)))?;

        match slot.layer() {
            Layer::Up => {
                let side = slot.faces()[1];
                bench.apply(&[cw(side), cw(side)]);
            }
            Layer::Middle => {
                let [a, b] = slot.faces();
                let drops: [Candidate; 4] = [
                    smallvec![cw(a), cw(Face::Down), ccw(a)],
                    smallvec![cw(b), cw(Face::Down), ccw(b)],
                    smallvec![ccw(a), cw(Face::Down), cw(a)],
                    smallvec![ccw(b), cw(Face::Down), cw(b)],
                ];
                let dropped = bench.apply_first(drops, |s| {
                    cross_placed(s, placed) && edge_layer(s, edge) == Some(Layer::Down)
                });
                if !dropped {
                    return Err(stuck(
                        Phase::Cross,
                        format!("cannot drop edge {:?} from slot {:?}", edge, slot),
                    ));
                }
            }
            Layer::Down => {}
        }

        let target = edge.faces()[1];
        let right = target.right_neighbor();
        let left = target.left_neighbor();
        let inserts: [Candidate; 3] = [
            smallvec![cw(target), cw(target)],
            smallvec![cw(right), ccw(target), ccw(right)],
            smallvec![ccw(left), cw(target), cw(left)],
        ];
        let candidates = inserts
            .iter()
            .flat_map(|insert| (0..4).map(move |k| aligned(k, insert)));
        if !bench.apply_first(candidates, |s| {
            cross_placed(s, placed) && is_edge_solved(s, edge)
        }) {
            return Err(stuck(Phase::Cross, format!("cannot insert edge {:?}", edge)));
        }
    }
    Ok(())
}

/// `X' D' X D`: lifts the corner under the slot into it, one twist at a time.
fn insertion(face: Face) -> Candidate {
    smallvec![ccw(face), ccw(Face::Down), cw(face), cw(Face::Down)]
}

pub(super) fn solve_corners(bench: &mut Workbench) -> Result<()> {
    for (placed, &(slot, face, below)) in CORNER_SLOTS.iter().enumerate() {
        if is_corner_solved(bench.state(), slot) {
            continue;
        }
        let colors = slot.home_colors();
        let find = |state: &CubeState| {
            locate_corner(state, colors).ok_or_else(|| {
                stuck(Phase::FirstLayerCorners, format!("corner {:?} not found", slot))
            })
        };

        let mut at = find(bench.state())?;
        if at.layer() == Layer::Up && at != slot {
            // Parked in another Up slot: push it down with that slot's insertion.
            let lift = CORNER_SLOTS
                .iter()
                .find(|&&(other, _, _)| other == at)
                .map(|&(_, lift, _)| lift)
                .ok_or_else(|| stuck(Phase::FirstLayerCorners, format!("no slot {:?}", at)))?;
            bench.apply(&insertion(lift));
            at = find(bench.state())?;
        }
        if at.layer() == Layer::Down
            && !bench.apply_first((0..4).map(down_turns), |s| {
                locate_corner(s, colors) == Some(below)
            })
        {
            return Err(stuck(
                Phase::FirstLayerCorners,
                format!("cannot bring corner {:?} under its slot", slot),
            ));
        }

        let step = insertion(face);
        for _ in 0..6 {
            if is_corner_solved(bench.state(), slot) {
                break;
            }
            bench.apply(&step);
        }
        if !first_layer_placed(bench.state(), placed + 1) {
            return Err(stuck(
                Phase::FirstLayerCorners,
                format!("corner {:?} not placed", slot),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::Algorithm;
    use crate::scramble::scramble;

    fn bench_for(notation: &str) -> Workbench {
        let mut bench = Workbench::new(CubeState::solved());
        bench.apply(Algorithm::parse(notation).unwrap().moves());
        bench.moves.clear();
        bench
    }

    #[test]
    fn test_cross_untouched_when_solved() {
        let mut bench = bench_for("D");
        assert!(cross_placed(bench.state(), 4));
        solve_cross(&mut bench).unwrap();
        assert!(bench.moves.is_empty());
    }

    #[test]
    fn test_cross_from_flipped_edge() {
        // Only UF is out of place.
        let mut bench = bench_for("F U' R U");
        assert!(!cross_placed(bench.state(), 1));
        assert!([Edge::Ur, Edge::Ub, Edge::Ul]
            .iter()
            .all(|&e| is_edge_solved(bench.state(), e)));
        solve_cross(&mut bench).unwrap();
        assert!(cross_placed(bench.state(), 4));
    }

    #[test]
    fn test_first_layer_on_scrambles() {
        for seed in 0..60 {
            let start = scramble(&CubeState::solved(), 25, seed).0;
            let mut bench = Workbench::new(start);
            solve_cross(&mut bench).unwrap();
            assert!(cross_placed(bench.state(), 4), "seed {}", seed);
            solve_corners(&mut bench).unwrap();
            assert!(first_layer_placed(bench.state(), 4), "seed {}", seed);
        }
    }

    #[test]
    fn test_insertion_cycles_back() {
        // Six repetitions of the insertion commutator are the identity.
        let mut state = CubeState::solved();
        for _ in 0..6 {
            for &m in insertion(Face::Right).iter() {
                state.apply(m);
            }
        }
        assert!(state.is_solved());
    }
}
