//! Down-layer phases: edge orientation, corner orientation, then two-look
//! permutation.

use tracing::debug;

use super::cases::{
    corners_aligned, edge_orientation, headlights, last_layer_oriented, CornerPermutation,
    EdgePattern, EdgePermutation, OllCase,
};
use super::second_layer::two_layers_placed;
use super::{aligned, down_turns, stuck, Phase, Workbench};
use crate::error::Result;

/// At most three applications take any even pattern to the cross.
const MAX_EDGE_PASSES: usize = 3;

pub(super) fn solve_edge_orientation(bench: &mut Workbench) -> Result<()> {
    for _ in 0..MAX_EDGE_PASSES {
        let pattern = EdgePattern::classify(bench.state())?;
        debug!(?pattern, "last-layer edges");
        let alg = pattern.algorithm()?;
        match pattern {
            EdgePattern::Cross => return Ok(()),
            EdgePattern::Dot => bench.apply(alg.moves()),
            EdgePattern::Line | EdgePattern::LShape => {
                let candidates = (0..4).map(|k| aligned(k, alg.moves()));
                let done = bench.apply_first(candidates, |s| {
                    two_layers_placed(s, 4) && edge_orientation(s).iter().all(|&o| o)
                });
                if !done {
                    return Err(stuck(
                        Phase::LastLayerCross,
                        format!("no alignment resolves the {:?} pattern", pattern),
                    ));
                }
            }
        }
    }
    match EdgePattern::classify(bench.state())? {
        EdgePattern::Cross => Ok(()),
        pattern => Err(stuck(
            Phase::LastLayerCross,
            format!("still {:?} after {} passes", pattern, MAX_EDGE_PASSES),
        )),
    }
}

pub(super) fn solve_corner_orientation(bench: &mut Workbench) -> Result<()> {
    let case = match OllCase::classify(bench.state())? {
        Some(case) => case,
        None => return Ok(()),
    };
    debug!(?case, "orienting last-layer corners");
    let alg = case.algorithm()?;
    let candidates = (0..4).map(|k| aligned(k, alg.moves()));
    if bench.apply_first(candidates, |s| {
        last_layer_oriented(s) && two_layers_placed(s, 4)
    }) {
        Ok(())
    } else {
        Err(stuck(
            Phase::OrientLastLayer,
            format!("no alignment solves the {:?} case", case),
        ))
    }
}

pub(super) fn solve_permutation(bench: &mut Workbench) -> Result<()> {
    let corners = CornerPermutation::classify(bench.state())?;
    debug!(?corners, "permuting last-layer corners");
    if corners != CornerPermutation::Solved {
        let alg = corners.algorithm()?;
        let candidates = (0..4).map(|k| aligned(k, alg.moves()));
        if !bench.apply_first(candidates, |s| headlights(s) == 4 && two_layers_placed(s, 4)) {
            return Err(stuck(
                Phase::PermuteLastLayer,
                format!("no alignment solves {:?}", corners),
            ));
        }
    }

    if !bench.apply_first((0..4).map(down_turns), corners_aligned) {
        return Err(stuck(Phase::PermuteLastLayer, "corners cannot be aligned"));
    }

    let edges = EdgePermutation::classify(bench.state())?;
    debug!(?edges, "permuting last-layer edges");
    if edges != EdgePermutation::Solved {
        let alg = edges.algorithm()?;
        let moves = alg.moves();
        let candidates = (0..4).flat_map(move |before| {
            (0..4).map(move |after| {
                let mut candidate = aligned(before, moves);
                candidate.extend_from_slice(&down_turns(after));
                candidate
            })
        });
        if !bench.apply_first(candidates, |s| s.is_solved()) {
            return Err(stuck(
                Phase::PermuteLastLayer,
                format!("no alignment solves {:?}", edges),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::CubeState;
    use crate::engine::apply_moves;
    use crate::moves::Algorithm;
    use crate::pieces::Edge;

    fn bench_at(alg: &Algorithm) -> Workbench {
        Workbench::new(apply_moves(&CubeState::solved(), alg))
    }

    #[test]
    fn test_edge_orientation_from_dot() {
        let mut facelets = *CubeState::solved().facelets();
        for edge in [Edge::Df, Edge::Dr, Edge::Db, Edge::Dl] {
            let [a, b] = edge.facelets();
            facelets.swap(a, b);
        }
        let mut bench = Workbench::new(CubeState::from_facelets(facelets).unwrap());
        assert_eq!(EdgePattern::classify(bench.state()).unwrap(), EdgePattern::Dot);
        solve_edge_orientation(&mut bench).unwrap();
        assert!(Phase::LastLayerCross.is_complete(bench.state()));
    }

    #[test]
    fn test_edge_orientation_after_mixed_setup() {
        let line = EdgePattern::Line.algorithm().unwrap();
        let lshape = EdgePattern::LShape.algorithm().unwrap();
        let mut setup = line.inverse();
        setup.extend(Algorithm::parse("D").unwrap());
        setup.extend(lshape.inverse());
        let mut bench = bench_at(&setup);
        solve_edge_orientation(&mut bench).unwrap();
        assert!(Phase::LastLayerCross.is_complete(bench.state()));
    }

    #[test]
    fn test_orientation_for_every_case() {
        for case in OllCase::ALL {
            let alg = case.algorithm().unwrap();
            for k in 0..4 {
                let mut setup = alg.inverse();
                setup.extend(down_turns(k));
                let mut bench = bench_at(&setup);
                solve_corner_orientation(&mut bench).unwrap();
                assert!(
                    Phase::OrientLastLayer.is_complete(bench.state()),
                    "{:?} turned {}",
                    case,
                    k
                );
            }
        }
    }

    #[test]
    fn test_permutation_for_every_case() {
        let setups = [
            CornerPermutation::AdjacentSwap.algorithm().unwrap(),
            CornerPermutation::DiagonalSwap.algorithm().unwrap(),
            EdgePermutation::Ua.algorithm().unwrap(),
            EdgePermutation::Ub.algorithm().unwrap(),
            EdgePermutation::H.algorithm().unwrap(),
            EdgePermutation::Z.algorithm().unwrap(),
        ];
        for alg in &setups {
            for k in 0..4 {
                let mut setup = alg.inverse();
                setup.extend(down_turns(k));
                let mut bench = bench_at(&setup);
                solve_permutation(&mut bench).unwrap();
                assert!(bench.state().is_solved(), "{} turned {}", alg, k);
            }
        }
    }

    #[test]
    fn test_aligned_last_layer_needs_only_turns() {
        let mut bench = bench_at(&Algorithm::parse("D D").unwrap());
        solve_permutation(&mut bench).unwrap();
        assert!(bench.state().is_solved());
        assert_eq!(bench.moves.len(), 2);
    }
}
