//! Middle-layer edges.
//!
//! Each edge is brought into the Down layer, aligned with `D` turns and
//! inserted with one of two mirrored eight-move insertions, written for the
//! Front face and rotated to each side.

use super::first_layer::first_layer_placed;
use super::{aligned, stuck, Candidate, Phase, Workbench};
use crate::cube::{CubeState, Face};
use crate::error::Result;
use crate::moves::Algorithm;
use crate::pieces::{is_edge_solved, locate_edge, Edge, Layer};

/// Middle edges in solving order.
const MIDDLE_EDGES: [Edge; 4] = [Edge::Fr, Edge::Br, Edge::Bl, Edge::Fl];

/// Inserts the Down edge below Front into the front-right slot.
const RIGHT_INSERT: &str = "D L D' L' D' F' D F";

/// Mirror of [`RIGHT_INSERT`] for the front-left slot.
const LEFT_INSERT: &str = "D' R' D R D F D' F'";

/// First layer complete plus the first `middle` middle edges.
pub(super) fn two_layers_placed(state: &CubeState, middle: usize) -> bool {
    first_layer_placed(state, 4)
        && MIDDLE_EDGES[..middle]
            .iter()
            .all(|&edge| is_edge_solved(state, edge))
}

/// Both insertions for every side taken as front.
fn insertions() -> Result<Vec<Candidate>> {
    let mut algs = Vec::with_capacity(8);
    for quarter_turns in 0..Face::SIDES.len() {
        for notation in [RIGHT_INSERT, LEFT_INSERT] {
            let alg = Algorithm::parse(notation)?
                .relabeled(|face| face.turned_about_vertical(quarter_turns));
            algs.push(alg.into_moves().into_iter().collect());
        }
    }
    Ok(algs)
}

pub(super) fn solve_middle_edges(bench: &mut Workbench) -> Result<()> {
    let algs = insertions()?;
    for (placed, &edge) in MIDDLE_EDGES.iter().enumerate() {
        if is_edge_solved(bench.state(), edge) {
            continue;
        }
        let colors = edge.home_colors();
        let in_down_layer =
            |s: &CubeState| locate_edge(s, colors).map(Edge::layer) == Some(Layer::Down);

        if !in_down_layer(bench.state()) {
            // Wrong slot or flipped in its own slot: pop it out first.
            let extracted = bench.apply_first(algs.iter().cloned(), |s| {
                two_layers_placed(s, placed) && in_down_layer(s)
            });
            if !extracted {
                return Err(stuck(
                    Phase::SecondLayerEdges,
                    format!("cannot extract edge {:?}", edge),
                ));
            }
        }

        let candidates = algs
            .iter()
            .flat_map(|alg| (0..4).map(move |k| aligned(k, alg)));
        if !bench.apply_first(candidates, |s| two_layers_placed(s, placed + 1)) {
            return Err(stuck(
                Phase::SecondLayerEdges,
                format!("cannot insert edge {:?}", edge),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::apply_moves;
    use crate::scramble::scramble;
    use crate::solver::first_layer::{solve_corners, solve_cross};

    #[test]
    fn test_insertions_rotate_with_front() {
        let algs = insertions().unwrap();
        assert_eq!(algs.len(), 8);
        let as_text = |c: &Candidate| Algorithm::from(c.to_vec()).to_string();
        assert_eq!(as_text(&algs[0]), RIGHT_INSERT);
        assert_eq!(as_text(&algs[1]), LEFT_INSERT);
        // Right face as front: F->R, L->F, R->B.
        assert_eq!(as_text(&algs[2]), "D F D' F' D' R' D R");
    }

    #[test]
    fn test_insertions_keep_first_layer() {
        for alg in insertions().unwrap() {
            let state = apply_moves(&CubeState::solved(), &alg);
            assert!(first_layer_placed(&state, 4));
        }
    }

    #[test]
    fn test_two_layers_on_scrambles() {
        for seed in 100..160 {
            let start = scramble(&CubeState::solved(), 25, seed).0;
            let mut bench = Workbench::new(start);
            solve_cross(&mut bench).unwrap();
            solve_corners(&mut bench).unwrap();
            solve_middle_edges(&mut bench).unwrap();
            assert!(two_layers_placed(bench.state(), 4), "seed {}", seed);
        }
    }
}
