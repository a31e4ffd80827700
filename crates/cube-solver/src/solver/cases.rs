//! Last-layer case recognition and the algorithm for each case.
//!
//! Algorithms are kept in the usual "last layer on top" notation and turned
//! into this solver's frame (last layer on Down) by flipping the whole cube
//! upside down about the front-back axis. Recognition looks only at the Down
//! layer, so every classifier assumes the first two layers are solved.

use serde::Serialize;

use crate::cube::{facelet_index, Color, CubeState, Face};
use crate::error::{CubeError, Result};
use crate::moves::Algorithm;
use crate::pieces::{corner_colors, edge_colors, Corner, Edge};

/// Down-layer edges under F, R, B and L.
const LAST_LAYER_EDGES: [Edge; 4] = [Edge::Df, Edge::Dr, Edge::Db, Edge::Dl];

/// Down-layer corners in ring order.
const LAST_LAYER_CORNERS: [Corner; 4] = [Corner::Dfr, Corner::Dlf, Corner::Dbl, Corner::Drb];

fn last_layer_algorithm(notation: &str) -> Result<Algorithm> {
    Ok(Algorithm::parse(notation)?.relabeled(Face::flipped_upside_down))
}

/// Which Down edges show yellow on the Down face.
pub fn edge_orientation(state: &CubeState) -> [bool; 4] {
    LAST_LAYER_EDGES.map(|edge| edge_colors(state, edge)[0] == Color::Yellow)
}

/// All nine Down facelets are yellow.
pub fn last_layer_oriented(state: &CubeState) -> bool {
    state.face(Face::Down).iter().all(|&c| c == Color::Yellow)
}

/// Number of side faces whose two bottom corner stickers match.
pub fn headlights(state: &CubeState) -> usize {
    Face::SIDES
        .iter()
        .filter(|&&face| {
            state.color_at(facelet_index(face, 2, 0)) == state.color_at(facelet_index(face, 2, 2))
        })
        .count()
}

/// Every bottom corner sticker on the sides matches its center.
pub fn corners_aligned(state: &CubeState) -> bool {
    Face::SIDES
        .iter()
        .all(|&face| state.color_at(facelet_index(face, 2, 0)) == face.solved_color())
}

/// Shape formed by the oriented Down edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EdgePattern {
    Dot,
    Line,
    LShape,
    Cross,
}

impl EdgePattern {
    pub fn classify(state: &CubeState) -> Result<Self> {
        let oriented = edge_orientation(state);
        match oriented.iter().filter(|&&o| o).count() {
            4 => Ok(EdgePattern::Cross),
            0 => Ok(EdgePattern::Dot),
            2 if oriented[0] == oriented[2] => Ok(EdgePattern::Line),
            2 => Ok(EdgePattern::LShape),
            n => Err(CubeError::unsolvable(format!(
                "{} last-layer edges oriented, expected an even count",
                n
            ))),
        }
    }

    pub fn notation(self) -> &'static str {
        match self {
            EdgePattern::Dot | EdgePattern::Line => "F R U R' U' F'",
            EdgePattern::LShape => "F U R U' R' F'",
            EdgePattern::Cross => "",
        }
    }

    pub fn algorithm(self) -> Result<Algorithm> {
        last_layer_algorithm(self.notation())
    }
}

/// Corner orientation cases once the last-layer cross is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OllCase {
    Sune,
    Antisune,
    H,
    Pi,
    Headlights,
    T,
    Bowtie,
}

impl OllCase {
    pub const ALL: [OllCase; 7] = [
        OllCase::Sune,
        OllCase::Antisune,
        OllCase::H,
        OllCase::Pi,
        OllCase::Headlights,
        OllCase::T,
        OllCase::Bowtie,
    ];

    /// `None` when every Down corner already shows yellow on the Down face.
    pub fn classify(state: &CubeState) -> Result<Option<Self>> {
        let mut twists = [0u8; 4];
        for (twist, corner) in twists.iter_mut().zip(LAST_LAYER_CORNERS) {
            *twist = corner_colors(state, corner)
                .iter()
                .position(|&c| c == Color::Yellow)
                .ok_or_else(|| {
                    CubeError::unsolvable(format!("corner {:?} has no yellow sticker", corner))
                })? as u8;
        }
        // Lexicographically smallest rotation of the twist ring.
        let canonical = (0..4)
            .map(|shift| {
                let mut rotated = twists;
                rotated.rotate_left(shift);
                rotated
            })
            .min()
            .unwrap_or(twists);

        match canonical {
            [0, 0, 0, 0] => Ok(None),
            [0, 2, 2, 2] => Ok(Some(OllCase::Sune)),
            [0, 1, 1, 1] => Ok(Some(OllCase::Antisune)),
            [1, 2, 1, 2] => Ok(Some(OllCase::H)),
            [1, 1, 2, 2] => Ok(Some(OllCase::Pi)),
            [0, 0, 1, 2] => Ok(Some(OllCase::Headlights)),
            [0, 0, 2, 1] => Ok(Some(OllCase::T)),
            [0, 1, 0, 2] => Ok(Some(OllCase::Bowtie)),
            other => Err(CubeError::unsolvable(format!(
                "unrecognized corner twist pattern {:?}",
                other
            ))),
        }
    }

    pub fn notation(self) -> &'static str {
        match self {
            OllCase::Sune => "R U R' U R U2 R'",
            OllCase::Antisune => "R U2 R' U' R U' R'",
            OllCase::H => "R U R' U R U' R' U R U2 R'",
            OllCase::Pi => "R U2 R2 U' R2 U' R2 U2 R",
            OllCase::Headlights => "R2 D R' U2 R D' R' U2 R'",
            OllCase::T => "L F R' F' L' F R F'",
            OllCase::Bowtie => "R' F R B' R' F' R B",
        }
    }

    pub fn algorithm(self) -> Result<Algorithm> {
        last_layer_algorithm(self.notation())
    }
}

/// First look of PLL: corner permutation by headlight count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CornerPermutation {
    Solved,
    AdjacentSwap,
    DiagonalSwap,
}

impl CornerPermutation {
    pub fn classify(state: &CubeState) -> Result<Self> {
        match headlights(state) {
            4 => Ok(CornerPermutation::Solved),
            1 => Ok(CornerPermutation::AdjacentSwap),
            0 => Ok(CornerPermutation::DiagonalSwap),
            n => Err(CubeError::unsolvable(format!(
                "{} side faces show headlights",
                n
            ))),
        }
    }

    pub fn notation(self) -> &'static str {
        match self {
            CornerPermutation::Solved => "",
            // T-perm
            CornerPermutation::AdjacentSwap => "R U R' U' R' F R2 U' R' U' R U R' F'",
            // Y-perm
            CornerPermutation::DiagonalSwap => "F R U' R' U' R U R' F' R U R' U' R' F R F'",
        }
    }

    pub fn algorithm(self) -> Result<Algorithm> {
        last_layer_algorithm(self.notation())
    }
}

/// Second look of PLL: edge cycle with corners solved and aligned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EdgePermutation {
    Solved,
    Ua,
    Ub,
    H,
    Z,
}

impl EdgePermutation {
    pub const CYCLES: [EdgePermutation; 4] = [
        EdgePermutation::Ua,
        EdgePermutation::Ub,
        EdgePermutation::H,
        EdgePermutation::Z,
    ];

    pub fn classify(state: &CubeState) -> Result<Self> {
        // homes[i]: which side the edge under side i belongs to
        let mut homes = [0usize; 4];
        for (home, face) in homes.iter_mut().zip(Face::SIDES) {
            let color = state.color_at(facelet_index(face, 2, 1));
            *home = color.home_face().side_index().ok_or_else(|| {
                CubeError::unsolvable(format!("{:?} sticker on the side of the last layer", color))
            })?;
        }

        let fixed: Vec<usize> = (0..4).filter(|&i| homes[i] == i).collect();
        match fixed.as_slice() {
            [_, _, _, _] => Ok(EdgePermutation::Solved),
            [i] => {
                let next = (i + 1) % 4;
                if homes[next] == (next + 1) % 4 {
                    Ok(EdgePermutation::Ub)
                } else {
                    Ok(EdgePermutation::Ua)
                }
            }
            [] if (0..4).all(|i| homes[homes[i]] == i) => {
                if (0..4).all(|i| homes[i] == (i + 2) % 4) {
                    Ok(EdgePermutation::H)
                } else {
                    Ok(EdgePermutation::Z)
                }
            }
            _ => Err(CubeError::unsolvable(format!(
                "unrecognized last-layer edge cycle {:?}",
                homes
            ))),
        }
    }

    pub fn notation(self) -> &'static str {
        match self {
            EdgePermutation::Solved => "",
            EdgePermutation::Ua => "R U' R U R U R U' R' U' R2",
            EdgePermutation::Ub => "R2 U R U R' U' R' U' R' U R'",
            EdgePermutation::H => "R2 U2 R U2 R2 U2 R2 U2 R U2 R2",
            EdgePermutation::Z => "R' U' R U' R U R U' R' U R U R2 U' R'",
        }
    }

    pub fn algorithm(self) -> Result<Algorithm> {
        last_layer_algorithm(self.notation())
    }
}
