//! Cubie view of a facelet state.
//!
//! Every edge and corner cubie is named by the slot it occupies when the
//! cube is solved. Sticker lists start with the Up or Down sticker (or the
//! Front/Back sticker for middle-layer edges); corner stickers then run
//! clockwise around the cubie seen from outside.

use serde::{Deserialize, Serialize};

use crate::cube::{face_of, Color, CubeState, Face};
use crate::error::{CubeError, Result};

/// Horizontal layer of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    Up,
    Middle,
    Down,
}

/// Edge slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Ur,
    Uf,
    Ul,
    Ub,
    Dr,
    Df,
    Dl,
    Db,
    Fr,
    Fl,
    Bl,
    Br,
}

impl Edge {
    pub const ALL: [Edge; 12] = [
        Edge::Ur,
        Edge::Uf,
        Edge::Ul,
        Edge::Ub,
        Edge::Dr,
        Edge::Df,
        Edge::Dl,
        Edge::Db,
        Edge::Fr,
        Edge::Fl,
        Edge::Bl,
        Edge::Br,
    ];

    pub fn facelets(self) -> [usize; 2] {
        match self {
            Edge::Ur => [5, 37],
            Edge::Uf => [7, 19],
            Edge::Ul => [3, 46],
            Edge::Ub => [1, 28],
            Edge::Dr => [14, 43],
            Edge::Df => [10, 25],
            Edge::Dl => [12, 52],
            Edge::Db => [16, 34],
            Edge::Fr => [23, 39],
            Edge::Fl => [21, 50],
            Edge::Bl => [32, 48],
            Edge::Br => [30, 41],
        }
    }

    /// The two faces this slot touches, in sticker order.
    pub fn faces(self) -> [Face; 2] {
        self.facelets().map(face_of)
    }

    /// Colors of the cubie that belongs here.
    pub fn home_colors(self) -> [Color; 2] {
        self.faces().map(Face::solved_color)
    }

    pub fn layer(self) -> Layer {
        match self.faces()[0] {
            Face::Up => Layer::Up,
            Face::Down => Layer::Down,
            _ => Layer::Middle,
        }
    }

    /// Edge slot between Up or Down and a side face.
    pub fn between(horizontal: Face, side: Face) -> Option<Edge> {
        Edge::ALL
            .into_iter()
            .find(|edge| edge.faces() == [horizontal, side])
    }
}

/// Corner slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    Urf,
    Ufl,
    Ulb,
    Ubr,
    Dfr,
    Dlf,
    Dbl,
    Drb,
}

impl Corner {
    pub const ALL: [Corner; 8] = [
        Corner::Urf,
        Corner::Ufl,
        Corner::Ulb,
        Corner::Ubr,
        Corner::Dfr,
        Corner::Dlf,
        Corner::Dbl,
        Corner::Drb,
    ];

    pub fn facelets(self) -> [usize; 3] {
        match self {
            Corner::Urf => [8, 36, 20],
            Corner::Ufl => [6, 18, 47],
            Corner::Ulb => [0, 45, 29],
            Corner::Ubr => [2, 27, 38],
            Corner::Dfr => [11, 26, 42],
            Corner::Dlf => [9, 53, 24],
            Corner::Dbl => [15, 35, 51],
            Corner::Drb => [17, 44, 33],
        }
    }

    pub fn faces(self) -> [Face; 3] {
        self.facelets().map(face_of)
    }

    pub fn home_colors(self) -> [Color; 3] {
        self.faces().map(Face::solved_color)
    }

    pub fn layer(self) -> Layer {
        if self.faces()[0] == Face::Up {
            Layer::Up
        } else {
            Layer::Down
        }
    }
}

fn same_colors<const N: usize>(a: [Color; N], b: [Color; N]) -> bool {
    a.iter().all(|c| b.contains(c)) && b.iter().all(|c| a.contains(c))
}

/// Colors currently in an edge slot, in sticker order.
pub fn edge_colors(state: &CubeState, edge: Edge) -> [Color; 2] {
    edge.facelets().map(|i| state.color_at(i))
}

/// Colors currently in a corner slot, in sticker order.
pub fn corner_colors(state: &CubeState, corner: Corner) -> [Color; 3] {
    corner.facelets().map(|i| state.color_at(i))
}

/// Cubie in its home slot with the right orientation.
pub fn is_edge_solved(state: &CubeState, edge: Edge) -> bool {
    edge_colors(state, edge) == edge.home_colors()
}

pub fn is_corner_solved(state: &CubeState, corner: Corner) -> bool {
    corner_colors(state, corner) == corner.home_colors()
}

/// Slot currently holding the edge cubie with these colors.
pub fn locate_edge(state: &CubeState, colors: [Color; 2]) -> Option<Edge> {
    Edge::ALL
        .into_iter()
        .find(|&edge| same_colors(edge_colors(state, edge), colors))
}

/// Slot currently holding the corner cubie with these colors.
pub fn locate_corner(state: &CubeState, colors: [Color; 3]) -> Option<Corner> {
    Corner::ALL
        .into_iter()
        .find(|&corner| same_colors(corner_colors(state, corner), colors))
}

/// Sticker position (0..3) of the White or Yellow sticker in a corner slot.
/// 0 means the cubie is oriented.
pub fn corner_twist(state: &CubeState, corner: Corner) -> Option<usize> {
    corner_colors(state, corner)
        .iter()
        .position(|&c| c == Color::White || c == Color::Yellow)
}

fn permutation_parity(mut permutation: Vec<usize>) -> usize {
    let mut swaps = 0;
    for i in 0..permutation.len() {
        while permutation[i] != i {
            let j = permutation[i];
            permutation.swap(i, j);
            swaps += 1;
        }
    }
    swaps % 2
}

/// Check that a state is reachable from solved by face turns.
///
/// Color counts and centers are checked again here so that a state built
/// without [`CubeState::from_facelets`] cannot slip through.
pub fn validate_legal(state: &CubeState) -> Result<()> {
    if !state.has_color_balance() {
        return Err(CubeError::unsolvable("color counts are not 9 each"));
    }
    if let Some(face) = Face::ALL
        .into_iter()
        .find(|&face| state.center(face) != face.solved_color())
    {
        return Err(CubeError::unsolvable(format!(
            "center of face {} is out of place",
            face
        )));
    }

    let mut edge_permutation = Vec::with_capacity(Edge::ALL.len());
    let mut flips = 0;
    for edge in Edge::ALL {
        let colors = edge_colors(state, edge);
        let home = Edge::ALL
            .iter()
            .position(|e| same_colors(e.home_colors(), colors))
            .ok_or_else(|| {
                CubeError::unsolvable(format!(
                    "edge {:?} holds a {:?}/{:?} piece that does not exist",
                    edge, colors[0], colors[1]
                ))
            })?;
        if edge_permutation.contains(&home) {
            return Err(CubeError::unsolvable(format!(
                "edge piece {:?} appears twice",
                Edge::ALL[home]
            )));
        }
        edge_permutation.push(home);
        if colors[0] != Edge::ALL[home].home_colors()[0] {
            flips += 1;
        }
    }

    let mut corner_permutation = Vec::with_capacity(Corner::ALL.len());
    let mut twist = 0;
    for corner in Corner::ALL {
        let colors = corner_colors(state, corner);
        let home = Corner::ALL
            .iter()
            .position(|c| same_colors(c.home_colors(), colors))
            .ok_or_else(|| {
                CubeError::unsolvable(format!(
                    "corner {:?} holds a piece that does not exist",
                    corner
                ))
            })?;
        if corner_permutation.contains(&home) {
            return Err(CubeError::unsolvable(format!(
                "corner piece {:?} appears twice",
                Corner::ALL[home]
            )));
        }
        corner_permutation.push(home);
        twist += corner_twist(state, corner).unwrap_or(0);
    }

    if flips % 2 != 0 {
        return Err(CubeError::unsolvable("a single edge is flipped"));
    }
    if twist % 3 != 0 {
        return Err(CubeError::unsolvable("a single corner is twisted"));
    }
    if permutation_parity(edge_permutation) != permutation_parity(corner_permutation) {
        return Err(CubeError::unsolvable(
            "two pieces are swapped (permutation parity mismatch)",
        ));
    }
    Ok(())
}
