//! Move engine: applies generators to facelet states.
//!
//! Each generator is a fixed permutation of the 54 facelets. The tables are
//! not written out by hand. They are generated once from cube geometry: every
//! facelet gets an integer position on the surface of a 3x3x3 cube centered
//! at the origin plus the outward normal of its face, and a quarter turn
//! rotates every facelet in the turning layer by -90 degrees about that
//! face's normal (clockwise seen from outside). Counter-clockwise tables are
//! the inverse permutations.

use std::sync::OnceLock;

use crate::cube::{CubeState, Face, FACELET_COUNT};
use crate::error::Result;
use crate::moves::{Algorithm, Move};

/// Gather table: `next[i] = prev[table[i]]`.
type Permutation = [u8; FACELET_COUNT];

/// Integer vector with components in -1..=1.
pub(crate) type Vec3 = [i8; 3];

static MOVE_TABLES: OnceLock<[Permutation; 12]> = OnceLock::new();

fn add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn scale(a: Vec3, k: i8) -> Vec3 {
    [a[0] * k, a[1] * k, a[2] * k]
}

fn dot(a: Vec3, b: Vec3) -> i8 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Outward normal. x points Right, y points Up, z points Front.
pub(crate) fn normal(face: Face) -> Vec3 {
    match face {
        Face::Up => [0, 1, 0],
        Face::Down => [0, -1, 0],
        Face::Front => [0, 0, 1],
        Face::Back => [0, 0, -1],
        Face::Right => [1, 0, 0],
        Face::Left => [-1, 0, 0],
    }
}

/// Direction of increasing column, seen from outside the face.
fn column_axis(face: Face) -> Vec3 {
    match face {
        Face::Up | Face::Down | Face::Front => [1, 0, 0],
        Face::Back => [-1, 0, 0],
        Face::Right => [0, 0, -1],
        Face::Left => [0, 0, 1],
    }
}

/// Direction of increasing row, seen from outside the face.
fn row_axis(face: Face) -> Vec3 {
    match face {
        Face::Up => [0, 0, 1],
        Face::Down => [0, 0, -1],
        _ => [0, -1, 0],
    }
}

/// Cubie position and outward normal of a facelet.
pub(crate) fn facelet_geometry(index: usize) -> (Vec3, Vec3) {
    let face = Face::ALL[index / 9];
    let row = (index % 9 / 3) as i8 - 1;
    let col = (index % 3) as i8 - 1;
    let n = normal(face);
    let position = add(n, add(scale(column_axis(face), col), scale(row_axis(face), row)));
    (position, n)
}

/// Inverse of [`normal`] for the six axis-aligned unit vectors.
fn face_with_normal(n: Vec3) -> Face {
    match n {
        [0, 1, 0] => Face::Up,
        [0, -1, 0] => Face::Down,
        [0, 0, 1] => Face::Front,
        [0, 0, -1] => Face::Back,
        [1, 0, 0] => Face::Right,
        _ => Face::Left,
    }
}

fn facelet_at(position: Vec3, n: Vec3) -> usize {
    let face = face_with_normal(n);
    let offset = sub(position, n);
    let row = (dot(offset, row_axis(face)) + 1) as usize;
    let col = (dot(offset, column_axis(face)) + 1) as usize;
    face.index() * 9 + row * 3 + col
}

/// Rotate by -90 degrees about an axis-aligned unit vector.
fn quarter_turn(axis: Vec3, v: Vec3) -> Vec3 {
    let c = cross(axis, v);
    let along = dot(axis, v);
    [
        axis[0] * along - c[0],
        axis[1] * along - c[1],
        axis[2] * along - c[2],
    ]
}

fn clockwise_table(face: Face) -> Permutation {
    let axis = normal(face);
    let mut table = [0u8; FACELET_COUNT];
    for (i, slot) in table.iter_mut().enumerate() {
        *slot = i as u8;
    }
    for source in 0..FACELET_COUNT {
        let (position, n) = facelet_geometry(source);
        if dot(position, axis) == 1 {
            let target = facelet_at(quarter_turn(axis, position), quarter_turn(axis, n));
            table[target] = source as u8;
        }
    }
    table
}

fn invert(table: &Permutation) -> Permutation {
    let mut inverse = [0u8; FACELET_COUNT];
    for (target, &source) in table.iter().enumerate() {
        inverse[source as usize] = target as u8;
    }
    inverse
}

fn build_tables() -> [Permutation; 12] {
    let mut tables = [[0u8; FACELET_COUNT]; 12];
    for face in Face::ALL {
        let clockwise = clockwise_table(face);
        tables[Move::clockwise(face).index()] = clockwise;
        tables[Move::counter_clockwise(face).index()] = invert(&clockwise);
    }
    tables
}

fn table(m: Move) -> &'static Permutation {
    &MOVE_TABLES.get_or_init(build_tables)[m.index()]
}

/// Apply one generator, producing the next state.
pub fn apply_move(state: &CubeState, m: Move) -> CubeState {
    let table = table(m);
    let prev = state.facelets();
    let mut next = *prev;
    for (slot, &source) in next.iter_mut().zip(table.iter()) {
        *slot = prev[source as usize];
    }
    CubeState::from_facelets_unchecked(next)
}

/// Apply moves in order.
pub fn apply_moves<'a, I>(state: &CubeState, moves: I) -> CubeState
where
    I: IntoIterator<Item = &'a Move>,
{
    moves
        .into_iter()
        .fold(*state, |current, &m| apply_move(&current, m))
}

/// Parse and apply a single symbol in place. On an invalid symbol the state
/// is left untouched.
pub fn apply_symbol(state: &mut CubeState, symbol: &str) -> Result<Move> {
    let m: Move = symbol.parse()?;
    *state = apply_move(state, m);
    Ok(m)
}

/// Parse a whole notation string, then apply it. Nothing is applied if any
/// token is invalid.
pub fn apply_sequence(state: &mut CubeState, notation: &str) -> Result<Algorithm> {
    let algorithm = Algorithm::parse(notation)?;
    *state = apply_moves(state, &algorithm);
    Ok(algorithm)
}

impl CubeState {
    /// Apply a generator in place.
    pub fn apply(&mut self, m: Move) {
        *self = apply_move(self, m);
    }

    /// Copy of this state with a generator applied.
    pub fn applied(&self, m: Move) -> CubeState {
        apply_move(self, m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::{facelet_index, Color, CENTER};
    use crate::scramble::scramble;

    fn scrambled(seed: u64) -> CubeState {
        scramble(&CubeState::solved(), 30, seed).0
    }

    #[test]
    fn test_face_rotation_matches_index_permutation() {
        for face in Face::ALL {
            let table = table(Move::clockwise(face));
            let base = face.index() * 9;
            let own: Vec<usize> = (0..9).map(|i| table[base + i] as usize - base).collect();
            assert_eq!(own, vec![6, 3, 0, 7, 4, 1, 8, 5, 2], "face {}", face);
        }
    }

    #[test]
    fn test_tables_are_permutations() {
        for m in Move::ALL {
            let mut seen = [false; FACELET_COUNT];
            for &source in table(m).iter() {
                assert!(!seen[source as usize]);
                seen[source as usize] = true;
            }
            // 8 facelets on the face plus 12 on the adjacent strips move
            let moved = table(m)
                .iter()
                .enumerate()
                .filter(|&(i, &s)| i != s as usize)
                .count();
            assert_eq!(moved, 20, "move {}", m);
        }
    }

    #[test]
    fn test_up_turn_cycles_top_rows() {
        // U clockwise: Front's top row comes from Right.
        let state = apply_move(&CubeState::solved(), "U".parse().unwrap());
        for col in 0..3 {
            assert_eq!(state.color_at(facelet_index(Face::Front, 0, col)), Color::Green);
            assert_eq!(state.color_at(facelet_index(Face::Left, 0, col)), Color::Red);
            assert_eq!(state.color_at(facelet_index(Face::Back, 0, col)), Color::Blue);
            assert_eq!(state.color_at(facelet_index(Face::Right, 0, col)), Color::Orange);
        }
        assert!(state.is_face_solved(Face::Up));
        assert!(state.is_face_solved(Face::Down));
    }

    #[test]
    fn test_front_turn_moves_up_row_onto_right_column() {
        let state = apply_move(&CubeState::solved(), "F".parse().unwrap());
        for row in 0..3 {
            assert_eq!(state.color_at(facelet_index(Face::Right, row, 0)), Color::White);
            assert_eq!(state.color_at(facelet_index(Face::Left, row, 2)), Color::Yellow);
        }
        for col in 0..3 {
            assert_eq!(state.color_at(facelet_index(Face::Up, 2, col)), Color::Blue);
            assert_eq!(state.color_at(facelet_index(Face::Down, 0, col)), Color::Green);
        }
    }

    #[test]
    fn test_inverse_law() {
        for seed in 0..20 {
            let state = scrambled(seed);
            for m in Move::ALL {
                let there = apply_move(&state, m);
                assert_eq!(apply_move(&there, m.inverse()), state, "move {}", m);
            }
        }
    }

    #[test]
    fn test_order_four_law() {
        for seed in 0..20 {
            let state = scrambled(seed);
            for m in Move::ALL {
                let mut current = state;
                for _ in 0..4 {
                    current.apply(m);
                }
                assert_eq!(current, state, "move {}", m);
            }
        }
    }

    #[test]
    fn test_moves_preserve_centers_and_counts() {
        let mut state = CubeState::solved();
        for seed in 0..50u64 {
            state.apply(Move::ALL[(seed * 7 % 12) as usize]);
            assert!(state.has_color_balance());
            for face in Face::ALL {
                assert_eq!(state.face(face)[CENTER], face.solved_color());
            }
        }
    }

    #[test]
    fn test_net_identity_sequence() {
        let mut state = CubeState::solved();
        for symbol in ["U", "U'", "U'", "U"] {
            apply_symbol(&mut state, symbol).unwrap();
        }
        assert!(state.is_solved());
    }

    #[test]
    fn test_sexy_move_has_order_six() {
        let alg = Algorithm::parse("R U R' U'").unwrap();
        let mut state = CubeState::solved();
        for i in 1..=6 {
            state = apply_moves(&state, &alg);
            assert_eq!(state.is_solved(), i == 6);
        }
    }

    #[test]
    fn test_invalid_symbol_leaves_state_unchanged() {
        let mut state = scrambled(7);
        let before = state;
        let err = apply_symbol(&mut state, "X").unwrap_err();
        assert_eq!(err, crate::error::CubeError::invalid_move("X"));
        assert_eq!(state, before);

        let err = apply_sequence(&mut state, "R U X").unwrap_err();
        assert!(matches!(err, crate::error::CubeError::InvalidMove { .. }));
        assert_eq!(state, before);
    }

    #[test]
    fn test_opposite_faces_commute() {
        let state = scrambled(3);
        let ud = apply_moves(&state, &Algorithm::parse("U D").unwrap());
        let du = apply_moves(&state, &Algorithm::parse("D U").unwrap());
        assert_eq!(ud, du);
    }
}
