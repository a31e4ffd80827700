//! Move notation: the twelve quarter-turn generators and move sequences.
//!
//! The textual form is the wire and display format: `U`, `U'`, `D`, `D'`,
//! `R`, `R'`, `L`, `L'`, `F`, `F'`, `B`, `B'` (ASCII apostrophe for
//! counter-clockwise). A double turn such as `R2` is not a generator; the
//! sequence parser expands it into two quarter turns.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cube::Face;
use crate::error::{CubeError, Result};

/// Turn direction, as seen looking at the turning face from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Turn {
    Clockwise,
    CounterClockwise,
}

impl Turn {
    pub fn reversed(self) -> Turn {
        match self {
            Turn::Clockwise => Turn::CounterClockwise,
            Turn::CounterClockwise => Turn::Clockwise,
        }
    }
}

/// One quarter-turn generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Move {
    face: Face,
    turn: Turn,
}

impl Move {
    /// All generators in notation order.
    pub const ALL: [Move; 12] = [
        Move::clockwise(Face::Up),
        Move::counter_clockwise(Face::Up),
        Move::clockwise(Face::Down),
        Move::counter_clockwise(Face::Down),
        Move::clockwise(Face::Right),
        Move::counter_clockwise(Face::Right),
        Move::clockwise(Face::Left),
        Move::counter_clockwise(Face::Left),
        Move::clockwise(Face::Front),
        Move::counter_clockwise(Face::Front),
        Move::clockwise(Face::Back),
        Move::counter_clockwise(Face::Back),
    ];

    pub const fn new(face: Face, turn: Turn) -> Self {
        Self { face, turn }
    }

    pub const fn clockwise(face: Face) -> Self {
        Self::new(face, Turn::Clockwise)
    }

    pub const fn counter_clockwise(face: Face) -> Self {
        Self::new(face, Turn::CounterClockwise)
    }

    pub fn face(self) -> Face {
        self.face
    }

    pub fn turn(self) -> Turn {
        self.turn
    }

    pub fn is_prime(self) -> bool {
        self.turn == Turn::CounterClockwise
    }

    pub fn inverse(self) -> Move {
        Move::new(self.face, self.turn.reversed())
    }

    /// Dense index (face * 2 + direction), used for table lookup.
    pub fn index(self) -> usize {
        self.face.index() * 2 + usize::from(self.is_prime())
    }

    pub fn symbol(self) -> &'static str {
        match (self.face, self.turn) {
            (Face::Up, Turn::Clockwise) => "U",
            (Face::Up, Turn::CounterClockwise) => "U'",
            (Face::Down, Turn::Clockwise) => "D",
            (Face::Down, Turn::CounterClockwise) => "D'",
            (Face::Front, Turn::Clockwise) => "F",
            (Face::Front, Turn::CounterClockwise) => "F'",
            (Face::Back, Turn::Clockwise) => "B",
            (Face::Back, Turn::CounterClockwise) => "B'",
            (Face::Right, Turn::Clockwise) => "R",
            (Face::Right, Turn::CounterClockwise) => "R'",
            (Face::Left, Turn::Clockwise) => "L",
            (Face::Left, Turn::CounterClockwise) => "L'",
        }
    }

    /// Same turn direction on a relabeled face. Only meaningful for face
    /// relabelings that come from rotating the whole cube.
    pub fn relabeled(self, map: impl Fn(Face) -> Face) -> Move {
        Move::new(map(self.face), self.turn)
    }
}

impl FromStr for Move {
    type Err = CubeError;

    fn from_str(symbol: &str) -> Result<Self> {
        Move::ALL
            .iter()
            .copied()
            .find(|m| m.symbol() == symbol)
            .ok_or_else(|| CubeError::invalid_move(symbol))
    }
}

impl TryFrom<String> for Move {
    type Error = CubeError;

    fn try_from(symbol: String) -> Result<Self> {
        symbol.parse()
    }
}

impl From<Move> for String {
    fn from(m: Move) -> Self {
        m.symbol().to_string()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// An ordered sequence of generators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Algorithm {
    moves: Vec<Move>,
}

impl Algorithm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse space-separated notation. `X2` expands to `X X`.
    ///
    /// Fails on the first unknown token; nothing is partially returned.
    pub fn parse(notation: &str) -> Result<Self> {
        let mut moves = Vec::new();
        for token in notation.split_whitespace() {
            if let Some(face) = token
                .strip_suffix('2')
                .filter(|rest| rest.chars().count() == 1)
                .and_then(|rest| rest.chars().next())
                .and_then(Face::from_letter)
            {
                moves.push(Move::clockwise(face));
                moves.push(Move::clockwise(face));
            } else {
                moves.push(token.parse()?);
            }
        }
        Ok(Self { moves })
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

    pub fn push(&mut self, m: Move) {
        self.moves.push(m);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.moves.iter()
    }

    pub fn into_moves(self) -> Vec<Move> {
        self.moves
    }

    /// Undo sequence: reversed, each move inverted.
    pub fn inverse(&self) -> Algorithm {
        self.moves.iter().rev().map(|m| m.inverse()).collect()
    }

    /// Cancel adjacent turns of the same face. The result reaches the same
    /// state; three quarter turns become one inverse turn, a half turn stays
    /// as two clockwise turns.
    pub fn simplify(&self) -> Algorithm {
        // (face, clockwise quarter turns mod 4)
        let mut runs: Vec<(Face, u8)> = Vec::with_capacity(self.moves.len());
        for m in &self.moves {
            let quarter = if m.is_prime() { 3 } else { 1 };
            let merged = match runs.last_mut() {
                Some((face, count)) if *face == m.face() => {
                    *count = (*count + quarter) % 4;
                    Some(*count)
                }
                _ => None,
            };
            match merged {
                Some(0) => {
                    runs.pop();
                }
                Some(_) => {}
                None => runs.push((m.face(), quarter)),
            }
        }

        let mut simplified = Algorithm::new();
        for (face, count) in runs {
            match count {
                1 => simplified.push(Move::clockwise(face)),
                2 => {
                    simplified.push(Move::clockwise(face));
                    simplified.push(Move::clockwise(face));
                }
                3 => simplified.push(Move::counter_clockwise(face)),
                _ => {}
            }
        }
        simplified
    }

    /// Apply a whole-cube face relabeling to every move.
    pub fn relabeled(&self, map: impl Fn(Face) -> Face) -> Algorithm {
        self.moves.iter().map(|m| m.relabeled(&map)).collect()
    }
}

impl FromStr for Algorithm {
    type Err = CubeError;

    fn from_str(notation: &str) -> Result<Self> {
        Algorithm::parse(notation)
    }
}

impl From<Vec<Move>> for Algorithm {
    fn from(moves: Vec<Move>) -> Self {
        Self { moves }
    }
}

impl FromIterator<Move> for Algorithm {
    fn from_iter<I: IntoIterator<Item = Move>>(iter: I) -> Self {
        Self {
            moves: iter.into_iter().collect(),
        }
    }
}

impl Extend<Move> for Algorithm {
    fn extend<I: IntoIterator<Item = Move>>(&mut self, iter: I) {
        self.moves.extend(iter);
    }
}

impl IntoIterator for Algorithm {
    type Item = Move;
    type IntoIter = std::vec::IntoIter<Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.into_iter()
    }
}

impl<'a> IntoIterator for &'a Algorithm {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, m) in self.moves.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(m.symbol())?;
        }
        Ok(())
    }
}
