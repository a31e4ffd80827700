//! Facelet representation of a 3x3x3 cube.
//!
//! A state is 54 colored facelets, nine per face, row-major as seen from
//! outside the face. Up rows run back to front, Down rows run front to back
//! and the four side faces have Up at the top. The center (index 4) of each
//! face never moves, so it defines which color belongs on that face.
//!
//! The JSON form maps each face letter to its nine color indices:
//! `{"U":[0,0,0,0,0,0,0,0,0], "D":[1,...], ...}`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CubeError, Result};

/// Number of facelets on the whole cube.
pub const FACELET_COUNT: usize = 54;

/// Index of the center facelet inside a face.
pub const CENTER: usize = 4;

/// Face identifier, in storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Face {
    #[serde(rename = "U")]
    Up,
    #[serde(rename = "D")]
    Down,
    #[serde(rename = "F")]
    Front,
    #[serde(rename = "B")]
    Back,
    #[serde(rename = "R")]
    Right,
    #[serde(rename = "L")]
    Left,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Up,
        Face::Down,
        Face::Front,
        Face::Back,
        Face::Right,
        Face::Left,
    ];

    /// Side faces in clockwise order seen from above.
    pub const SIDES: [Face; 4] = [Face::Front, Face::Right, Face::Back, Face::Left];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Face> {
        Face::ALL.get(index).copied()
    }

    /// Notation letter
    pub fn letter(self) -> char {
        match self {
            Face::Up => 'U',
            Face::Down => 'D',
            Face::Front => 'F',
            Face::Back => 'B',
            Face::Right => 'R',
            Face::Left => 'L',
        }
    }

    pub fn from_letter(letter: char) -> Option<Face> {
        match letter {
            'U' => Some(Face::Up),
            'D' => Some(Face::Down),
            'F' => Some(Face::Front),
            'B' => Some(Face::Back),
            'R' => Some(Face::Right),
            'L' => Some(Face::Left),
            _ => None,
        }
    }

    pub fn opposite(self) -> Face {
        match self {
            Face::Up => Face::Down,
            Face::Down => Face::Up,
            Face::Front => Face::Back,
            Face::Back => Face::Front,
            Face::Right => Face::Left,
            Face::Left => Face::Right,
        }
    }

    /// Color this face carries when the cube is solved.
    pub fn solved_color(self) -> Color {
        Color::ALL[self.index()]
    }

    /// Position of a side face in [`Face::SIDES`]; `None` for Up and Down.
    pub fn side_index(self) -> Option<usize> {
        Face::SIDES.iter().position(|&side| side == self)
    }

    /// Rotate the face label a number of quarter turns about the vertical
    /// axis, clockwise seen from above (Front -> Right -> Back -> Left).
    /// Up and Down are fixed.
    pub fn turned_about_vertical(self, quarter_turns: usize) -> Face {
        match self.side_index() {
            Some(i) => Face::SIDES[(i + quarter_turns) % 4],
            None => self,
        }
    }

    /// Side face to the right of this one, looking at it with Up on top.
    pub fn right_neighbor(self) -> Face {
        self.turned_about_vertical(1)
    }

    /// Side face to the left of this one, looking at it with Up on top.
    pub fn left_neighbor(self) -> Face {
        self.turned_about_vertical(3)
    }

    /// Label of this face after the whole cube is turned 180 degrees about
    /// the front-back axis (Up and Down swap, Right and Left swap).
    pub fn flipped_upside_down(self) -> Face {
        match self {
            Face::Up => Face::Down,
            Face::Down => Face::Up,
            Face::Right => Face::Left,
            Face::Left => Face::Right,
            other => other,
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Facelet color. The discriminant is the wire value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Color {
    White = 0,
    Yellow = 1,
    Red = 2,
    Orange = 3,
    Green = 4,
    Blue = 5,
}

impl Color {
    pub const ALL: [Color; 6] = [
        Color::White,
        Color::Yellow,
        Color::Red,
        Color::Orange,
        Color::Green,
        Color::Blue,
    ];

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Color> {
        Color::ALL.get(index as usize).copied()
    }

    /// Single-letter name used by the text rendering
    pub fn letter(self) -> char {
        match self {
            Color::White => 'W',
            Color::Yellow => 'Y',
            Color::Red => 'R',
            Color::Orange => 'O',
            Color::Green => 'G',
            Color::Blue => 'B',
        }
    }

    /// The opposite-face color. The pairing is fixed by the color scheme.
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Yellow,
            Color::Yellow => Color::White,
            Color::Red => Color::Orange,
            Color::Orange => Color::Red,
            Color::Green => Color::Blue,
            Color::Blue => Color::Green,
        }
    }

    /// The face whose center carries this color.
    pub fn home_face(self) -> Face {
        Face::ALL[self as usize]
    }
}

/// Flat facelet index for a face, row and column.
pub fn facelet_index(face: Face, row: usize, col: usize) -> usize {
    face.index() * 9 + row * 3 + col
}

/// Face owning a flat facelet index.
pub fn face_of(index: usize) -> Face {
    Face::ALL[index / 9]
}

/// A full cube state.
///
/// `CubeState` is a plain `Copy` value: whoever holds it owns it, and the
/// engine produces new values rather than mutating shared ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "FaceMap", into = "FaceMap")]
pub struct CubeState {
    facelets: [Color; FACELET_COUNT],
}

impl CubeState {
    /// The unique solved configuration.
    pub fn solved() -> Self {
        let mut facelets = [Color::White; FACELET_COUNT];
        for (i, facelet) in facelets.iter_mut().enumerate() {
            *facelet = face_of(i).solved_color();
        }
        Self { facelets }
    }

    /// Build a state from raw facelets, checking color balance and centers.
    ///
    /// Group membership is a separate, stronger check; see
    /// [`crate::pieces::validate_legal`].
    pub fn from_facelets(facelets: [Color; FACELET_COUNT]) -> Result<Self> {
        let state = Self { facelets };
        for face in Face::ALL {
            if state.center(face) != face.solved_color() {
                return Err(CubeError::malformed(format!(
                    "center of face {} is {:?}, expected {:?}",
                    face,
                    state.center(face),
                    face.solved_color()
                )));
            }
        }
        let counts = state.color_counts();
        if let Some(color) = Color::ALL.iter().find(|c| counts[c.index() as usize] != 9) {
            return Err(CubeError::malformed(format!(
                "color {:?} appears {} times, expected 9",
                color,
                counts[color.index() as usize]
            )));
        }
        Ok(state)
    }

    /// Engine-internal constructor for states produced by permuting a
    /// valid state.
    pub(crate) fn from_facelets_unchecked(facelets: [Color; FACELET_COUNT]) -> Self {
        Self { facelets }
    }

    pub fn facelets(&self) -> &[Color; FACELET_COUNT] {
        &self.facelets
    }

    /// Color at a flat facelet index.
    pub fn color_at(&self, index: usize) -> Color {
        self.facelets[index]
    }

    /// The nine facelets of one face, row-major.
    pub fn face(&self, face: Face) -> &[Color] {
        let start = face.index() * 9;
        &self.facelets[start..start + 9]
    }

    pub fn center(&self, face: Face) -> Color {
        self.facelets[facelet_index(face, 1, 1)]
    }

    /// True when all nine facelets equal this face's center.
    pub fn is_face_solved(&self, face: Face) -> bool {
        let center = self.center(face);
        self.face(face).iter().all(|&c| c == center)
    }

    /// True only when every face matches its own center.
    pub fn is_solved(&self) -> bool {
        Face::ALL.iter().all(|&face| self.is_face_solved(face))
    }

    /// Faces that currently match their centers.
    pub fn solved_faces(&self) -> Vec<Face> {
        Face::ALL
            .iter()
            .copied()
            .filter(|&face| self.is_face_solved(face))
            .collect()
    }

    /// How many facelets carry each color, indexed by color value.
    pub fn color_counts(&self) -> [usize; 6] {
        let mut counts = [0; 6];
        for color in &self.facelets {
            counts[color.index() as usize] += 1;
        }
        counts
    }

    /// Every color appears exactly nine times.
    pub fn has_color_balance(&self) -> bool {
        self.color_counts().iter().all(|&n| n == 9)
    }

    /// 54 digits, faces in U D F B R L order.
    pub fn to_state_string(&self) -> String {
        self.facelets
            .iter()
            .map(|c| char::from(b'0' + c.index()))
            .collect()
    }

    /// Inverse of [`CubeState::to_state_string`].
    pub fn from_state_string(encoded: &str) -> Result<Self> {
        let digits: Vec<char> = encoded.trim().chars().collect();
        if digits.len() != FACELET_COUNT {
            return Err(CubeError::malformed(format!(
                "state string has {} facelets, expected {}",
                digits.len(),
                FACELET_COUNT
            )));
        }
        let mut facelets = [Color::White; FACELET_COUNT];
        for (slot, digit) in facelets.iter_mut().zip(digits) {
            *slot = digit
                .to_digit(10)
                .and_then(|d| Color::from_index(d as u8))
                .ok_or_else(|| CubeError::malformed(format!("invalid color digit {:?}", digit)))?;
        }
        Self::from_facelets(facelets)
    }

    fn write_row(&self, f: &mut fmt::Formatter<'_>, face: Face, row: usize) -> fmt::Result {
        let cells = &self.face(face)[row * 3..row * 3 + 3];
        write!(
            f,
            "{} {} {}",
            cells[0].letter(),
            cells[1].letter(),
            cells[2].letter()
        )
    }
}

impl Default for CubeState {
    fn default() -> Self {
        Self::solved()
    }
}

/// Unfolded net: Up on top, Left Front Right Back across, Down below.
impl fmt::Display for CubeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..3 {
            write!(f, "      ")?;
            self.write_row(f, Face::Up, row)?;
            writeln!(f)?;
        }
        for row in 0..3 {
            for (i, face) in [Face::Left, Face::Front, Face::Right, Face::Back]
                .into_iter()
                .enumerate()
            {
                if i > 0 {
                    write!(f, " ")?;
                }
                self.write_row(f, face, row)?;
            }
            writeln!(f)?;
        }
        for row in 0..3 {
            write!(f, "      ")?;
            self.write_row(f, Face::Down, row)?;
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Wire form of a state: face letter -> nine color values.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct FaceMap {
    #[serde(rename = "U")]
    up: Vec<u8>,
    #[serde(rename = "D")]
    down: Vec<u8>,
    #[serde(rename = "F")]
    front: Vec<u8>,
    #[serde(rename = "B")]
    back: Vec<u8>,
    #[serde(rename = "R")]
    right: Vec<u8>,
    #[serde(rename = "L")]
    left: Vec<u8>,
}

impl FaceMap {
    fn get(&self, face: Face) -> &[u8] {
        match face {
            Face::Up => &self.up,
            Face::Down => &self.down,
            Face::Front => &self.front,
            Face::Back => &self.back,
            Face::Right => &self.right,
            Face::Left => &self.left,
        }
    }
}

impl TryFrom<FaceMap> for CubeState {
    type Error = CubeError;

    fn try_from(map: FaceMap) -> Result<Self> {
        let mut facelets = [Color::White; FACELET_COUNT];
        for face in Face::ALL {
            let values = map.get(face);
            if values.len() != 9 {
                return Err(CubeError::malformed(format!(
                    "face {} has {} facelets, expected 9",
                    face,
                    values.len()
                )));
            }
            for (i, &value) in values.iter().enumerate() {
                facelets[facelet_index(face, i / 3, i % 3)] =
                    Color::from_index(value).ok_or_else(|| {
                        CubeError::malformed(format!("face {} has invalid color {}", face, value))
                    })?;
            }
        }
        CubeState::from_facelets(facelets)
    }
}

impl From<CubeState> for FaceMap {
    fn from(state: CubeState) -> Self {
        let values = |face: Face| -> Vec<u8> { state.face(face).iter().map(|c| c.index()).collect() };
        FaceMap {
            up: values(Face::Up),
            down: values(Face::Down),
            front: values(Face::Front),
            back: values(Face::Back),
            right: values(Face::Right),
            left: values(Face::Left),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solved_state_colors() {
        let state = CubeState::solved();
        assert!(state.is_solved());
        for (face, expected) in Face::ALL.iter().zip(0u8..) {
            assert!(state.face(*face).iter().all(|c| c.index() == expected));
        }
        assert!(state.has_color_balance());
    }

    #[test]
    fn test_opposite_pairs() {
        assert_eq!(Color::White.opposite(), Color::Yellow);
        assert_eq!(Color::Red.opposite(), Color::Orange);
        assert_eq!(Color::Green.opposite(), Color::Blue);
        for face in Face::ALL {
            assert_eq!(face.solved_color().opposite(), face.opposite().solved_color());
            assert_eq!(face.solved_color().home_face(), face);
        }
    }

    #[test]
    fn test_face_neighbors() {
        assert_eq!(Face::Front.right_neighbor(), Face::Right);
        assert_eq!(Face::Right.right_neighbor(), Face::Back);
        assert_eq!(Face::Front.left_neighbor(), Face::Left);
        assert_eq!(Face::Up.turned_about_vertical(1), Face::Up);
        assert_eq!(Face::Right.flipped_upside_down(), Face::Left);
        assert_eq!(Face::Front.flipped_upside_down(), Face::Front);
    }

    #[test]
    fn test_uniform_wrong_face_is_not_solved() {
        // Swap the whole Front and Back faces except their centers: every
        // face is uniform apart from the center, but two faces are wrong.
        let mut facelets = *CubeState::solved().facelets();
        for i in 0..9 {
            if i == CENTER {
                continue;
            }
            facelets.swap(facelet_index(Face::Front, i / 3, i % 3), facelet_index(Face::Back, i / 3, i % 3));
        }
        let state = CubeState::from_facelets(facelets).unwrap();
        assert!(!state.is_solved());
        assert!(!state.is_face_solved(Face::Front));
        assert!(state.is_face_solved(Face::Up));
        assert_eq!(state.solved_faces(), vec![Face::Up, Face::Down, Face::Right, Face::Left]);
    }

    #[test]
    fn test_from_facelets_rejects_moved_center() {
        let mut facelets = *CubeState::solved().facelets();
        facelets.swap(facelet_index(Face::Up, 1, 1), facelet_index(Face::Down, 1, 1));
        let err = CubeState::from_facelets(facelets).unwrap_err();
        assert!(matches!(err, CubeError::MalformedState { .. }));
    }

    #[test]
    fn test_from_facelets_rejects_color_imbalance() {
        let mut facelets = *CubeState::solved().facelets();
        facelets[0] = Color::Red;
        assert!(CubeState::from_facelets(facelets).is_err());
    }

    #[test]
    fn test_state_string() {
        let state = CubeState::solved();
        let encoded = state.to_state_string();
        assert_eq!(&encoded[..9], "000000000");
        assert_eq!(&encoded[45..], "555555555");
        assert_eq!(CubeState::from_state_string(&encoded).unwrap(), state);
        assert!(CubeState::from_state_string("0123").is_err());
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(CubeState::solved()).unwrap();
        assert_eq!(json["U"], serde_json::json!([0, 0, 0, 0, 0, 0, 0, 0, 0]));
        assert_eq!(json["L"], serde_json::json!([5, 5, 5, 5, 5, 5, 5, 5, 5]));

        let parsed: CubeState = serde_json::from_value(json).unwrap();
        assert!(parsed.is_solved());
    }

    #[test]
    fn test_json_rejects_bad_values() {
        let mut json = serde_json::to_value(CubeState::solved()).unwrap();
        json["F"] = serde_json::json!([2, 2, 2, 2, 9, 2, 2, 2, 2]);
        assert!(serde_json::from_value::<CubeState>(json.clone()).is_err());

        json["F"] = serde_json::json!([2, 2, 2]);
        assert!(serde_json::from_value::<CubeState>(json).is_err());
    }

    #[test]
    fn test_display_net() {
        let rendered = CubeState::solved().to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "      W W W");
        assert_eq!(lines[3], "B B B R R R G G G O O O");
        assert_eq!(lines[8], "      Y Y Y");
    }
}
