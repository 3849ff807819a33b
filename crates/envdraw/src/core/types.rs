//! Core type definitions shared by the renderers
//!
//! Output character sets and the four compass headings an orthogonal route
//! segment can take.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Point;

/// Character set for text previews
///
/// Controls which characters are used for drawing frames and connectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterSet {
    /// Pure ASCII characters only: < > ^ v - | +
    /// Maximum compatibility but limited visual quality
    Ascii,
    /// Unicode box-drawing characters: ┌ ┐ └ ┘ ─ │ ╔ ═
    #[default]
    Unicode,
}

impl CharacterSet {
    /// Returns true if this character set uses only ASCII
    pub fn is_ascii(&self) -> bool {
        matches!(self, CharacterSet::Ascii)
    }
}

impl fmt::Display for CharacterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharacterSet::Ascii => write!(f, "ascii"),
            CharacterSet::Unicode => write!(f, "unicode"),
        }
    }
}

impl FromStr for CharacterSet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ascii" => Ok(CharacterSet::Ascii),
            "unicode" => Ok(CharacterSet::Unicode),
            _ => Err(format!(
                "Invalid character set: '{}'. Valid options: ascii, unicode",
                s
            )),
        }
    }
}

/// Direction of travel along an orthogonal segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
}

impl Heading {
    /// Heading from `from` to `to`, `None` for diagonal or zero-length moves
    pub fn between(from: Point, to: Point) -> Option<Self> {
        match (to.x - from.x, to.y - from.y) {
            (0, 0) => None,
            (0, dy) if dy < 0 => Some(Heading::Up),
            (0, _) => Some(Heading::Down),
            (dx, 0) if dx < 0 => Some(Heading::Left),
            (_, 0) => Some(Heading::Right),
            _ => None,
        }
    }

    /// Unit offset in canvas coordinates (y grows downwards)
    pub fn delta(self) -> (i32, i32) {
        match self {
            Heading::Up => (0, -1),
            Heading::Down => (0, 1),
            Heading::Left => (-1, 0),
            Heading::Right => (1, 0),
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Heading::Up | Heading::Down)
    }

    pub fn is_horizontal(self) -> bool {
        !self.is_vertical()
    }

    pub fn opposite(self) -> Self {
        match self {
            Heading::Up => Heading::Down,
            Heading::Down => Heading::Up,
            Heading::Left => Heading::Right,
            Heading::Right => Heading::Left,
        }
    }

    pub const ALL: [Heading; 4] = [Heading::Right, Heading::Down, Heading::Left, Heading::Up];
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Heading::Up => write!(f, "up"),
            Heading::Down => write!(f, "down"),
            Heading::Left => write!(f, "left"),
            Heading::Right => write!(f, "right"),
        }
    }
}
