//! Small value types shared across the solver pipeline: grid positions,
//! slot direction, and the two id types used to index into the dense,
//! finalized slot and word-bucket arrays (see the "dense arrays" design
//! note).

use std::fmt;

#[cfg(feature = "serde")]
use serde_derive::{Deserialize, Serialize};

/// Row/column position within the grid, zero-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    #[must_use]
    pub fn new(row: usize, col: usize) -> Position {
        Position { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Direction a slot runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    Across,
    Down,
}

impl Direction {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Across => "ACROSS",
            Direction::Down => "DOWN",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dense index into the finalized slot array (`Vec<Slot>`). Slots are
/// collected once per solve and never reordered afterward, so a plain
/// `usize` is sufficient; slot *names* are kept alongside for reporting.
pub type SlotId = usize;

/// A dense index into a single length-bucket of the word list, i.e. a
/// candidate word within `WordList::words[length]`. Not comparable across
/// different lengths.
pub type WordId = usize;

/// Convert an uppercase ASCII letter to a 0-25 glyph index (`A` = 0).
#[must_use]
pub fn glyph_of(ch: char) -> Option<u8> {
    if ch.is_ascii_uppercase() {
        Some(ch as u8 - b'A')
    } else {
        None
    }
}

/// Convert a 0-25 glyph index back to its uppercase ASCII letter.
#[must_use]
pub fn char_of(glyph: u8) -> char {
    (b'A' + glyph) as char
}
