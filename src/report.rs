//! Solution Reporter: projects a completed assignment back onto the grid
//! and produces the per-direction clue/word listing.

use crate::backtracking_search::Assignment;
use crate::grid::{Cell, Grid};
use crate::slots::Slot;
use crate::types::{char_of, Position};
use crate::word_list::WordList;

#[cfg(feature = "serde")]
use serde_derive::{Deserialize, Serialize};

/// One filled slot in the final report: its clue number, direction, and
/// the word placed into it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FilledSlot {
    pub number: u32,
    pub name: String,
    pub word: String,
}

/// The fully solved grid: a letter at every non-block cell, plus the
/// across and down word lists sorted by clue number.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Solution {
    pub rows: usize,
    pub cols: usize,
    /// Row-major letters; `None` at block cells.
    pub letters: Vec<Option<char>>,
    pub across: Vec<FilledSlot>,
    pub down: Vec<FilledSlot>,
}

impl Solution {
    #[must_use]
    pub fn letter_at(&self, pos: Position) -> Option<char> {
        self.letters.get(pos.row * self.cols + pos.col).copied().flatten()
    }
}

/// Build the final report from a completed assignment.
///
/// # Panics
/// Panics if `assignment` contains an unassigned slot; callers only invoke
/// this once backtracking search has reported `Solved`.
#[must_use]
pub fn build(grid: &Grid, slots: &[Slot], word_list: &WordList, assignment: &Assignment) -> Solution {
    let mut letters: Vec<Option<char>> = grid
        .iter_cells()
        .map(|(_, cell)| match cell {
            Cell::Block => None,
            Cell::Letter(g) => Some(char_of(g)),
            Cell::Number(_) | Cell::Empty => Some('?'),
        })
        .collect();

    let mut across = Vec::new();
    let mut down = Vec::new();

    for (slot_id, slot) in slots.iter().enumerate() {
        let word_id = assignment[slot_id].expect("every slot assigned in a solved grid");
        let word = word_list.word(slot.len(), word_id);

        for (idx, &pos) in slot.positions.iter().enumerate() {
            let ch = word.text.chars().nth(idx).expect("word length matches slot length");
            letters[pos.row * grid.cols() + pos.col] = Some(ch);
        }

        let filled = FilledSlot {
            number: slot.number,
            name: slot.name.clone(),
            word: word.text.clone(),
        };
        match slot.direction {
            crate::types::Direction::Across => across.push(filled),
            crate::types::Direction::Down => down.push(filled),
        }
    }

    across.sort_by_key(|s| s.number);
    down.sort_by_key(|s| s.number);

    Solution {
        rows: grid.rows(),
        cols: grid.cols(),
        letters,
        across,
        down,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::Constraints;
    use crate::domain;
    use crate::slots::analyze;

    #[test]
    fn projects_assignment_onto_the_grid() {
        let grid = Grid::parse("1 . .\n. # .\n. . #").unwrap();
        let analyzed = analyze(&grid).unwrap();
        let word_list = WordList::from_words(["CAT", "CAR"]);
        let _ = Constraints::build(&analyzed.slots);
        let _ = domain::initialize(&analyzed.slots, &analyzed.prefilled, &word_list);

        let across_idx = analyzed.slots.iter().position(|s| s.name == "1ACROSS").unwrap();
        let down_idx = analyzed.slots.iter().position(|s| s.name == "1DOWN").unwrap();

        let cat_id = word_list
            .words_of_length(3)
            .iter()
            .position(|w| w.text == "CAT")
            .unwrap();
        let car_id = word_list
            .words_of_length(3)
            .iter()
            .position(|w| w.text == "CAR")
            .unwrap();

        let mut assignment: Assignment = vec![None; analyzed.slots.len()];
        assignment[across_idx] = Some(cat_id);
        assignment[down_idx] = Some(car_id);

        let solution = build(&grid, &analyzed.slots, &word_list, &assignment);
        assert_eq!(solution.letter_at(Position::new(0, 0)), Some('C'));
        assert_eq!(solution.letter_at(Position::new(0, 1)), Some('A'));
        assert_eq!(solution.letter_at(Position::new(0, 2)), Some('T'));
        assert_eq!(solution.letter_at(Position::new(1, 0)), Some('A'));
        assert_eq!(solution.letter_at(Position::new(2, 0)), Some('R'));
        assert_eq!(solution.letter_at(Position::new(1, 1)), None);

        assert_eq!(solution.across.len(), 1);
        assert_eq!(solution.across[0].word, "CAT");
        assert_eq!(solution.down.len(), 1);
        assert_eq!(solution.down[0].word, "CAR");
    }
}
