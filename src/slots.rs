//! Grid Analyzer: scans the grid to discover slots (across/down) and
//! pre-filled letters. This is the "Grid Analyzer" component from the
//! system overview.

use std::collections::HashMap;

use crate::error::SolveError;
use crate::grid::{Cell, Grid};
use crate::types::{Direction, Position};

/// A named, ordered sequence of cell positions.
#[derive(Debug, Clone)]
pub struct Slot {
    /// `"<number><ACROSS|DOWN>"`, unique among all emitted slots.
    pub name: String,
    pub number: u32,
    pub direction: Direction,
    pub positions: Vec<Position>,
}

impl Slot {
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Output of the Grid Analyzer: the finalized, dense slot array (index =
/// `SlotId`) and the map of fixed letters keyed by grid position.
#[derive(Debug, Clone)]
pub struct AnalyzedGrid {
    pub slots: Vec<Slot>,
    pub prefilled: HashMap<Position, u8>,
}

/// Run the Grid Analyzer over `grid`.
///
/// # Errors
/// Empty/non-rectangular grids are already rejected by
/// `Grid::parse`/`Grid::from_cells`. Duplicate or non-monotonic numbering
/// is a soft invariant: this function only logs a warning for it and
/// otherwise proceeds, treating the numbers purely as identifiers.
pub fn analyze(grid: &Grid) -> Result<AnalyzedGrid, SolveError> {
    let mut slots = Vec::new();
    let mut prefilled = HashMap::new();
    let mut seen_numbers: HashMap<u32, Position> = HashMap::new();
    let mut last_number = 0u32;

    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let pos = Position::new(row, col);
            match grid.get(pos).expect("position within bounds") {
                Cell::Letter(glyph) => {
                    prefilled.insert(pos, glyph);
                }
                Cell::Number(n) => {
                    if let Some(prior) = seen_numbers.insert(n, pos) {
                        log::warn!(
                            "grid number {n} appears more than once ({prior} and {pos}); numbers are used only as identifiers, so this is accepted"
                        );
                    }
                    if n < last_number {
                        log::warn!(
                            "grid number {n} at {pos} is out of row-major reading order (saw {last_number} earlier); accepted, renumbering is the editor's responsibility"
                        );
                    }
                    last_number = last_number.max(n);

                    if opens_across(grid, pos) {
                        if let Some(positions) = collect_across(grid, pos) {
                            slots.push(Slot {
                                name: format!("{n}ACROSS"),
                                number: n,
                                direction: Direction::Across,
                                positions,
                            });
                        }
                    }
                    if opens_down(grid, pos) {
                        if let Some(positions) = collect_down(grid, pos) {
                            slots.push(Slot {
                                name: format!("{n}DOWN"),
                                number: n,
                                direction: Direction::Down,
                                positions,
                            });
                        }
                    }
                }
                Cell::Empty | Cell::Block => {}
            }
        }
    }

    Ok(AnalyzedGrid { slots, prefilled })
}

fn opens_across(grid: &Grid, pos: Position) -> bool {
    pos.col == 0
        || matches!(
            grid.get(Position::new(pos.row, pos.col - 1)),
            Some(Cell::Block)
        )
}

fn opens_down(grid: &Grid, pos: Position) -> bool {
    pos.row == 0
        || matches!(
            grid.get(Position::new(pos.row - 1, pos.col)),
            Some(Cell::Block)
        )
}

fn collect_across(grid: &Grid, start: Position) -> Option<Vec<Position>> {
    let mut positions = Vec::new();
    let mut col = start.col;
    loop {
        let pos = Position::new(start.row, col);
        match grid.get(pos) {
            Some(cell) if cell.is_letter_cell() => positions.push(pos),
            _ => break,
        }
        col += 1;
    }
    if positions.len() >= 2 {
        Some(positions)
    } else {
        None
    }
}

fn collect_down(grid: &Grid, start: Position) -> Option<Vec<Position>> {
    let mut positions = Vec::new();
    let mut row = start.row;
    loop {
        let pos = Position::new(row, start.col);
        match grid.get(pos) {
            Some(cell) if cell.is_letter_cell() => positions.push(pos),
            _ => break,
        }
        row += 1;
    }
    if positions.len() >= 2 {
        Some(positions)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    #[test]
    fn scenario_1_smoke() {
        // 3x3 grid: [['1','.','.'],['.','#','.'],['.','.','#']]
        let grid = Grid::parse("1 . .\n. # .\n. . #").unwrap();
        let analyzed = analyze(&grid).unwrap();
        let names: Vec<&str> = analyzed.slots.iter().map(|s| s.name.as_str()).collect();
        assert!(names.contains(&"1ACROSS"));
        assert!(names.contains(&"1DOWN"));

        let across = analyzed
            .slots
            .iter()
            .find(|s| s.name == "1ACROSS")
            .unwrap();
        assert_eq!(
            across.positions,
            vec![
                Position::new(0, 0),
                Position::new(0, 1),
                Position::new(0, 2)
            ]
        );

        let down = analyzed.slots.iter().find(|s| s.name == "1DOWN").unwrap();
        assert_eq!(
            down.positions,
            vec![
                Position::new(0, 0),
                Position::new(1, 0),
                Position::new(2, 0)
            ]
        );
    }

    #[test]
    fn all_block_grid_yields_no_slots() {
        let grid = Grid::parse("# #\n# #").unwrap();
        let analyzed = analyze(&grid).unwrap();
        assert!(analyzed.slots.is_empty());
    }

    #[test]
    fn length_one_slots_are_discarded() {
        // A number at the bottom-right corner opens neither a 2+ across nor down slot.
        let grid = Grid::parse("# 1\n# #").unwrap();
        let analyzed = analyze(&grid).unwrap();
        assert!(analyzed.slots.is_empty());
    }

    #[test]
    fn prefilled_letters_are_recorded() {
        let grid = Grid::parse("1 A .\n. # .\n. . #").unwrap();
        let analyzed = analyze(&grid).unwrap();
        assert_eq!(analyzed.prefilled.get(&Position::new(0, 1)), Some(&0));
    }
}
