//! Grid representation and the textual-encoding boundary parser.
//!
//! The internal representation is the tagged `Cell` enum. `Grid::parse` is
//! the only place that understands the external textual encoding (`#`,
//! `A`-`Z`, decimal numbers, `.`/space); everything downstream works
//! exclusively with `Cell`.

use unicode_normalization::UnicodeNormalization;

use crate::error::SolveError;
use crate::types::{glyph_of, Position};

/// One cell of a crossword grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// Never part of any slot.
    Block,
    /// Marks the start of one or both slots; the cell is also a plain
    /// letter cell (no fixed letter of its own).
    Number(u32),
    /// A fixed letter, `A`-`Z`.
    Letter(u8),
    /// An ordinary letter cell with no constraint.
    Empty,
}

impl Cell {
    /// Is this cell part of some slot (i.e. not a block)?
    #[must_use]
    pub fn is_letter_cell(self) -> bool {
        !matches!(self, Cell::Block)
    }
}

/// A rectangular grid of cells, `rows x cols`.
#[derive(Debug, Clone)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Build a grid directly from a cell matrix. This is the primary
    /// constructor for tests and for callers that already hold parsed
    /// cells rather than the raw textual encoding.
    ///
    /// # Errors
    /// Returns `InvalidGrid` if the matrix is empty, non-rectangular, or
    /// has a row or column count above `crate::MAX_SLOT_LENGTH` (a longer
    /// dimension would let a single slot's positions overflow the bound a
    /// slot length is expected to fit in everywhere else in the crate).
    pub fn from_cells(cells: Vec<Vec<Cell>>) -> Result<Grid, SolveError> {
        if cells.is_empty() || cells[0].is_empty() {
            return Err(SolveError::InvalidGrid("grid is empty".to_string()));
        }
        let cols = cells[0].len();
        if cells.iter().any(|row| row.len() != cols) {
            return Err(SolveError::InvalidGrid(
                "grid rows have differing lengths".to_string(),
            ));
        }
        let rows = cells.len();
        if rows > crate::MAX_SLOT_LENGTH || cols > crate::MAX_SLOT_LENGTH {
            return Err(SolveError::InvalidGrid(format!(
                "grid is {rows}x{cols}, which exceeds the maximum supported dimension of {}",
                crate::MAX_SLOT_LENGTH
            )));
        }
        let flat = cells.into_iter().flatten().collect();
        Ok(Grid {
            rows,
            cols,
            cells: flat,
        })
    }

    /// Parse the external textual encoding: one row per line, cells
    /// separated by whitespace. A cell token is `#` (Block), `.` (Empty),
    /// a single uppercase letter `A`-`Z` (Letter), or a decimal integer
    /// (Number). Lines are NFKD-normalized and trimmed first, so combining
    /// marks pasted in around a prefilled letter don't block a match
    /// against a plain dictionary entry.
    ///
    /// # Errors
    /// Returns `InvalidGrid` if the text is empty, rows disagree on column
    /// count, or a token isn't one of the four recognized forms.
    pub fn parse(text: &str) -> Result<Grid, SolveError> {
        let normalized: String = text.nfkd().collect();
        let lines: Vec<&str> = normalized
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if lines.is_empty() {
            return Err(SolveError::InvalidGrid("grid text is empty".to_string()));
        }

        let mut rows: Vec<Vec<Cell>> = Vec::with_capacity(lines.len());
        let mut ncols = None;
        for line in lines {
            let mut row = Vec::new();
            for token in line.split_whitespace() {
                row.push(parse_token(token)?);
            }
            match ncols {
                None => ncols = Some(row.len()),
                Some(n) if n != row.len() => {
                    return Err(SolveError::InvalidGrid(
                        "grid rows have differing lengths".to_string(),
                    ));
                }
                Some(_) => {}
            }
            rows.push(row);
        }
        Grid::from_cells(rows)
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn get(&self, pos: Position) -> Option<Cell> {
        if pos.row >= self.rows || pos.col >= self.cols {
            return None;
        }
        Some(self.cells[pos.row * self.cols + pos.col])
    }

    /// Iterate over every cell with its position, in row-major order.
    pub fn iter_cells(&self) -> impl Iterator<Item = (Position, Cell)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, &cell)| (Position::new(idx / cols, idx % cols), cell))
    }
}

fn parse_token(token: &str) -> Result<Cell, SolveError> {
    match token {
        "#" => Ok(Cell::Block),
        "." => Ok(Cell::Empty),
        _ => {
            if let Ok(n) = token.parse::<u32>() {
                if n == 0 {
                    return Err(SolveError::InvalidGrid(
                        "numbered cells must use positive integers".to_string(),
                    ));
                }
                Ok(Cell::Number(n))
            } else if token.chars().count() == 1 {
                let ch = token.chars().next().unwrap();
                glyph_of(ch)
                    .map(Cell::Letter)
                    .ok_or_else(|| SolveError::InvalidGrid(format!("invalid grid token {token:?}")))
            } else {
                Err(SolveError::InvalidGrid(format!(
                    "invalid grid token {token:?}"
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_basic_grid() {
        let grid = Grid::parse(
            "1 . .
             . # .
             . . #",
        )
        .unwrap();
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.get(Position::new(0, 0)), Some(Cell::Number(1)));
        assert_eq!(grid.get(Position::new(1, 1)), Some(Cell::Block));
        assert_eq!(grid.get(Position::new(2, 2)), Some(Cell::Block));
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = Grid::parse("1 . .\n. #").unwrap_err();
        assert!(matches!(err, SolveError::InvalidGrid(_)));
    }

    #[test]
    fn rejects_empty_text() {
        let err = Grid::parse("   \n  ").unwrap_err();
        assert!(matches!(err, SolveError::InvalidGrid(_)));
    }

    #[test]
    fn from_cells_rejects_empty_matrix() {
        let err = Grid::from_cells(vec![]).unwrap_err();
        assert!(matches!(err, SolveError::InvalidGrid(_)));
    }

    #[test]
    fn rejects_grids_above_the_maximum_dimension() {
        let too_wide = vec![vec![Cell::Empty; crate::MAX_SLOT_LENGTH + 1]; 2];
        let err = Grid::from_cells(too_wide).unwrap_err();
        assert!(matches!(err, SolveError::InvalidGrid(_)));
    }

    #[test]
    fn parses_prefilled_letters() {
        let grid = Grid::parse("1 A .\n. # .\n. . #").unwrap();
        assert_eq!(grid.get(Position::new(0, 1)), Some(Cell::Letter(0)));
    }
}
