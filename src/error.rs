//! Error kinds returned by the solver. All are typed results, never panics
//! or other nonlocal control flow (see "Error Handling Design").

/// Errors that can surface from any stage of the solve pipeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SolveError {
    /// The grid matrix is non-rectangular, empty, or contains a cell value
    /// outside the allowed tags.
    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    /// A dictionary candidate contained non-A-Z characters, or was empty.
    #[error("invalid dictionary entry: {0}")]
    InvalidDictionary(String),

    /// The grid is valid but yields zero slots of length >= 2.
    #[error("grid has no slots of length >= 2")]
    NoSlots,

    /// Backtracking search exhausted the space without a complete
    /// assignment.
    #[error("no solution exists for this grid and dictionary")]
    NoSolution,

    /// Cooperative cancellation was observed during the solve.
    #[error("solve was cancelled")]
    Cancelled,

    /// A solve is already in progress on this `Solver` instance.
    #[error("a solve is already in progress on this solver instance")]
    Busy,
}
