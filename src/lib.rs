#![warn(clippy::pedantic)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::comparison_chain)]
#![allow(clippy::implicit_hasher)]
#![allow(clippy::match_on_vec_items)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod arc_consistency;
pub mod backtracking_search;
pub mod constraints;
pub mod domain;
pub mod error;
pub mod grid;
pub mod report;
pub mod slots;
pub mod solver;
pub mod types;
pub mod util;
pub mod word_list;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use error::SolveError;
pub use solver::{SolveConfig, SolveResult, Solver};

/// The maximum number of rows or columns a grid may have. `Grid::from_cells`
/// (and therefore `Grid::parse`) rejects any larger grid with `InvalidGrid`,
/// since every slot length derives from a grid dimension and is expected
/// to fit in a `u8` overlap index elsewhere in the crate.
pub const MAX_SLOT_LENGTH: usize = 21;
