//! Solver: the orchestrator tying together the Grid Analyzer, Constraint
//! Builder, Domain Initializer, AC-3, Backtracking Search, and Solution
//! Reporter into the single entry point described in the system overview.
//! Performs no solving logic of its own.

use std::sync::atomic::{AtomicBool, Ordering};

#[cfg(feature = "serde")]
use serde_derive::{Deserialize, Serialize};

use crate::arc_consistency;
use crate::backtracking_search::{self, SearchOutcome, Statistics};
use crate::constraints::Constraints;
use crate::domain::{self, Domains};
use crate::error::SolveError;
use crate::grid::Grid;
use crate::report::{self, Solution};
use crate::slots::{self, Slot};
use crate::util::{CancellationToken, NullObserver, ProgressObserver, SolverState};
use crate::word_list::WordList;

/// Tunable parameters for a single `solve()` call.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolveConfig {
    /// Stop search after collecting this many complete assignments.
    pub max_solutions: u32,
    /// Seed for the search's `SmallRng`; `None` draws from OS randomness.
    pub rng_seed: Option<u64>,
    /// Invoke the progress observer's `on_recursive_call` every K calls.
    /// `None` disables the periodic callback entirely.
    pub yield_every: Option<u64>,
    #[cfg_attr(feature = "serde", serde(skip, default = "CancellationToken::new"))]
    pub cancel: CancellationToken,
}

impl Default for SolveConfig {
    fn default() -> SolveConfig {
        SolveConfig {
            max_solutions: 1,
            rng_seed: None,
            yield_every: None,
            cancel: CancellationToken::new(),
        }
    }
}

impl Clone for SolveConfig {
    fn clone(&self) -> SolveConfig {
        SolveConfig {
            max_solutions: self.max_solutions,
            rng_seed: self.rng_seed,
            yield_every: self.yield_every,
            cancel: self.cancel.clone(),
        }
    }
}

/// Everything a successful solve reports back: the primary solution, any
/// additional solutions collected up to `max_solutions`, and search
/// statistics.
#[derive(Debug, Clone)]
pub struct SolveResult {
    pub solution: Solution,
    pub additional_solutions: Vec<Solution>,
    pub statistics: Statistics,
}

/// A single-use-at-a-time solver over a shared, read-only `WordList`. The
/// same dictionary can back many `Solver` instances, or be reused across
/// repeated solves on one instance.
pub struct Solver {
    word_list: WordList,
    busy: AtomicBool,
}

impl Solver {
    #[must_use]
    pub fn new(word_list: WordList) -> Solver {
        Solver {
            word_list,
            busy: AtomicBool::new(false),
        }
    }

    /// Run the full pipeline against `grid` using the default, silent
    /// progress observer.
    ///
    /// # Errors
    /// See `solve_with_observer`.
    pub fn solve(&self, grid: &Grid, config: &SolveConfig) -> Result<SolveResult, SolveError> {
        self.solve_with_observer(grid, config, &NullObserver)
    }

    /// Run the full pipeline against `grid`, reporting state-machine
    /// transitions and periodic recursive-call counts to `observer`.
    ///
    /// # Errors
    /// - `Busy` if another solve is already in progress on this instance.
    /// - `InvalidGrid` / `NoSlots` if the grid can't be analyzed into at
    ///   least one slot.
    /// - `Cancelled` if `config.cancel` was observed mid-solve.
    /// - `NoSolution` if backtracking search exhausts the space.
    pub fn solve_with_observer(
        &self,
        grid: &Grid,
        config: &SolveConfig,
        observer: &dyn ProgressObserver,
    ) -> Result<SolveResult, SolveError> {
        if self.busy.swap(true, Ordering::SeqCst) {
            return Err(SolveError::Busy);
        }
        let result = self.solve_inner(grid, config, observer);
        self.busy.store(false, Ordering::SeqCst);
        result
    }

    fn solve_inner(
        &self,
        grid: &Grid,
        config: &SolveConfig,
        observer: &dyn ProgressObserver,
    ) -> Result<SolveResult, SolveError> {
        observer.on_state_change(SolverState::Unstarted);
        log::debug!("starting solve");

        let analyzed = slots::analyze(grid)?;
        if analyzed.slots.is_empty() {
            observer.on_state_change(SolverState::InvalidInput);
            return Err(SolveError::NoSlots);
        }
        observer.on_state_change(SolverState::SlotsBuilt);

        let constraints = Constraints::build(&analyzed.slots);
        observer.on_state_change(SolverState::ConstraintsBuilt);

        let mut domains: Domains =
            domain::initialize(&analyzed.slots, &analyzed.prefilled, &self.word_list);
        #[cfg(feature = "check_invariants")]
        domain::check_invariants(&analyzed.slots, &analyzed.prefilled, &domains, &self.word_list);
        observer.on_state_change(SolverState::DomainsInitialized);

        match arc_consistency::establish(
            &analyzed.slots,
            &constraints,
            &self.word_list,
            &mut domains,
            &config.cancel,
        ) {
            Ok(_consistent) => {}
            Err(err) => {
                observer.on_state_change(SolverState::InvalidInput);
                return Err(err);
            }
        }
        observer.on_state_change(SolverState::Ac3Done);

        observer.on_state_change(SolverState::Searching);
        let (outcome, statistics) = backtracking_search::search(
            &analyzed.slots,
            &constraints,
            &self.word_list,
            &mut domains,
            config,
            &config.cancel,
            observer,
        );

        match outcome {
            SearchOutcome::Cancelled => {
                observer.on_state_change(SolverState::InvalidInput);
                Err(SolveError::Cancelled)
            }
            SearchOutcome::NoSolution => {
                observer.on_state_change(SolverState::NoSolution);
                Err(SolveError::NoSolution)
            }
            SearchOutcome::Solved(assignments) => {
                observer.on_state_change(SolverState::Solved);
                let mut reports = assignments
                    .iter()
                    .map(|assignment| {
                        report::build(grid, &analyzed.slots, &self.word_list, assignment)
                    })
                    .collect::<Vec<_>>();
                let solution = reports.remove(0);
                Ok(SolveResult {
                    solution,
                    additional_solutions: reports,
                    statistics,
                })
            }
        }
    }

    #[must_use]
    pub fn word_list(&self) -> &WordList {
        &self.word_list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_1_smoke_end_to_end() {
        let grid = Grid::parse("1 . .\n. # .\n. . #").unwrap();
        let word_list = WordList::from_words(["CAT", "CAR", "TAR", "TAB", "COT"]);
        let solver = Solver::new(word_list);
        let config = SolveConfig::default();
        let result = solver.solve(&grid, &config).unwrap();
        assert_eq!(result.solution.across.len(), 1);
        assert_eq!(result.solution.down.len(), 1);
    }

    #[test]
    fn reports_no_slots_for_an_all_block_grid() {
        let grid = Grid::parse("# #\n# #").unwrap();
        let word_list = WordList::from_words(["CAT"]);
        let solver = Solver::new(word_list);
        let config = SolveConfig::default();
        let err = solver.solve(&grid, &config).unwrap_err();
        assert!(matches!(err, SolveError::NoSlots));
    }

    #[test]
    fn reports_no_solution_when_dictionary_is_insufficient() {
        let grid = Grid::parse("1 . .\n. # .\n. . #").unwrap();
        let word_list = WordList::from_words(["ZZ"]); // no 3-letter words at all
        let solver = Solver::new(word_list);
        let config = SolveConfig::default();
        let err = solver.solve(&grid, &config).unwrap_err();
        assert!(matches!(err, SolveError::NoSolution));
    }

    #[test]
    fn rejects_concurrent_solves_with_busy() {
        use std::sync::atomic::Ordering as O;
        let grid = Grid::parse("1 . .\n. # .\n. . #").unwrap();
        let word_list = WordList::from_words(["CAT", "CAR"]);
        let solver = Solver::new(word_list);
        solver.busy.store(true, O::SeqCst);
        let config = SolveConfig::default();
        let err = solver.solve(&grid, &config).unwrap_err();
        assert!(matches!(err, SolveError::Busy));
    }

    #[test]
    fn honors_cancellation() {
        let grid = Grid::parse("1 . .\n. # .\n. . #").unwrap();
        let word_list = WordList::from_words(["CAT", "CAR"]);
        let solver = Solver::new(word_list);
        let mut config = SolveConfig::default();
        config.cancel.cancel();
        let err = solver.solve(&grid, &config).unwrap_err();
        assert!(matches!(err, SolveError::Cancelled));
    }
}
