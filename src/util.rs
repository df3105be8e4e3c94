//! Ambient plumbing shared by the orchestrator and the search: cooperative
//! cancellation, the progress/telemetry hook, and RNG construction. None of
//! this carries CSP logic; see `arc_consistency` and `backtracking_search`
//! for that.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::SeedableRng;

/// A shared, cloneable cancellation flag. The solver checks this at each
/// recursion entry and at each AC-3 dequeue, so a request lands within one
/// of those steps rather than waiting for the whole solve to finish.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    #[must_use]
    pub fn new() -> CancellationToken {
        CancellationToken(Arc::new(AtomicBool::new(false)))
    }

    /// Request cancellation. Safe to call from any thread; the solver only
    /// observes this cooperatively at its own checkpoints.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// States in the solver's linear state machine (see "Backtracking Search /
/// State-machine summary"). Exposed for progress observers and logging;
/// not returned as part of `SolveResult`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverState {
    Unstarted,
    SlotsBuilt,
    ConstraintsBuilt,
    DomainsInitialized,
    Ac3Done,
    Searching,
    Solved,
    NoSolution,
    InvalidInput,
}

impl SolverState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SolverState::Unstarted => "Unstarted",
            SolverState::SlotsBuilt => "SlotsBuilt",
            SolverState::ConstraintsBuilt => "ConstraintsBuilt",
            SolverState::DomainsInitialized => "DomainsInitialized",
            SolverState::Ac3Done => "AC3Done",
            SolverState::Searching => "Searching",
            SolverState::Solved => "Solved",
            SolverState::NoSolution => "NoSolution",
            SolverState::InvalidInput => "InvalidInput",
        }
    }
}

/// Callback hooks invoked synchronously from the solver's own call stack.
/// Implementations must not call back into the solver; reentrancy is
/// disallowed.
pub trait ProgressObserver: Send + Sync {
    /// Called whenever the solver's internal state machine advances.
    fn on_state_change(&self, _state: SolverState) {}

    /// Called periodically during backtracking search, every
    /// `SolveConfig::yield_every` recursive calls if set.
    fn on_recursive_call(&self, _recursive_calls: u64) {}
}

/// A `ProgressObserver` that does nothing; the default so callers who don't
/// care about telemetry pay no cost beyond a vtable call.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl ProgressObserver for NullObserver {}

/// Build a seeded, non-cryptographic RNG for shuffles and tie-breaks. When
/// `seed` is `None`, falls back to OS randomness (see "Randomness" design
/// note: explicit, not thread-local or global).
#[must_use]
pub fn build_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    }
}
