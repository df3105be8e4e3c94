//! Backtracking Search: a depth-first assignment search over slots, using
//! MRV + degree + random tie-break for variable selection, an LCV
//! approximation (ascending letter-frequency sum) for value ordering, and
//! forward checking with snapshot/restore on backtrack.

use std::time::Duration;

use instant::Instant;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use crate::constraints::Constraints;
use crate::domain::Domains;
use crate::error::SolveError;
use crate::slots::Slot;
use crate::solver::SolveConfig;
use crate::types::{SlotId, WordId};
use crate::util::{CancellationToken, ProgressObserver, SolverState};
use crate::word_list::WordList;

/// A complete or partial mapping from `SlotId` to the chosen `WordId`,
/// dense over the slot array.
pub type Assignment = Vec<Option<WordId>>;

/// Statistics reported alongside a solve outcome.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    pub recursive_calls: u64,
    pub backtracks: u64,
    pub elapsed: Duration,
}

/// Outcome of a full search run.
pub enum SearchOutcome {
    /// At least one solution was found. Carries every assignment collected
    /// (bounded by `SolveConfig::max_solutions`); the first is primary.
    Solved(Vec<Assignment>),
    NoSolution,
    Cancelled,
}

/// Run backtracking search to completion (or cancellation), starting from
/// `domains` (expected to already be arc-consistent, though search is
/// correct regardless since a wiped-out domain just means no candidate
/// will ever pass `is_consistent`).
pub fn search(
    slots: &[Slot],
    constraints: &Constraints,
    word_list: &WordList,
    domains: &mut Domains,
    config: &SolveConfig,
    cancel: &CancellationToken,
    observer: &dyn ProgressObserver,
) -> (SearchOutcome, Statistics) {
    let mut rng = crate::util::build_rng(config.rng_seed);

    // Value pre-ordering: shuffle each domain once up front for run-to-run
    // diversity before LCV ordering is applied per-step.
    for domain in domains.iter_mut() {
        domain.shuffle(&mut rng);
    }

    let mut assignment: Assignment = vec![None; slots.len()];
    let mut stats = Statistics::default();
    let mut solutions: Vec<Assignment> = Vec::new();
    let max_solutions = config.max_solutions.max(1) as usize;

    let start = Instant::now();
    let step = backtrack(
        slots,
        constraints,
        word_list,
        domains,
        &mut assignment,
        &mut rng,
        &mut stats,
        &mut solutions,
        max_solutions,
        config.yield_every,
        cancel,
        observer,
    );
    stats.elapsed = start.elapsed();

    let outcome = match step {
        StepResult::Cancelled => SearchOutcome::Cancelled,
        StepResult::Stop | StepResult::Continue => {
            if solutions.is_empty() {
                SearchOutcome::NoSolution
            } else {
                SearchOutcome::Solved(solutions)
            }
        }
    };
    (outcome, stats)
}

enum StepResult {
    /// Enough solutions were collected (or the first one, when
    /// `max_solutions == 1`); unwind immediately.
    Stop,
    /// This branch is exhausted; caller should try the next candidate (or
    /// report `NoSolution` if it was the top-level call).
    Continue,
    Cancelled,
}

#[allow(clippy::too_many_arguments)]
fn backtrack(
    slots: &[Slot],
    constraints: &Constraints,
    word_list: &WordList,
    domains: &mut Domains,
    assignment: &mut Assignment,
    rng: &mut SmallRng,
    stats: &mut Statistics,
    solutions: &mut Vec<Assignment>,
    max_solutions: usize,
    yield_every: Option<u64>,
    cancel: &CancellationToken,
    observer: &dyn ProgressObserver,
) -> StepResult {
    if cancel.is_cancelled() {
        return StepResult::Cancelled;
    }

    stats.recursive_calls += 1;
    if let Some(k) = yield_every {
        if k > 0 && stats.recursive_calls % k == 0 {
            observer.on_recursive_call(stats.recursive_calls);
        }
    }

    let Some(slot_id) = choose_unassigned_slot(slots, constraints, domains, assignment, rng)
    else {
        solutions.push(assignment.clone());
        return if solutions.len() >= max_solutions {
            StepResult::Stop
        } else {
            StepResult::Continue
        };
    };

    let candidates = order_candidates(&domains[slot_id], slots[slot_id].len(), word_list, rng);

    for word_id in candidates {
        if !is_consistent(word_id, slot_id, slots, constraints, word_list, assignment, domains) {
            continue;
        }

        assignment[slot_id] = Some(word_id);
        let mut snapshots: Vec<(SlotId, Vec<WordId>)> = Vec::new();
        let forward_ok = forward_check(
            slot_id,
            word_id,
            slots,
            constraints,
            word_list,
            domains,
            assignment,
            &mut snapshots,
        );

        if forward_ok {
            match backtrack(
                slots,
                constraints,
                word_list,
                domains,
                assignment,
                rng,
                stats,
                solutions,
                max_solutions,
                yield_every,
                cancel,
                observer,
            ) {
                StepResult::Stop => return StepResult::Stop,
                StepResult::Cancelled => {
                    restore(domains, snapshots);
                    assignment[slot_id] = None;
                    return StepResult::Cancelled;
                }
                StepResult::Continue => {
                    stats.backtracks += 1;
                }
            }
        } else {
            stats.backtracks += 1;
        }

        restore(domains, snapshots);
        assignment[slot_id] = None;
    }

    StepResult::Continue
}

/// MRV + degree + random tie-break (see the glossary entries for each).
fn choose_unassigned_slot(
    slots: &[Slot],
    constraints: &Constraints,
    domains: &Domains,
    assignment: &Assignment,
    rng: &mut SmallRng,
) -> Option<SlotId> {
    let unassigned: Vec<SlotId> = (0..slots.len())
        .filter(|&id| assignment[id].is_none())
        .collect();
    if unassigned.is_empty() {
        return None;
    }

    let min_domain_size = unassigned
        .iter()
        .map(|&id| domains[id].len())
        .min()
        .expect("non-empty");
    let mrv: Vec<SlotId> = unassigned
        .into_iter()
        .filter(|&id| domains[id].len() == min_domain_size)
        .collect();

    let max_degree = mrv
        .iter()
        .map(|&id| constraints.degree(id))
        .max()
        .expect("non-empty");
    let tied: Vec<SlotId> = mrv
        .into_iter()
        .filter(|&id| constraints.degree(id) == max_degree)
        .collect();

    tied.choose(rng).copied()
}

/// LCV approximation: order ascending by the sum of corpus-wide letter
/// frequencies, so low-frequency-letter words (which tend to be more
/// constraining for neighbors) are tried first. Ties are broken by a
/// shuffle before the (stable) sort.
fn order_candidates(
    domain: &[WordId],
    length: usize,
    word_list: &WordList,
    rng: &mut SmallRng,
) -> Vec<WordId> {
    let mut candidates = domain.to_vec();
    candidates.shuffle(rng);
    candidates.sort_by_key(|&word_id| {
        word_list
            .word(length, word_id)
            .glyphs
            .iter()
            .map(|&g| word_list.letter_frequency[g as usize])
            .sum::<u32>()
    });
    candidates
}

/// Consistency check for candidate `word_id` in `slot_id` under the
/// current partial assignment.
fn is_consistent(
    word_id: WordId,
    slot_id: SlotId,
    slots: &[Slot],
    constraints: &Constraints,
    word_list: &WordList,
    assignment: &Assignment,
    domains: &Domains,
) -> bool {
    let length = slots[slot_id].len();
    let glyphs = &word_list.word(length, word_id).glyphs;

    for neighbor in constraints.neighbors(slot_id) {
        let overlaps = constraints
            .overlaps(slot_id, neighbor)
            .expect("neighbor implies an overlap list");

        match assignment[neighbor] {
            Some(neighbor_word) => {
                let neighbor_glyphs = &word_list.word(slots[neighbor].len(), neighbor_word).glyphs;
                let ok = overlaps
                    .iter()
                    .all(|&(i, j)| glyphs[i as usize] == neighbor_glyphs[j as usize]);
                if !ok {
                    return false;
                }
            }
            None => {
                let has_partner = overlaps.iter().all(|&(i, j)| {
                    domains[neighbor].iter().any(|&candidate| {
                        let candidate_glyphs =
                            &word_list.word(slots[neighbor].len(), candidate).glyphs;
                        candidate_glyphs[j as usize] == glyphs[i as usize]
                    })
                });
                if !has_partner {
                    return false;
                }
            }
        }
    }
    true
}

/// On tentative assignment of `word_id` to `slot_id`, prune incompatible
/// candidates from every unassigned neighbor's domain, snapshotting the
/// pre-prune contents so the caller can restore on backtrack. Returns
/// `false` (aborting) if any neighbor domain becomes empty.
#[allow(clippy::too_many_arguments)]
fn forward_check(
    slot_id: SlotId,
    word_id: WordId,
    slots: &[Slot],
    constraints: &Constraints,
    word_list: &WordList,
    domains: &mut Domains,
    assignment: &Assignment,
    snapshots: &mut Vec<(SlotId, Vec<WordId>)>,
) -> bool {
    let length = slots[slot_id].len();
    let glyphs = word_list.word(length, word_id).glyphs.clone();

    for neighbor in constraints.neighbors(slot_id) {
        if assignment[neighbor].is_some() {
            continue;
        }
        let overlaps = constraints
            .overlaps(slot_id, neighbor)
            .expect("neighbor implies an overlap list")
            .clone();
        let neighbor_length = slots[neighbor].len();

        let before = domains[neighbor].clone();
        domains[neighbor].retain(|&candidate| {
            let candidate_glyphs = &word_list.word(neighbor_length, candidate).glyphs;
            overlaps
                .iter()
                .all(|&(i, j)| candidate_glyphs[j as usize] == glyphs[i as usize])
        });

        if domains[neighbor].len() != before.len() {
            snapshots.push((neighbor, before));
        }
        if domains[neighbor].is_empty() {
            return false;
        }
    }
    true
}

/// Restore every snapshotted domain, in reverse order, to its exact
/// pre-forward-check contents (Testable Property 5).
fn restore(domains: &mut Domains, snapshots: Vec<(SlotId, Vec<WordId>)>) {
    for (slot_id, previous) in snapshots.into_iter().rev() {
        domains[slot_id] = previous;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};

    use super::*;
    use crate::arc_consistency;
    use crate::constraints::Constraints;
    use crate::domain;
    use crate::grid::Grid;
    use crate::slots::analyze;
    use crate::solver::SolveConfig;
    use crate::util::{NullObserver, ProgressObserver, SolverState};
    use crate::word_list::WordList;

    fn run(
        grid_text: &str,
        words: &[&str],
        config: &SolveConfig,
    ) -> (SearchOutcome, Vec<Slot>, WordList, Statistics) {
        let grid = Grid::parse(grid_text).unwrap();
        let analyzed = analyze(&grid).unwrap();
        let word_list = WordList::from_words(words.iter().copied());
        let constraints = Constraints::build(&analyzed.slots);
        let mut domains = domain::initialize(&analyzed.slots, &analyzed.prefilled, &word_list);
        let cancel = CancellationToken::new();
        let observer = NullObserver;
        let (outcome, stats) = search(
            &analyzed.slots,
            &constraints,
            &word_list,
            &mut domains,
            config,
            &cancel,
            &observer,
        );
        (outcome, analyzed.slots, word_list, stats)
    }

    #[test]
    fn finds_a_solution_for_scenario_1() {
        let config = SolveConfig::default();
        let (outcome, slots, word_list, stats) =
            run("1 . .\n. # .\n. . #", &["CAT", "CAR", "TAR", "TAB"], &config);
        match outcome {
            SearchOutcome::Solved(solutions) => {
                let assignment = &solutions[0];
                for (slot_id, word_id) in assignment.iter().enumerate() {
                    let word_id = word_id.expect("every slot assigned");
                    let word = &word_list.word(slots[slot_id].len(), word_id).text;
                    assert!(word_list.words_of_length(slots[slot_id].len()).iter().any(
                        |w| &w.text == word
                    ));
                }
            }
            _ => panic!("expected a solution"),
        }
        assert!(stats.recursive_calls > 0);
    }

    #[test]
    fn reports_no_solution_when_dictionary_cannot_fill_a_slot() {
        // A single slot of length 2 with a dictionary that has no 2-letter
        // words at all.
        let config = SolveConfig::default();
        let (outcome, _slots, _word_list, stats) =
            run("1 .\n. #", &["CAT", "DOG"], &config);
        assert!(matches!(outcome, SearchOutcome::NoSolution));
        assert!(stats.recursive_calls > 0);
    }

    #[test]
    fn honors_cancellation_before_any_work() {
        let mut config = SolveConfig::default();
        config.cancel.cancel();
        let grid = Grid::parse("1 . .\n. # .\n. . #").unwrap();
        let analyzed = analyze(&grid).unwrap();
        let word_list = WordList::from_words(["CAT", "CAR"]);
        let constraints = Constraints::build(&analyzed.slots);
        let mut domains = domain::initialize(&analyzed.slots, &analyzed.prefilled, &word_list);
        let observer = NullObserver;
        let (outcome, _stats) = search(
            &analyzed.slots,
            &constraints,
            &word_list,
            &mut domains,
            &config,
            &config.cancel.clone(),
            &observer,
        );
        assert!(matches!(outcome, SearchOutcome::Cancelled));
    }

    /// Cancels the token as soon as the first recursive call is reported,
    /// via `SolveConfig::yield_every`.
    struct CancelOnFirstCall {
        cancel: CancellationToken,
        calls_seen: AtomicU64,
    }

    impl ProgressObserver for CancelOnFirstCall {
        fn on_state_change(&self, _state: SolverState) {}

        fn on_recursive_call(&self, _recursive_calls: u64) {
            self.calls_seen.fetch_add(1, Ordering::SeqCst);
            self.cancel.cancel();
        }
    }

    #[test]
    fn cancellation_mid_search_restores_every_domain() {
        let config = SolveConfig {
            yield_every: Some(1),
            ..SolveConfig::default()
        };
        let grid = Grid::parse("1 . .\n. # .\n. . #").unwrap();
        let analyzed = analyze(&grid).unwrap();
        let word_list = WordList::from_words(["CAT", "CAR", "TAR", "TAB", "COT", "TOT"]);
        let constraints = Constraints::build(&analyzed.slots);
        let mut domains = domain::initialize(&analyzed.slots, &analyzed.prefilled, &word_list);

        let cancel = CancellationToken::new();
        arc_consistency::establish(
            &analyzed.slots,
            &constraints,
            &word_list,
            &mut domains,
            &cancel,
        )
        .unwrap();
        let domains_after_ac3 = domains.clone();

        let observer = CancelOnFirstCall {
            cancel: cancel.clone(),
            calls_seen: AtomicU64::new(0),
        };
        let (outcome, _stats) = search(
            &analyzed.slots,
            &constraints,
            &word_list,
            &mut domains,
            &config,
            &cancel,
            &observer,
        );

        assert!(matches!(outcome, SearchOutcome::Cancelled));
        assert!(observer.calls_seen.load(Ordering::SeqCst) >= 1);
        // The first recursive call is only reported after the root call has
        // already made a tentative assignment and forward-checked its
        // neighbors, so this exercises the restore path, not just the
        // before-any-work short circuit covered above.
        assert_eq!(domains, domains_after_ac3);
    }

    #[test]
    fn deterministic_given_fixed_seed() {
        let mut config = SolveConfig::default();
        config.rng_seed = Some(42);
        let words = ["CAT", "CAR", "TAR", "TAB", "COT", "TOT"];
        let (outcome_a, _, _, stats_a) = run("1 . .\n. # .\n. . #", &words, &config);
        let (outcome_b, _, _, stats_b) = run("1 . .\n. # .\n. . #", &words, &config);

        let assignment_a = match outcome_a {
            SearchOutcome::Solved(solutions) => solutions[0].clone(),
            _ => panic!("expected a solution"),
        };
        let assignment_b = match outcome_b {
            SearchOutcome::Solved(solutions) => solutions[0].clone(),
            _ => panic!("expected a solution"),
        };
        assert_eq!(assignment_a, assignment_b);
        assert_eq!(stats_a.recursive_calls, stats_b.recursive_calls);
    }
}
