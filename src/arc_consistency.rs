//! This module implements AC-3 for crossword slot domains. For our
//! purposes, the grid is arc-consistent when every remaining candidate in
//! slot A has, for *every* overlap it shares with a neighbor B, at least
//! one compatible candidate in `domain[B]` (the textbook "all overlaps
//! satisfied by some partner" rule).
//!
//! We keep revising arcs, re-enqueueing neighbors of anything that shrank,
//! until the queue is empty or a domain is wiped out.

use std::collections::VecDeque;

use crate::constraints::Constraints;
use crate::domain::Domains;
use crate::error::SolveError;
use crate::slots::Slot;
use crate::util::CancellationToken;
use crate::word_list::WordList;

/// Establish arc consistency across every constrained pair of slots,
/// pruning `domains` in place.
///
/// Returns `Ok(true)` if the grid is arc-consistent with no domain wiped
/// out, `Ok(false)` if some domain was wiped out (this is not terminal,
/// the caller still proceeds into backtracking search), and
/// `Err(Cancelled)` if cancellation was observed at a dequeue.
pub fn establish(
    slots: &[Slot],
    constraints: &Constraints,
    word_list: &WordList,
    domains: &mut Domains,
    cancel: &CancellationToken,
) -> Result<bool, SolveError> {
    let mut queue: VecDeque<(usize, usize)> = VecDeque::new();
    for a in 0..slots.len() {
        for b in constraints.neighbors(a) {
            queue.push_back((a, b));
        }
    }

    while let Some((a, b)) = queue.pop_front() {
        if cancel.is_cancelled() {
            return Err(SolveError::Cancelled);
        }

        if revise(a, b, slots, constraints, word_list, domains) {
            if domains[a].is_empty() {
                log::warn!(
                    "AC-3 wiped out the domain for slot {:?}; continuing into backtracking search",
                    slots[a].name
                );
                return Ok(false);
            }
            for x in constraints.neighbors(a) {
                if x != b {
                    queue.push_back((x, a));
                }
            }
        }
    }

    Ok(true)
}

/// Revise(A, B): retain `w` in `domain[A]` iff, for every overlap index
/// pair with B, some `w'` in `domain[B]` agrees at that position.
fn revise(
    a: usize,
    b: usize,
    slots: &[Slot],
    constraints: &Constraints,
    word_list: &WordList,
    domains: &mut Domains,
) -> bool {
    let Some(overlaps) = constraints.overlaps(a, b) else {
        return false;
    };
    let len_a = slots[a].len();
    let len_b = slots[b].len();
    let before = domains[a].len();

    let domain_b = domains[b].clone();
    domains[a].retain(|&word_a| {
        let glyphs_a = &word_list.word(len_a, word_a).glyphs;
        overlaps.iter().all(|&(idx_a, idx_b)| {
            domain_b.iter().any(|&word_b| {
                let glyphs_b = &word_list.word(len_b, word_b).glyphs;
                glyphs_a[idx_a as usize] == glyphs_b[idx_b as usize]
            })
        })
    });

    domains[a].len() != before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::Constraints;
    use crate::domain;
    use crate::grid::Grid;
    use crate::slots::analyze;
    use crate::word_list::WordList;

    #[test]
    fn prunes_incompatible_crossing_candidates() {
        // 1ACROSS crosses 1DOWN at (0,0). A prefilled letter on each slot's
        // *other* end pins ACROSS to "CAT" and DOWN to "DOG" (sharing no
        // word in common), so the shared cell (0,0) can never agree and
        // AC-3 should wipe ACROSS's domain out entirely.
        let grid = Grid::parse("1 A .\n. # .\nG . #").unwrap();
        let analyzed = analyze(&grid).unwrap();
        let word_list = WordList::from_words(["CAT", "DOG"]);
        let constraints = Constraints::build(&analyzed.slots);
        let mut domains = domain::initialize(&analyzed.slots, &analyzed.prefilled, &word_list);

        let across_idx = analyzed
            .slots
            .iter()
            .position(|s| s.name == "1ACROSS")
            .unwrap();
        let down_idx = analyzed
            .slots
            .iter()
            .position(|s| s.name == "1DOWN")
            .unwrap();
        assert_eq!(domains[across_idx].len(), 1); // just CAT
        assert_eq!(domains[down_idx].len(), 1); // just DOG

        let cancel = CancellationToken::new();
        let consistent = establish(
            &analyzed.slots,
            &constraints,
            &word_list,
            &mut domains,
            &cancel,
        )
        .unwrap();

        assert!(!consistent);
        assert!(domains[across_idx].is_empty());
    }

    #[test]
    fn keeps_mutually_compatible_candidates() {
        let grid = Grid::parse("1 . .\n. # .\n. . #").unwrap();
        let analyzed = analyze(&grid).unwrap();
        let word_list = WordList::from_words(["CAT", "CAR"]);
        let constraints = Constraints::build(&analyzed.slots);
        let mut domains = domain::initialize(&analyzed.slots, &analyzed.prefilled, &word_list);

        let cancel = CancellationToken::new();
        let consistent = establish(
            &analyzed.slots,
            &constraints,
            &word_list,
            &mut domains,
            &cancel,
        )
        .unwrap();
        assert!(consistent);
        assert!(domains.iter().all(|d| !d.is_empty()));
    }

    #[test]
    fn honors_cancellation() {
        let grid = Grid::parse("1 . .\n. # .\n. . #").unwrap();
        let analyzed = analyze(&grid).unwrap();
        let word_list = WordList::from_words(["CAT", "CAR", "TAR"]);
        let constraints = Constraints::build(&analyzed.slots);
        let mut domains = domain::initialize(&analyzed.slots, &analyzed.prefilled, &word_list);

        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = establish(
            &analyzed.slots,
            &constraints,
            &word_list,
            &mut domains,
            &cancel,
        );
        assert!(matches!(result, Err(SolveError::Cancelled)));
    }
}
