//! Domain Initializer: filters the length-bucketed dictionary by each
//! slot's length and pre-filled-letter pattern to produce an initial
//! candidate set per slot.

use std::collections::HashMap;

use crate::slots::Slot;
use crate::types::{Position, WordId};
use crate::word_list::WordList;

/// Per-slot candidate word lists, indexed by `SlotId`. Mutable during AC-3
/// and search; values are `WordId`s relative to `WordList::words[slot
/// length]`.
pub type Domains = Vec<Vec<WordId>>;

/// Build the initial domain for every slot.
#[must_use]
pub fn initialize(
    slots: &[Slot],
    prefilled: &HashMap<Position, u8>,
    word_list: &WordList,
) -> Domains {
    slots
        .iter()
        .map(|slot| {
            let pattern: Vec<Option<u8>> = slot
                .positions
                .iter()
                .map(|pos| prefilled.get(pos).copied())
                .collect();
            let bucket = word_list.words_of_length(slot.len());
            bucket
                .iter()
                .enumerate()
                .filter(|(_, word)| matches_pattern(&word.glyphs, &pattern))
                .map(|(id, _)| id)
                .collect()
        })
        .collect()
}

fn matches_pattern(glyphs: &[u8], pattern: &[Option<u8>]) -> bool {
    glyphs.iter().zip(pattern.iter()).all(|(&g, p)| match p {
        None => true,
        Some(fixed) => *fixed == g,
    })
}

/// Debug-only sanity pass over a `Domains` array: every remaining
/// candidate must have exactly the slot's length and must still honor any
/// prefilled letters. Expensive, so gated behind `check_invariants`
/// instead of running on every solve.
#[cfg(feature = "check_invariants")]
pub fn check_invariants(
    slots: &[Slot],
    prefilled: &HashMap<Position, u8>,
    domains: &Domains,
    word_list: &WordList,
) {
    for (slot_id, slot) in slots.iter().enumerate() {
        let pattern: Vec<Option<u8>> = slot
            .positions
            .iter()
            .map(|pos| prefilled.get(pos).copied())
            .collect();
        for &word_id in &domains[slot_id] {
            let word = word_list.word(slot.len(), word_id);
            assert_eq!(word.glyphs.len(), slot.len(), "domain word length mismatch for {}", slot.name);
            assert!(
                matches_pattern(&word.glyphs, &pattern),
                "domain word {} violates prefilled letters for {}",
                word.text,
                slot.name
            );
        }
    }
}
