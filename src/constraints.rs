//! Constraint Builder: locates cells shared by two slots and records
//! overlap pairs as binary constraints.

use std::collections::HashMap;

use smallvec::SmallVec;

use crate::slots::Slot;
use crate::types::{Position, SlotId};

/// Overlap lists are usually a single pair; inline small storage avoids
/// allocation for the common case.
pub type OverlapList = SmallVec<[(u8, u8); 2]>;

/// `constraints[A][B] = [(idxA, idxB), ...]` for every pair of slots
/// sharing at least one cell. Both directions are stored as mirror images.
#[derive(Debug, Clone)]
pub struct Constraints {
    by_slot: Vec<HashMap<SlotId, OverlapList>>,
}

impl Constraints {
    /// Build the constraint graph for a finalized slot array.
    #[must_use]
    pub fn build(slots: &[Slot]) -> Constraints {
        let mut cell_map: HashMap<Position, SmallVec<[(SlotId, usize); 2]>> = HashMap::new();
        for (slot_id, slot) in slots.iter().enumerate() {
            for (idx, &pos) in slot.positions.iter().enumerate() {
                cell_map.entry(pos).or_default().push((slot_id, idx));
            }
        }

        let mut by_slot: Vec<HashMap<SlotId, OverlapList>> = vec![HashMap::new(); slots.len()];
        for occupants in cell_map.values() {
            if occupants.len() < 2 {
                continue;
            }
            for &(slot_a, idx_a) in occupants {
                for &(slot_b, idx_b) in occupants {
                    if slot_a == slot_b {
                        continue;
                    }
                    by_slot[slot_a]
                        .entry(slot_b)
                        .or_default()
                        .push((idx_a as u8, idx_b as u8));
                }
            }
        }

        Constraints { by_slot }
    }

    /// Overlap indices between `a` and `b`, if any.
    #[must_use]
    pub fn overlaps(&self, a: SlotId, b: SlotId) -> Option<&OverlapList> {
        self.by_slot[a].get(&b)
    }

    /// All neighbors of `slot_id`.
    pub fn neighbors(&self, slot_id: SlotId) -> impl Iterator<Item = SlotId> + '_ {
        self.by_slot[slot_id].keys().copied()
    }

    /// Degree heuristic: number of distinct neighboring slots.
    #[must_use]
    pub fn degree(&self, slot_id: SlotId) -> usize {
        self.by_slot[slot_id].len()
    }

    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.by_slot.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::slots::analyze;

    #[test]
    fn mirrors_overlap_indices() {
        let grid = Grid::parse("1 . .\n. # .\n. . #").unwrap();
        let analyzed = analyze(&grid).unwrap();
        let constraints = Constraints::build(&analyzed.slots);

        let across_id = analyzed
            .slots
            .iter()
            .position(|s| s.name == "1ACROSS")
            .unwrap();
        let down_id = analyzed
            .slots
            .iter()
            .position(|s| s.name == "1DOWN")
            .unwrap();

        let a_to_d = constraints.overlaps(across_id, down_id).unwrap().clone();
        let d_to_a = constraints.overlaps(down_id, across_id).unwrap().clone();

        assert_eq!(a_to_d.len(), 1);
        assert_eq!(d_to_a.len(), 1);
        assert_eq!(a_to_d[0], (d_to_a[0].1, d_to_a[0].0));
    }

    #[test]
    fn disjoint_slots_have_no_constraint() {
        let grid = Grid::parse("1 2\n# #").unwrap();
        let analyzed = analyze(&grid).unwrap();
        // Neither "1" nor "2" opens a slot of length >= 2 here, so there's
        // nothing to build constraints over; degree should be zero for any
        // stray slot id.
        let constraints = Constraints::build(&analyzed.slots);
        assert_eq!(constraints.slot_count(), analyzed.slots.len());
    }
}
