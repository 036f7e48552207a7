use log::error;
use serde::{Deserialize, Serialize};

use crate::engine::{self, Phase, SortWalkState};
use crate::graph;
use crate::item::{Item, ItemId};

/// Splits batch input on commas, trimming entries and dropping blanks.
pub fn parse_batch(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .collect()
}

/// The committed, canonical item list.
///
/// One owner holds this; a sort walk operates on its own working copy and is
/// written back through [`ItemList::commit`] only once terminal. Discarding a
/// walk mid-way loses that copy's relation edits, which is intended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemList {
    pub items: Vec<Item>,
}

impl ItemList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Appends one item. Whitespace is trimmed; blank input is ignored.
    pub fn add(&mut self, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }
        self.items.push(Item::new(value));
        true
    }

    /// Appends every non-blank comma-separated entry, returning how many
    /// were added.
    pub fn add_batch(&mut self, input: &str) -> usize {
        let values = parse_batch(input);
        let added = values.len();
        for value in values {
            self.items.push(Item::new(&value));
        }
        added
    }

    /// Removes and returns the item at `index`, if it exists.
    pub fn remove(&mut self, index: usize) -> Option<Item> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    /// Replaces the text of the item at `index`, keeping its identity and
    /// relations. Blank replacements and out-of-range indices are rejected.
    pub fn update(&mut self, index: usize, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }
        match self.items.get_mut(index) {
            Some(item) => {
                item.value = value.to_owned();
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Clears every item's relation sets. A fresh sort must ignore whatever
    /// relations an earlier sort left behind.
    pub fn reset_relations(&mut self) {
        for item in &mut self.items {
            item.clear_relations();
        }
    }

    /// Resets relations and opens a fresh sort walk over the current items.
    pub fn start_sort(&mut self) -> SortWalkState {
        self.reset_relations();
        engine::initialize(&self.items)
    }

    /// Replaces the canonical order with a finished walk's result.
    /// A walk that is still in progress is reported and ignored.
    pub fn commit(&mut self, state: SortWalkState) -> bool {
        if state.phase != Phase::Done {
            error!("refusing to commit an unfinished sort walk");
            return false;
        }
        self.items = state.items;
        true
    }

    /// Audit: one deterministic total order derivable from the recorded
    /// relations, or the id of an item caught in a relation cycle.
    pub fn derived_order(&self) -> Result<Vec<ItemId>, ItemId> {
        graph::derived_order(&self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{advance, initialize};

    #[test]
    fn parse_batch_trims_and_drops_blanks() {
        assert_eq!(parse_batch(" a, b ,, c "), ["a", "b", "c"]);
        assert!(parse_batch("  ,  ,").is_empty());
    }

    #[test]
    fn add_ignores_blank_input() {
        let mut list = ItemList::new();
        assert!(!list.add("   "));
        assert!(list.add("  Cats "));
        assert_eq!(list.len(), 1);
        assert_eq!(list.items[0].value, "Cats");
    }

    #[test]
    fn add_batch_appends_each_entry() {
        let mut list = ItemList::new();
        assert_eq!(list.add_batch("Dogs, Birds , Rabbits"), 3);
        let values: Vec<&str> = list.items.iter().map(|it| it.value.as_str()).collect();
        assert_eq!(values, ["Dogs", "Birds", "Rabbits"]);
    }

    #[test]
    fn remove_out_of_range_returns_none() {
        let mut list = ItemList::new();
        list.add("A");
        assert!(list.remove(3).is_none());
        assert_eq!(list.remove(0).unwrap().value, "A");
        assert!(list.is_empty());
    }

    #[test]
    fn update_keeps_identity_and_relations() {
        let mut list = ItemList::new();
        list.add_batch("A, B");
        let a_id = list.items[0].id;
        let b_id = list.items[1].id;
        list.items[0].add_before(b_id);
        assert!(list.update(0, " Apples "));
        assert_eq!(list.items[0].value, "Apples");
        assert_eq!(list.items[0].id, a_id);
        assert!(list.items[0].knows_before(b_id));
        assert!(!list.update(0, "  "));
        assert!(!list.update(9, "X"));
    }

    #[test]
    fn start_sort_resets_leftover_relations() {
        let mut list = ItemList::new();
        list.add_batch("B, A");
        let a_id = list.items[1].id;
        list.items[0].add_before(a_id);
        let state = list.start_sort();
        assert_eq!(state.phase, Phase::ChoosingPivot);
        assert!(list.items.iter().all(|it| it.before.is_empty() && it.after.is_empty()));
        assert!(state.items.iter().all(|it| it.before.is_empty() && it.after.is_empty()));
    }

    #[test]
    fn commit_rejects_unfinished_walk() {
        let mut list = ItemList::new();
        list.add_batch("B, A");
        let before = list.clone();
        let state = initialize(&list.items);
        assert_eq!(state.phase, Phase::ChoosingPivot);
        assert!(!list.commit(state));
        assert_eq!(list, before);
    }

    #[test]
    fn commit_replaces_order_from_finished_walk() {
        let mut list = ItemList::new();
        list.add_batch("B, A");
        let state = list.start_sort();
        let done = advance(&state, true); // pivot B is bigger
        assert!(list.commit(done));
        let values: Vec<&str> = list.items.iter().map(|it| it.value.as_str()).collect();
        assert_eq!(values, ["A", "B"]);
    }

    #[test]
    fn derived_order_matches_committed_positions() {
        let mut list = ItemList::new();
        list.add_batch("B, A");
        let state = list.start_sort();
        list.commit(advance(&state, true));
        let order = list.derived_order().unwrap();
        let positions: Vec<ItemId> = list.items.iter().map(|it| it.id).collect();
        assert_eq!(order, positions);
    }
}
