use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier for a sortable item, stable for the item's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A free-text item plus the pairwise ordering facts discovered so far.
///
/// Every fact is stored symmetrically on both items involved, so either side
/// can answer "are we related?" in one lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub value: String,
    /// Ids known to sort strictly before this item.
    pub before: Vec<ItemId>,
    /// Ids known to sort strictly after this item.
    pub after: Vec<ItemId>,
}

impl Item {
    /// Fresh item with no recorded relations.
    pub fn new(value: &str) -> Self {
        Self {
            id: ItemId::new(),
            value: value.to_owned(),
            before: Vec::new(),
            after: Vec::new(),
        }
    }

    pub fn knows_before(&self, id: ItemId) -> bool {
        self.before.contains(&id)
    }

    pub fn knows_after(&self, id: ItemId) -> bool {
        self.after.contains(&id)
    }

    /// Records `id` as sorting strictly before this item.
    /// Self-relations and duplicates are ignored.
    pub fn add_before(&mut self, id: ItemId) {
        if id != self.id && !self.before.contains(&id) {
            self.before.push(id);
        }
    }

    /// Records `id` as sorting strictly after this item.
    /// Self-relations and duplicates are ignored.
    pub fn add_after(&mut self, id: ItemId) {
        if id != self.id && !self.after.contains(&id) {
            self.after.push(id);
        }
    }

    pub fn clear_relations(&mut self) {
        self.before.clear();
        self.after.clear();
    }
}

/// True if any relation between `a` and `b` has been recorded, from either
/// item's perspective.
pub fn has_relation(a: &Item, b: &Item) -> bool {
    a.knows_before(b.id) || a.knows_after(b.id) || b.knows_before(a.id) || b.knows_after(a.id)
}

/// Finds the next index in `[left, right]` whose item has no established
/// relation with the pivot, skipping the pivot itself.
///
/// The scan is ascending and always returns the lowest qualifying index;
/// this tie-break decides which pair is asked about next and must stay
/// deterministic. Returns `None` when no comparisons remain in the range.
pub fn next_unresolved_index(
    items: &[Item],
    left: usize,
    right: usize,
    pivot_idx: usize,
) -> Option<usize> {
    for i in left..=right {
        if i != pivot_idx && !has_relation(&items[i], &items[pivot_idx]) {
            debug!("next compare index: {i}");
            return Some(i);
        }
    }
    debug!("no more comparisons needed in [{left}, {right}]");
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(values: &[&str]) -> Vec<Item> {
        values.iter().map(|v| Item::new(v)).collect()
    }

    /// Records `items[bigger] > items[smaller]` on both sides.
    fn relate_bigger(items: &mut [Item], bigger: usize, smaller: usize) {
        let big_id = items[bigger].id;
        let small_id = items[smaller].id;
        items[bigger].add_before(small_id);
        items[smaller].add_after(big_id);
    }

    #[test]
    fn relation_visible_from_all_four_sides() {
        let mut xs = items(&["A", "B"]);
        relate_bigger(&mut xs, 0, 1);
        assert!(has_relation(&xs[0], &xs[1]));
        assert!(has_relation(&xs[1], &xs[0]));
        assert!(xs[0].knows_before(xs[1].id));
        assert!(xs[1].knows_after(xs[0].id));
    }

    #[test]
    fn unrelated_items_have_no_relation() {
        let xs = items(&["A", "B"]);
        assert!(!has_relation(&xs[0], &xs[1]));
    }

    #[test]
    fn add_before_rejects_self_and_duplicates() {
        let mut xs = items(&["A", "B"]);
        let own = xs[0].id;
        let other = xs[1].id;
        xs[0].add_before(own);
        assert!(xs[0].before.is_empty());
        xs[0].add_before(other);
        xs[0].add_before(other);
        assert_eq!(xs[0].before.len(), 1);
    }

    #[test]
    fn scan_with_no_relations_returns_leftmost() {
        let xs = items(&["B", "A", "C"]);
        assert_eq!(next_unresolved_index(&xs, 0, 2, 1), Some(0));
    }

    #[test]
    fn scan_with_all_related_returns_none() {
        let mut xs = items(&["B", "A", "C"]);
        relate_bigger(&mut xs, 0, 1); // B > A
        relate_bigger(&mut xs, 1, 2); // A > C
        assert_eq!(next_unresolved_index(&xs, 0, 2, 1), None);
    }

    #[test]
    fn scan_always_picks_lowest_unresolved_index() {
        let mut xs = items(&["W", "X", "Y", "Z"]);
        // Leave 0 and 3 unresolved against the pivot at 1.
        relate_bigger(&mut xs, 2, 1);
        assert_eq!(next_unresolved_index(&xs, 0, 3, 1), Some(0));
        relate_bigger(&mut xs, 0, 1);
        assert_eq!(next_unresolved_index(&xs, 0, 3, 1), Some(3));
    }

    #[test]
    fn clear_relations_empties_both_sets() {
        let mut xs = items(&["A", "B"]);
        relate_bigger(&mut xs, 0, 1);
        xs[0].clear_relations();
        xs[1].clear_relations();
        assert!(!has_relation(&xs[0], &xs[1]));
    }
}
