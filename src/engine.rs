use log::{debug, error, info, warn};

use crate::graph::would_contradict;
use crate::item::{next_unresolved_index, Item};

/// Where an in-progress sort walk stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// A comparison is pending and must be shown to the user.
    ChoosingPivot,
    /// The sort is finished and `items` holds the final order.
    Done,
}

/// Transient, resumable progress record of one interactive sort.
///
/// The walk suspends between every comparison: the caller shows the
/// pivot-vs-compare pair, collects one boolean answer, and feeds it to
/// [`advance`] for the next state. `pending` is quicksort's recursion stack
/// made explicit as a LIFO of `(left, right)` bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortWalkState {
    /// Working copy of all items, reordered in place as partitioning proceeds.
    pub items: Vec<Item>,
    /// Inclusive bounds of the partition currently being resolved.
    /// Signed so the empty-list terminal state can carry `right = -1`.
    pub left: isize,
    pub right: isize,
    pub pivot_idx: usize,
    /// Index of the item currently compared against the pivot; only
    /// meaningful while `phase` is [`Phase::ChoosingPivot`].
    pub compare_idx: usize,
    pub phase: Phase,
    pub pending: Vec<(usize, usize)>,
}

fn done_state(items: Vec<Item>) -> SortWalkState {
    let right = items.len() as isize - 1;
    SortWalkState {
        items,
        left: 0,
        right,
        pivot_idx: 0,
        compare_idx: 0,
        phase: Phase::Done,
        pending: Vec::new(),
    }
}

/// Starts a sort walk over `items`.
///
/// Lists of zero or one items are immediately terminal. Otherwise the walk
/// opens on the whole range with a deterministic midpoint pivot. The caller
/// must have reset every item's relation sets if this is a fresh sort; the
/// engine never resets them itself. The input is not mutated.
pub fn initialize(items: &[Item]) -> SortWalkState {
    if items.len() <= 1 {
        return done_state(items.to_vec());
    }

    let left = 0;
    let right = items.len() - 1;
    let pivot_idx = (left + right) / 2;
    let compare_idx = next_unresolved_index(items, left, right, pivot_idx).unwrap_or(left);

    info!("starting sort: left={left} right={right} pivot={pivot_idx}");
    SortWalkState {
        items: items.to_vec(),
        left: left as isize,
        right: right as isize,
        pivot_idx,
        compare_idx,
        phase: Phase::ChoosingPivot,
        pending: Vec::new(),
    }
}

/// Records the answered relation on both items.
///
/// A direct reversal of an already-recorded relation is skipped (the first
/// fact wins) and reported; an answer that closes a cycle through previously
/// recorded relations is recorded but flagged, since the user has reversed an
/// earlier transitive judgment.
fn record_answer(items: &mut [Item], pivot_idx: usize, compare_idx: usize, pivot_is_bigger: bool) {
    let pivot_id = items[pivot_idx].id;
    let compare_id = items[compare_idx].id;
    info!(
        "answer: pivot={:?} compare={:?} pivot_is_bigger={pivot_is_bigger}",
        items[pivot_idx].value, items[compare_idx].value
    );

    let reversed = if pivot_is_bigger {
        items[pivot_idx].knows_after(compare_id) || items[compare_idx].knows_before(pivot_id)
    } else {
        items[pivot_idx].knows_before(compare_id) || items[compare_idx].knows_after(pivot_id)
    };
    if reversed {
        error!(
            "answer contradicts the recorded relation between {:?} and {:?}; keeping the earlier one",
            items[pivot_idx].value, items[compare_idx].value
        );
        return;
    }

    if pivot_id != compare_id && would_contradict(items, pivot_id, compare_id, pivot_is_bigger) {
        warn!(
            "answer contradicts relations recorded earlier: {:?} vs {:?}",
            items[pivot_idx].value, items[compare_idx].value
        );
    }

    if pivot_is_bigger {
        items[pivot_idx].add_before(compare_id);
        items[compare_idx].add_after(pivot_id);
    } else {
        items[pivot_idx].add_after(compare_id);
        items[compare_idx].add_before(pivot_id);
    }
}

/// True when every pair in `[left, right]` has a recorded relation that
/// matches the pair's current positions. This is the authoritative completion
/// test for a partition; it can succeed without any physical partition step
/// when earlier answers already cover every pair.
fn is_fully_ordered(items: &[Item], left: usize, right: usize) -> bool {
    for i in left..right {
        for j in (i + 1)..=right {
            if !items[i].knows_after(items[j].id) && !items[j].knows_before(items[i].id) {
                return false;
            }
        }
    }
    true
}

/// Stable reorder of `[left, right]` using only recorded relations.
///
/// Only reached once `is_fully_ordered` has passed, so every pair in range is
/// related; an unrelated pair here is an invariant breach and is reported
/// loudly rather than silently left in arbitrary order.
fn sort_by_relations(items: &mut [Item], left: usize, right: usize) {
    items[left..=right].sort_by(|a, b| {
        use std::cmp::Ordering;
        if a.knows_before(b.id) {
            Ordering::Greater
        } else if a.knows_after(b.id) {
            Ordering::Less
        } else {
            debug_assert!(
                a.id == b.id,
                "no recorded relation between {:?} and {:?}",
                a.value,
                b.value
            );
            if a.id != b.id {
                error!(
                    "ordering {:?} against {:?} with no recorded relation",
                    a.value, b.value
                );
            }
            Ordering::Equal
        }
    });
}

/// Places the pivot at its final index within `[left, right]` using recorded
/// relations as the split rule, returning that index.
///
/// An item belongs on the small side when the pivot knows it sorts before, or
/// it knows the pivot sorts after. Items with no recorded relation to the
/// pivot never move: they stay on the after side and get resolved by
/// comparisons, not by accident of partition order.
pub fn partition(items: &mut [Item], left: usize, right: usize, pivot_idx: usize) -> usize {
    let pivot_id = items[pivot_idx].id;
    info!(
        "partitioning: left={left} right={right} pivot={:?}",
        items[pivot_idx].value
    );

    items.swap(pivot_idx, right);
    let mut store_idx = left;
    for i in left..right {
        let item_id = items[i].id;
        if items[right].knows_before(item_id) || items[i].knows_after(pivot_id) {
            items.swap(i, store_idx);
            store_idx += 1;
        }
    }
    items.swap(right, store_idx);

    debug!("partitioned: pivot_final={store_idx}");
    store_idx
}

fn open_partition(
    items: Vec<Item>,
    left: usize,
    right: usize,
    pending: Vec<(usize, usize)>,
) -> SortWalkState {
    let pivot_idx = (left + right) / 2;
    let compare_idx = next_unresolved_index(&items, left, right, pivot_idx).unwrap_or(left);
    info!("moving to partition: left={left} right={right} pivot={pivot_idx}");
    SortWalkState {
        items,
        left: left as isize,
        right: right as isize,
        pivot_idx,
        compare_idx,
        phase: Phase::ChoosingPivot,
        pending,
    }
}

/// Depth-first, left-biased hand-off once a partition has resolved around
/// `final_pivot_idx`: defer the right remainder, descend into the left one,
/// otherwise pop the most recent deferred bounds, otherwise finish.
fn transition(
    items: Vec<Item>,
    final_pivot_idx: usize,
    left: usize,
    right: usize,
    mut pending: Vec<(usize, usize)>,
) -> SortWalkState {
    if final_pivot_idx + 1 < right {
        pending.push((final_pivot_idx + 1, right));
    }

    if left + 1 < final_pivot_idx {
        open_partition(items, left, final_pivot_idx - 1, pending)
    } else if let Some((next_left, next_right)) = pending.pop() {
        open_partition(items, next_left, next_right, pending)
    } else {
        info!("sorting completed");
        done_state(items)
    }
}

/// Consumes one boolean answer to the currently displayed pivot-vs-compare
/// pair and computes the next walk state. The input state is left untouched.
///
/// Calling this on a terminal state is a usage error: it is reported and the
/// state comes back unchanged.
pub fn advance(state: &SortWalkState, pivot_is_bigger: bool) -> SortWalkState {
    if state.phase == Phase::Done {
        error!("advance called on a finished sort walk");
        return state.clone();
    }

    let mut items = state.items.clone();
    let left = state.left as usize;
    let right = state.right as usize;

    record_answer(&mut items, state.pivot_idx, state.compare_idx, pivot_is_bigger);

    if let Some(compare_idx) = next_unresolved_index(&items, left, right, state.pivot_idx) {
        return SortWalkState {
            items,
            compare_idx,
            pending: state.pending.clone(),
            ..*state
        };
    }

    if is_fully_ordered(&items, left, right) {
        sort_by_relations(&mut items, left, right);
        if state.pending.is_empty() {
            info!("sorting completed");
            return done_state(items);
        }
        // The pivot's pre-sort index stands in as the split point.
        return transition(items, state.pivot_idx, left, right, state.pending.clone());
    }

    let final_pivot_idx = partition(&mut items, left, right, state.pivot_idx);
    transition(items, final_pivot_idx, left, right, state.pending.clone())
}
