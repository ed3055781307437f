//! Rank Arithmetic
//!
//! Pure helpers for moving entries and keeping ranks dense (1, 2, ..., N).

use std::collections::HashMap;

use crate::types::{OrderedItem, RankAssignment};

/// Final index of an element moved from `from` to the gap before `insert_at`.
///
/// `insert_at` is an index into the list *before* removal (0..=len).
/// Returns `None` when the move would leave the list unchanged.
pub fn move_index(from: usize, insert_at: usize) -> Option<usize> {
    if insert_at == from || insert_at == from + 1 {
        return None;
    }
    if insert_at > from {
        Some(insert_at - 1)
    } else {
        Some(insert_at)
    }
}

/// Remove at `from`, re-insert at `to` (splice semantics)
pub fn move_element<T>(items: &mut Vec<T>, from: usize, to: usize) {
    let moved = items.remove(from);
    items.insert(to, moved);
}

/// Assign contiguous 1-based ranks in list order
pub fn renumber(items: &mut [OrderedItem]) {
    for (idx, item) in items.iter_mut().enumerate() {
        item.rank = idx as u32 + 1;
    }
}

/// Order by rank, ties broken by id
pub fn sort_by_rank(items: &mut [OrderedItem]) {
    items.sort_by_key(|item| (item.rank, item.id));
}

/// Pairs of `after` whose rank differs from `before` (in `after` order)
pub fn changed_ranks(before: &[OrderedItem], after: &[OrderedItem]) -> Vec<RankAssignment> {
    let previous: HashMap<u32, u32> = before.iter().map(|item| (item.id, item.rank)).collect();
    after
        .iter()
        .filter(|item| previous.get(&item.id) != Some(&item.rank))
        .map(|item| RankAssignment { id: item.id, rank: item.rank })
        .collect()
}

/// True when the ranks are exactly {1, ..., N}
pub fn is_dense<I>(ranks: I) -> bool
where
    I: IntoIterator<Item = u32>,
{
    let mut ranks: Vec<u32> = ranks.into_iter().collect();
    ranks.sort_unstable();
    ranks.iter().enumerate().all(|(idx, rank)| *rank == idx as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(ids: &[u32]) -> Vec<OrderedItem> {
        ids.iter()
            .enumerate()
            .map(|(idx, id)| OrderedItem::new(*id, idx as u32 + 1, format!("Item {}", id)))
            .collect()
    }

    #[test]
    fn test_move_index_no_op_around_origin() {
        assert_eq!(move_index(1, 1), None);
        assert_eq!(move_index(1, 2), None);
    }

    #[test]
    fn test_move_index_adjusts_after_removal() {
        // [A, B, C]: A into the gap after C
        assert_eq!(move_index(0, 3), Some(2));
        // C into the gap before A
        assert_eq!(move_index(2, 0), Some(0));
        // A into the gap before C
        assert_eq!(move_index(0, 2), Some(1));
    }

    #[test]
    fn test_move_element_and_renumber() {
        let mut list = items(&[1, 2, 3, 4]);
        move_element(&mut list, 3, 1);
        renumber(&mut list);
        let order: Vec<(u32, u32)> = list.iter().map(|i| (i.id, i.rank)).collect();
        assert_eq!(order, vec![(1, 1), (4, 2), (2, 3), (3, 4)]);
    }

    #[test]
    fn test_changed_ranks_only_reports_moved_entries() {
        let before = items(&[1, 2, 3, 4]);
        let mut after = before.clone();
        move_element(&mut after, 2, 1);
        renumber(&mut after);
        assert_eq!(
            changed_ranks(&before, &after),
            vec![RankAssignment { id: 3, rank: 2 }, RankAssignment { id: 2, rank: 3 }]
        );
    }

    #[test]
    fn test_is_dense() {
        assert!(is_dense(Vec::new()));
        assert!(is_dense(vec![3, 1, 2]));
        assert!(!is_dense(vec![1, 3]));
        assert!(!is_dense(vec![1, 1, 2]));
        assert!(!is_dense(vec![0, 1]));
    }

    #[test]
    fn test_sort_by_rank_breaks_ties_by_id() {
        let mut list = vec![
            OrderedItem::new(9, 2, "x"),
            OrderedItem::new(5, 1, "y"),
            OrderedItem::new(2, 2, "z"),
        ];
        sort_by_rank(&mut list);
        let ids: Vec<u32> = list.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![5, 2, 9]);
    }
}
