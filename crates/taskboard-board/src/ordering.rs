//! Ordering utility.
//!
//! Pure list helpers that keep sibling `order` values a contiguous `0..n-1`
//! sequence matching display position. Every reorder or move path, local or
//! remote, rebalances through [`shift_orders_for_update`]; the other helpers
//! are compositions of it.

use taskboard_types::{Subtask, SubtaskId, Task, TaskId};

use crate::{BoardError, Result};

/// Something with an id and a position among its siblings.
pub trait Ordered {
    type Id: PartialEq + std::fmt::Debug;

    fn id(&self) -> &Self::Id;
    fn order(&self) -> u32;
    fn set_order(&mut self, order: u32);
}

impl Ordered for Task {
    type Id = TaskId;

    fn id(&self) -> &TaskId {
        &self.id
    }

    fn order(&self) -> u32 {
        self.order
    }

    fn set_order(&mut self, order: u32) {
        self.order = order;
    }
}

impl Ordered for Subtask {
    type Id = SubtaskId;

    fn id(&self) -> &SubtaskId {
        &self.id
    }

    fn order(&self) -> u32 {
        self.order
    }

    fn set_order(&mut self, order: u32) {
        self.order = order;
    }
}

/// Move the element at `from` to `to`, keeping everything else in relative order.
///
/// `order` fields are left alone; call [`renumber`] afterwards.
pub fn reorder_within_list<T: Clone>(list: &[T], from: usize, to: usize) -> Result<Vec<T>> {
    let len = list.len();
    if from >= len {
        return Err(BoardError::IndexOutOfRange { index: from, len });
    }
    if to >= len {
        return Err(BoardError::IndexOutOfRange { index: to, len });
    }

    let mut result = list.to_vec();
    let moved = result.remove(from);
    result.insert(to, moved);
    Ok(result)
}

/// Remove the element at `source_index` from `source` and insert it into
/// `dest` at `dest_index`.
///
/// The caller updates the moved element's status and renumbers both lists.
pub fn move_between_lists<T: Clone>(
    source: &[T],
    dest: &[T],
    source_index: usize,
    dest_index: usize,
) -> Result<(Vec<T>, Vec<T>)> {
    if source_index >= source.len() {
        return Err(BoardError::IndexOutOfRange { index: source_index, len: source.len() });
    }
    if dest_index > dest.len() {
        return Err(BoardError::IndexOutOfRange { index: dest_index, len: dest.len() });
    }

    let mut new_source = source.to_vec();
    let mut new_dest = dest.to_vec();
    let moved = new_source.remove(source_index);
    new_dest.insert(dest_index, moved);
    Ok((new_source, new_dest))
}

/// Set every element's order to its index.
pub fn renumber<T: Ordered>(list: &mut [T]) {
    for (index, item) in list.iter_mut().enumerate() {
        item.set_order(index as u32);
    }
}

/// Make room for a sibling whose order changed from `old_order` to `new_order`.
///
/// Moving up (`new < old`): siblings in `[new, old)` shift down one slot
/// (order + 1). Moving down (`new > old`): siblings in `(old, new]` shift up
/// (order - 1). The subject itself is skipped; the list is re-sorted by order.
pub fn shift_orders_for_update<T: Ordered>(
    siblings: &mut [T],
    subject: &T::Id,
    old_order: u32,
    new_order: u32,
) {
    if new_order < old_order {
        for sibling in siblings.iter_mut().filter(|s| s.id() != subject) {
            let order = sibling.order();
            if order >= new_order && order < old_order {
                sibling.set_order(order + 1);
            }
        }
    } else if new_order > old_order {
        for sibling in siblings.iter_mut().filter(|s| s.id() != subject) {
            let order = sibling.order();
            if order > old_order && order <= new_order {
                sibling.set_order(order - 1);
            }
        }
    }

    siblings.sort_by_key(|s| s.order());
}

/// Give the element `id` a new order, clamped to the list, and rebalance.
///
/// Returns the order actually applied, or `None` if `id` isn't in the list.
pub fn move_to_order<T: Ordered>(list: &mut [T], id: &T::Id, new_order: u32) -> Option<u32> {
    let last = list.len().checked_sub(1)? as u32;
    let target = new_order.min(last);
    let subject = list.iter_mut().find(|item| item.id() == id)?;
    let old_order = subject.order();
    subject.set_order(target);
    shift_orders_for_update(list, id, old_order, target);
    Some(target)
}

/// Insert `item` at its own `order` (clamped to the end), making room.
///
/// Treated as a move from position `n` (just past the end) to the requested
/// slot. Returns the order the item ended up with.
pub fn insert_at_order<T: Ordered>(list: &mut Vec<T>, mut item: T) -> u32
where
    T::Id: Clone,
{
    let end = list.len() as u32;
    let target = item.order().min(end);
    let id = item.id().clone();
    item.set_order(target);
    list.push(item);
    shift_orders_for_update(list, &id, end, target);
    target
}

/// Remove `id` and close the gap it leaves behind.
pub fn remove_closing_gap<T: Ordered>(list: &mut Vec<T>, id: &T::Id) -> Option<T> {
    let last = list.len().checked_sub(1)? as u32;
    move_to_order(list, id, last)?;
    let position = list.iter().position(|item| item.id() == id)?;
    Some(list.remove(position))
}

/// Remove `id` without touching any other order.
pub fn remove_leaving_gap<T: Ordered>(list: &mut Vec<T>, id: &T::Id) -> Option<T> {
    let position = list.iter().position(|item| item.id() == id)?;
    Some(list.remove(position))
}

/// Whether orders are exactly `0..n-1` in list order.
pub fn is_contiguous<T: Ordered>(list: &[T]) -> bool {
    list.iter().enumerate().all(|(index, item)| item.order() == index as u32)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use taskboard_types::GroupKey;

    fn tasks(ids: &[&str]) -> Vec<Task> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| Task::new(*id, id.to_uppercase(), GroupKey::Todo, i as u32))
            .collect()
    }

    fn ids(list: &[Task]) -> Vec<&str> {
        list.iter().map(|t| t.id.as_str()).collect()
    }

    fn orders(list: &[Task]) -> Vec<u32> {
        list.iter().map(|t| t.order).collect()
    }

    #[test]
    fn test_reorder_last_to_first() {
        let list = tasks(&["a", "b", "c"]);
        let mut result = reorder_within_list(&list, 2, 0).unwrap();
        renumber(&mut result);
        assert_eq!(ids(&result), ["c", "a", "b"]);
        assert_eq!(orders(&result), [0, 1, 2]);
        // input untouched
        assert_eq!(ids(&list), ["a", "b", "c"]);
    }

    #[test]
    fn test_reorder_same_index_is_identity() {
        let list = tasks(&["a", "b", "c"]);
        assert_eq!(reorder_within_list(&list, 1, 1).unwrap(), list);
    }

    #[test]
    fn test_reorder_out_of_range() {
        let list = tasks(&["a"]);
        assert_eq!(
            reorder_within_list(&list, 0, 1),
            Err(BoardError::IndexOutOfRange { index: 1, len: 1 })
        );
        assert!(reorder_within_list::<Task>(&[], 0, 0).is_err());
    }

    #[test]
    fn test_move_between_lists() {
        let source = tasks(&["a", "b"]);
        let dest = tasks(&["x"]);
        let (mut s, mut d) = move_between_lists(&source, &dest, 0, 1).unwrap();
        renumber(&mut s);
        renumber(&mut d);
        assert_eq!(ids(&s), ["b"]);
        assert_eq!(ids(&d), ["x", "a"]);
        assert_eq!(orders(&s), [0]);
        assert_eq!(orders(&d), [0, 1]);
    }

    #[test]
    fn test_move_into_empty_list() {
        let (s, d) = move_between_lists(&tasks(&["a"]), &[], 0, 0).unwrap();
        assert!(s.is_empty());
        assert_eq!(ids(&d), ["a"]);
        assert!(move_between_lists(&tasks(&["a"]), &[], 0, 1).is_err());
    }

    #[test]
    fn test_shift_moving_up() {
        // x was at 2 and now claims 0
        let mut list = tasks(&["a", "b", "x"]);
        list[2].order = 0;
        shift_orders_for_update(&mut list, &TaskId::new("x"), 2, 0);
        assert_eq!(ids(&list), ["x", "a", "b"]);
        assert_eq!(orders(&list), [0, 1, 2]);
    }

    #[test]
    fn test_shift_moving_down() {
        let mut list = tasks(&["x", "a", "b", "c"]);
        list[0].order = 2;
        shift_orders_for_update(&mut list, &TaskId::new("x"), 0, 2);
        assert_eq!(ids(&list), ["a", "b", "x", "c"]);
        assert_eq!(orders(&list), [0, 1, 2, 3]);
    }

    #[test]
    fn test_shift_same_order_only_sorts() {
        let mut list = tasks(&["a", "b"]);
        list.swap(0, 1);
        shift_orders_for_update(&mut list, &TaskId::new("a"), 0, 0);
        assert_eq!(ids(&list), ["a", "b"]);
    }

    #[test]
    fn test_move_to_order_clamps() {
        let mut list = tasks(&["a", "b", "c"]);
        let applied = move_to_order(&mut list, &TaskId::new("a"), 40);
        assert_eq!(applied, Some(2));
        assert_eq!(ids(&list), ["b", "c", "a"]);
        assert!(is_contiguous(&list));
    }

    #[test]
    fn test_move_to_order_unknown_id() {
        let mut list = tasks(&["a"]);
        assert_eq!(move_to_order(&mut list, &TaskId::new("zz"), 0), None);
        assert_eq!(move_to_order(&mut Vec::<Task>::new(), &TaskId::new("a"), 0), None);
    }

    #[test]
    fn test_insert_at_order_makes_room() {
        let mut list = tasks(&["a", "b"]);
        let applied = insert_at_order(&mut list, Task::new("n", "N", GroupKey::Todo, 1));
        assert_eq!(applied, 1);
        assert_eq!(ids(&list), ["a", "n", "b"]);
        assert!(is_contiguous(&list));
    }

    #[test]
    fn test_insert_at_order_clamps_to_end() {
        let mut list = tasks(&["a"]);
        let applied = insert_at_order(&mut list, Task::new("n", "N", GroupKey::Todo, 9));
        assert_eq!(applied, 1);
        assert_eq!(ids(&list), ["a", "n"]);
        assert!(is_contiguous(&list));
    }

    #[test]
    fn test_remove_closing_gap() {
        let mut list = tasks(&["a", "b", "c"]);
        let removed = remove_closing_gap(&mut list, &TaskId::new("a")).unwrap();
        assert_eq!(removed.id, "a");
        assert_eq!(ids(&list), ["b", "c"]);
        assert!(is_contiguous(&list));
    }

    #[test]
    fn test_remove_leaving_gap() {
        let mut list = tasks(&["a", "b", "c"]);
        remove_leaving_gap(&mut list, &TaskId::new("b")).unwrap();
        assert_eq!(orders(&list), [0, 2]);
        assert!(!is_contiguous(&list));
        assert!(remove_leaving_gap(&mut list, &TaskId::new("b")).is_none());
    }

    #[test]
    fn test_subtasks_share_the_algorithm() {
        let mut list = vec![
            Subtask::new("s0", "zero", GroupKey::Todo, 0),
            Subtask::new("s1", "one", GroupKey::Todo, 1),
        ];
        move_to_order(&mut list, &SubtaskId::new("s1"), 0);
        assert_eq!(list[0].id, "s1");
        assert!(is_contiguous(&list));
    }
}
