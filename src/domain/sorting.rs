use crate::domain::board::ColumnId;
use crate::domain::item::{Item, ItemId};

/// Sorts items ascending by their rank.
///
/// The sort is stable, so items sharing a rank keep their relative position.
///
/// # Examples
/// ```
/// use kanban_core::domain::item::Item;
/// use kanban_core::domain::sorting::sort_by_order;
///
/// let mut items: Vec<Item> = vec![
///     Item::new("b", "B", "todo", 2),
///     Item::new("a", "A", "todo", 0),
///     Item::new("c", "C", "todo", 1),
/// ];
///
/// sort_by_order(&mut items);
/// assert_eq!(items[0].id.as_str(), "a");
/// ```
pub fn sort_by_order<T>(items: &mut [Item<T>]) {
    items.sort_by_key(|item| item.order);
}

/// Rank an item appended to `column` would take: one past the highest
/// existing rank, or `0` for an empty column. `None` when the highest rank
/// is already `i64::MAX`.
pub fn next_order<'a, T: 'a>(
    items: impl IntoIterator<Item = &'a Item<T>>,
    column: &ColumnId,
) -> Option<i64> {
    match items
        .into_iter()
        .filter(|item| item.is_in(column))
        .map(|item| item.order)
        .max()
    {
        Some(max) => max.checked_add(1),
        None => Some(0),
    }
}

/// Moves `item_id` to rank `new_order` within `column` and shifts the items
/// between its old and new rank by one slot to close the gap.
///
/// Moving down the ranks (`old < new`) decrements siblings in `(old, new]`;
/// moving up (`old > new`) increments siblings in `[new, old)`. Items outside
/// that range, and items in other columns, are left alone.
pub fn rank_shift<T>(
    items: &mut [Item<T>],
    item_id: &ItemId,
    column: &ColumnId,
    old_order: i64,
    new_order: i64,
) {
    for item in items.iter_mut() {
        if &item.id == item_id {
            item.order = new_order;
            continue;
        }
        if !item.is_in(column) {
            continue;
        }
        if old_order < new_order && item.order > old_order && item.order <= new_order {
            item.order -= 1;
        } else if old_order > new_order && item.order >= new_order && item.order < old_order {
            item.order += 1;
        }
    }
}
