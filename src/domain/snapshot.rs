use std::collections::HashMap;

use crate::domain::board::ColumnId;
use crate::domain::item::{Item, ItemId};

/// Placements (column and rank) of a set of items, captured before an
/// optimistic change so the change can be rolled back as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementSnapshot {
    placements: HashMap<ItemId, (ColumnId, i64)>,
}

impl PlacementSnapshot {
    /// Captures the placement of a single item
    pub fn of_item<T>(item: &Item<T>) -> Self {
        let mut placements = HashMap::new();
        placements.insert(item.id.clone(), (item.column_id.clone(), item.order));
        Self { placements }
    }

    /// Captures the placement of every item currently in `column`
    pub fn of_column<T>(items: &[Item<T>], column: &ColumnId) -> Self {
        let placements = items
            .iter()
            .filter(|item| item.is_in(column))
            .map(|item| (item.id.clone(), (item.column_id.clone(), item.order)))
            .collect();
        Self { placements }
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Writes the captured placements back. Items removed since the capture
    /// are skipped; items added since are left as they are. Returns the
    /// number of items restored.
    pub fn restore<T>(&self, items: &mut [Item<T>]) -> usize {
        let mut restored = 0;
        for item in items.iter_mut() {
            if let Some((column_id, order)) = self.placements.get(&item.id) {
                item.column_id = column_id.clone();
                item.order = *order;
                restored += 1;
            }
        }
        restored
    }

    /// Writes back only the ranks of items that are still in the column they
    /// were captured in. Items moved elsewhere since the capture keep their
    /// newer placement.
    pub fn restore_ranks<T>(&self, items: &mut [Item<T>]) -> usize {
        let mut restored = 0;
        for item in items.iter_mut() {
            if let Some((column_id, order)) = self.placements.get(&item.id) {
                if item.is_in(column_id) {
                    item.order = *order;
                    restored += 1;
                }
            }
        }
        restored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restore_single_item() {
        let mut items: Vec<Item> = vec![Item::new("1", "A", "todo", 4)];
        let snapshot = PlacementSnapshot::of_item(&items[0]);

        items[0].column_id = ColumnId::from("done");
        items[0].order = 0;

        assert_eq!(snapshot.restore(&mut items), 1);
        assert_eq!(items[0].column_id.as_str(), "todo");
        assert_eq!(items[0].order, 4);
    }

    #[test]
    fn test_column_snapshot_ignores_other_columns() {
        let items: Vec<Item> = vec![
            Item::new("1", "A", "todo", 0),
            Item::new("2", "B", "todo", 1),
            Item::new("3", "C", "done", 0),
        ];

        let snapshot = PlacementSnapshot::of_column(&items, &ColumnId::from("todo"));
        assert_eq!(snapshot.len(), 2);
    }

    #[test]
    fn test_restore_skips_removed_items() {
        let mut items: Vec<Item> = vec![
            Item::new("1", "A", "todo", 0),
            Item::new("2", "B", "todo", 1),
        ];
        let snapshot = PlacementSnapshot::of_column(&items, &ColumnId::from("todo"));

        items.remove(0);
        items[0].order = 9;
        items.push(Item::new("3", "C", "todo", 5));

        assert_eq!(snapshot.restore(&mut items), 1);
        assert_eq!(items[0].order, 1);
        assert_eq!(items[1].order, 5);
    }

    #[test]
    fn test_restore_ranks_keeps_items_moved_away() {
        let mut items: Vec<Item> = vec![
            Item::new("1", "A", "todo", 0),
            Item::new("2", "B", "todo", 1),
        ];
        let snapshot = PlacementSnapshot::of_column(&items, &ColumnId::from("todo"));

        items[0].order = 1;
        items[1].column_id = ColumnId::from("done");
        items[1].order = 3;

        assert_eq!(snapshot.restore_ranks(&mut items), 1);
        assert_eq!(items[0].order, 0);
        assert_eq!(items[1].column_id.as_str(), "done");
        assert_eq!(items[1].order, 3);
    }
}
