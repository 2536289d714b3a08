//! Board state controller.
//!
//! [`KanbanController`] owns the items on a board and the board's fixed
//! columns. Moves and reorders are applied to local state immediately and
//! then handed to a [`Persistence`] collaborator; if the collaborator fails
//! the change is rolled back from a snapshot taken just before it was applied.
//!
//! The state lock is never held across the collaborator await, so concurrent
//! operations on one controller interleave and can observe each other's
//! optimistic state. Local state is last-write-wins.

use std::collections::HashSet;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, warn};

use crate::domain::board::validate_columns;
use crate::domain::{
    next_order, rank_shift, sort_by_order, BoardConfig, Column, ColumnId, Fields, Item, ItemId,
    PlacementSnapshot,
};
use crate::error::{KanbanError, Result};
use crate::storage::Persistence;

/// Result of a move or reorder
#[derive(Debug)]
pub enum Outcome {
    /// The change was applied and, if a collaborator is attached, persisted
    Applied,
    /// Nothing to do: unknown item, or the item is already where it was sent
    Unchanged,
    /// The change was refused before any state was touched
    Refused(KanbanError),
    /// The collaborator failed and the change was rolled back
    Reverted(KanbanError),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

#[derive(Debug)]
struct BoardState<T> {
    items: Vec<Item<T>>,
    is_dragging: bool,
    dragged_item: Option<Item<T>>,
}

impl<T> BoardState<T> {
    fn position(&self, item_id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == item_id)
    }

    fn count(&self, column: &ColumnId) -> usize {
        self.items.iter().filter(|item| item.is_in(column)).count()
    }
}

/// In-memory Kanban board with WIP limits and optimistic persistence
pub struct KanbanController<T = Fields>
where
    T: Send + Sync + 'static,
{
    columns: Vec<Column>,
    state: RwLock<BoardState<T>>,
    persistence: Option<Arc<dyn Persistence<T>>>,
}

impl<T> KanbanController<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates a controller over `columns` holding `initial_items`.
    ///
    /// Fails if two columns share an id, two items share an id, or an item
    /// references a column that is not on the board.
    pub fn new(initial_items: Vec<Item<T>>, columns: Vec<Column>) -> Result<Self> {
        validate_columns(&columns)?;

        let mut seen = HashSet::new();
        for item in &initial_items {
            if !seen.insert(&item.id) {
                return Err(KanbanError::DuplicateItem(item.id.to_string()));
            }
            if !columns.iter().any(|col| col.id == item.column_id) {
                return Err(KanbanError::ColumnNotFound(item.column_id.to_string()));
            }
        }

        Ok(Self {
            columns,
            state: RwLock::new(BoardState {
                items: initial_items,
                is_dragging: false,
                dragged_item: None,
            }),
            persistence: None,
        })
    }

    /// Creates a controller from a board configuration
    pub fn from_config(config: BoardConfig, initial_items: Vec<Item<T>>) -> Result<Self> {
        config.validate()?;
        Self::new(initial_items, config.columns)
    }

    /// Attaches the collaborator awaited after every move and reorder
    pub fn with_persistence(mut self, persistence: Arc<dyn Persistence<T>>) -> Self {
        self.persistence = Some(persistence);
        self
    }

    fn read(&self) -> RwLockReadGuard<'_, BoardState<T>> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, BoardState<T>> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns a copy of every item, in insertion order
    pub fn items(&self) -> Vec<Item<T>> {
        self.read().items.clone()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Gets the column configuration for an id
    pub fn find_column(&self, column_id: &ColumnId) -> Option<&Column> {
        self.columns.iter().find(|col| &col.id == column_id)
    }

    pub fn get_item(&self, item_id: &ItemId) -> Option<Item<T>> {
        let state = self.read();
        state.position(item_id).map(|index| state.items[index].clone())
    }

    /// Items in a column, ascending by rank
    pub fn get_column_items(&self, column_id: &ColumnId) -> Vec<Item<T>> {
        let mut items: Vec<Item<T>> = self
            .read()
            .items
            .iter()
            .filter(|item| item.is_in(column_id))
            .cloned()
            .collect();
        sort_by_order(&mut items);
        items
    }

    pub fn get_column_count(&self, column_id: &ColumnId) -> usize {
        self.read().count(column_id)
    }

    /// Checks if a column has reached its WIP limit. Unknown columns and
    /// columns without a limit are never full.
    pub fn is_column_full(&self, column_id: &ColumnId) -> bool {
        self.find_column(column_id)
            .map(|col| col.is_full_at(self.get_column_count(column_id)))
            .unwrap_or(false)
    }

    /// Moves an item to the end of another column.
    ///
    /// Refused without touching state when the destination is full or not on
    /// the board. The new placement is applied immediately; if the
    /// collaborator then fails, the item goes back to its original column and
    /// rank.
    pub async fn move_item(&self, item_id: &ItemId, to: &ColumnId) -> Outcome {
        let (moved, from, snapshot) = {
            let mut state = self.write();
            let Some(index) = state.position(item_id) else {
                return Outcome::Unchanged;
            };
            if state.items[index].is_in(to) {
                return Outcome::Unchanged;
            }

            let Some(column) = self.find_column(to) else {
                warn!(item = %item_id, column = %to, "move refused: column is not on the board");
                return Outcome::Refused(KanbanError::ColumnNotFound(to.to_string()));
            };
            if column.is_full_at(state.count(to)) {
                let limit = column.wip_limit().unwrap_or_default();
                warn!(item = %item_id, column = %to, limit, "move refused: column is at WIP limit");
                return Outcome::Refused(KanbanError::ColumnFull {
                    column: to.to_string(),
                    limit,
                });
            }

            let Some(order) = next_order(&state.items, to) else {
                warn!(item = %item_id, column = %to, "move refused: column has no rank left");
                return Outcome::Refused(KanbanError::RankOverflow(to.to_string()));
            };
            let item = &mut state.items[index];
            let snapshot = PlacementSnapshot::of_item(item);
            let from = std::mem::replace(&mut item.column_id, to.clone());
            item.order = order;
            (item.clone(), from, snapshot)
        };

        debug!(item = %item_id, from = %from, to = %to, order = moved.order, "item moved");

        let Some(persistence) = &self.persistence else {
            return Outcome::Applied;
        };
        match persistence.on_item_move(&moved, &from, to).await {
            Ok(()) => Outcome::Applied,
            Err(error) => {
                snapshot.restore(&mut self.write().items);
                warn!(item = %item_id, from = %from, to = %to, %error, "move reverted");
                Outcome::Reverted(error)
            }
        }
    }

    /// Moves an item to rank `new_order` within its column and shifts the
    /// siblings in between by one slot.
    ///
    /// If the collaborator fails, the ranks of the whole column are restored
    /// to what they were before the call.
    pub async fn reorder_item(&self, item_id: &ItemId, new_order: i64) -> Outcome {
        let (reordered, old_order, snapshot) = {
            let mut state = self.write();
            let Some(index) = state.position(item_id) else {
                return Outcome::Unchanged;
            };

            let column = state.items[index].column_id.clone();
            let old_order = state.items[index].order;
            let snapshot = PlacementSnapshot::of_column(&state.items, &column);
            rank_shift(&mut state.items, item_id, &column, old_order, new_order);
            (state.items[index].clone(), old_order, snapshot)
        };

        debug!(item = %item_id, column = %reordered.column_id, old_order, new_order, "item reordered");

        let Some(persistence) = &self.persistence else {
            return Outcome::Applied;
        };
        match persistence.on_item_reorder(&reordered, new_order).await {
            Ok(()) => Outcome::Applied,
            Err(error) => {
                let restored = snapshot.restore_ranks(&mut self.write().items);
                warn!(item = %item_id, restored, %error, "reorder reverted");
                Outcome::Reverted(error)
            }
        }
    }

    /// Adds an item. WIP limits are not checked; callers consult
    /// [`is_column_full`](Self::is_column_full) first if they care.
    ///
    /// Returns `false` if the id is already taken or the item's column is not
    /// on the board.
    pub fn add_item(&self, item: Item<T>) -> bool {
        if self.find_column(&item.column_id).is_none() {
            warn!(item = %item.id, column = %item.column_id, "add refused: column is not on the board");
            return false;
        }

        let mut state = self.write();
        if state.position(&item.id).is_some() {
            warn!(item = %item.id, "add refused: duplicate item id");
            return false;
        }
        debug!(item = %item.id, column = %item.column_id, order = item.order, "item added");
        state.items.push(item);
        true
    }

    /// Removes an item. Ranks of the remaining items are left as they are.
    pub fn remove_item(&self, item_id: &ItemId) -> Option<Item<T>> {
        let mut state = self.write();
        let index = state.position(item_id)?;
        debug!(item = %item_id, "item removed");
        Some(state.items.remove(index))
    }

    /// Updates an item's title and caller-defined fields.
    ///
    /// Placement is not reachable from here; use [`move_item`](Self::move_item)
    /// and [`reorder_item`](Self::reorder_item) for that. `update` runs on a
    /// copy with no lock held, so it may read the controller; the result is
    /// written back only if the item still exists. Returns `false` otherwise.
    pub fn update_item<F>(&self, item_id: &ItemId, update: F) -> bool
    where
        F: FnOnce(&mut String, &mut T),
    {
        let Some(Item {
            mut title,
            mut extra,
            ..
        }) = self.get_item(item_id)
        else {
            return false;
        };
        update(&mut title, &mut extra);

        let mut state = self.write();
        match state.position(item_id) {
            Some(index) => {
                let item = &mut state.items[index];
                item.title = title;
                item.extra = extra;
                true
            }
            None => false,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.read().is_dragging
    }

    pub fn set_dragging(&self, dragging: bool) {
        self.write().is_dragging = dragging;
    }

    pub fn dragged_item(&self) -> Option<Item<T>> {
        self.read().dragged_item.clone()
    }

    pub fn set_dragged_item(&self, item: Option<Item<T>>) {
        self.write().dragged_item = item;
    }
}
