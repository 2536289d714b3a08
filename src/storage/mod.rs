use crate::{
    domain::{ColumnId, Item},
    error::Result,
};
use async_trait::async_trait;

#[cfg(feature = "file-storage")]
pub mod file_storage;

/// Persistence collaborator the controller awaits after every optimistic
/// move or reorder. Returning an error makes the controller roll the change
/// back. Both hooks succeed by default, so implementors only override the
/// ones they persist.
///
/// Hooks receive the item as it stands after the optimistic change, not the
/// copy taken before it. Callers porting handlers that expect the old
/// placement should read it from the `from` column (moves) or keep their own
/// record of the previous rank (reorders).
#[async_trait]
pub trait Persistence<T>: Send + Sync
where
    T: Send + Sync,
{
    /// Persists a cross-column move. `item` already carries its new column and
    /// rank; its previous column is `from`.
    async fn on_item_move(&self, item: &Item<T>, from: &ColumnId, to: &ColumnId) -> Result<()> {
        let _ = (item, from, to);
        Ok(())
    }

    /// Persists a reorder within the item's column. `item.order` is already
    /// `new_order`.
    async fn on_item_reorder(&self, item: &Item<T>, new_order: i64) -> Result<()> {
        let _ = (item, new_order);
        Ok(())
    }
}
