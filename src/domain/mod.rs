pub mod board;
pub mod item;
pub mod snapshot;
pub mod sorting;

pub use board::{BoardConfig, Column, ColumnId};
pub use item::{Fields, Item, ItemId};
pub use snapshot::PlacementSnapshot;
pub use sorting::{next_order, rank_shift, sort_by_order};
