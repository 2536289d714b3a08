use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

use super::board::ColumnId;

/// Caller-defined fields carried by an item. The controller never reads them.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// Opaque, stable identifier for a board item
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ItemId {
    type Err = crate::error::KanbanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(crate::error::KanbanError::InvalidItemId(s.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A unit of work placed on the board.
///
/// `column_id` and `order` describe the item's placement and are owned by the
/// controller's move and reorder operations. `extra` is passed through
/// untouched and is flattened next to the placement fields when serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item<T = Fields> {
    pub id: ItemId,
    pub title: String,
    pub column_id: ColumnId,
    pub order: i64,
    #[serde(flatten)]
    pub extra: T,
}

impl<T: Default> Item<T> {
    /// Creates an item with default extra fields
    pub fn new(
        id: impl Into<ItemId>,
        title: impl Into<String>,
        column_id: impl Into<ColumnId>,
        order: i64,
    ) -> Self {
        Self::with_extra(id, title, column_id, order, T::default())
    }
}

impl<T> Item<T> {
    /// Creates an item carrying caller-defined fields
    pub fn with_extra(
        id: impl Into<ItemId>,
        title: impl Into<String>,
        column_id: impl Into<ColumnId>,
        order: i64,
        extra: T,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            column_id: column_id.into(),
            order,
            extra,
        }
    }

    /// Checks if the item sits in the given column
    pub fn is_in(&self, column_id: &ColumnId) -> bool {
        &self.column_id == column_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_id_parsing() {
        let id = ItemId::from_str(" task-7 ").unwrap();
        assert_eq!(id.as_str(), "task-7");

        assert!(ItemId::from_str("").is_err());
        assert!(ItemId::from_str("   ").is_err());
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = ItemId::generate();
        let b = ItemId::generate();
        assert_ne!(a, b);
        assert!(!a.as_str().is_empty());
    }

    #[test]
    fn test_item_serialization_flattens_extra_fields() {
        let mut extra = Fields::new();
        extra.insert("priority".to_string(), json!("High"));
        let item = Item::with_extra("1", "Implement Auth Flow", "in-progress", 2, extra);

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["id"], "1");
        assert_eq!(value["columnId"], "in-progress");
        assert_eq!(value["order"], 2);
        assert_eq!(value["priority"], "High");
    }

    #[test]
    fn test_item_deserialization_keeps_unknown_fields() {
        let raw = r#"{
            "id": "4",
            "title": "Deploy to Staging",
            "columnId": "done",
            "order": 0,
            "projectName": "DevOps",
            "assigneeInitials": "JD"
        }"#;

        let item: Item = serde_json::from_str(raw).unwrap();
        assert_eq!(item.id.as_str(), "4");
        assert_eq!(item.column_id.as_str(), "done");
        assert_eq!(item.extra["projectName"], "DevOps");
        assert_eq!(item.extra.len(), 2);
    }

    #[test]
    fn test_is_in() {
        let item: Item = Item::new("1", "Design System Audit", "backlog", 0);
        assert!(item.is_in(&ColumnId::from("backlog")));
        assert!(!item.is_in(&ColumnId::from("done")));
    }
}
