use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt};

use crate::error::{KanbanError, Result};

/// Identifier of a board column (e.g., "todo", "in-progress")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(String);

impl ColumnId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ColumnId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ColumnId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A lane on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Work-in-progress limit. `None` means unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl Column {
    pub fn new(id: impl Into<ColumnId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            color: None,
            limit: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns the WIP limit, treating a zero limit as no limit at all
    pub fn wip_limit(&self) -> Option<usize> {
        self.limit.filter(|limit| *limit > 0)
    }

    /// Checks if `count` items reach this column's WIP limit
    pub fn is_full_at(&self, count: usize) -> bool {
        self.wip_limit().map(|limit| count >= limit).unwrap_or(false)
    }
}

/// Board configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub name: String,
    pub columns: Vec<Column>,
}

impl BoardConfig {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// Parses a board configuration from JSON and validates it
    pub fn from_json(json: &str) -> Result<Self> {
        let config: BoardConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations with no columns or with duplicate column ids
    pub fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(KanbanError::ConfigError(format!(
                "board '{}' has no columns",
                self.name
            )));
        }
        validate_columns(&self.columns)
    }

    /// Gets the column configuration for an id
    pub fn find_column(&self, id: &ColumnId) -> Option<&Column> {
        self.columns.iter().find(|col| &col.id == id)
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            name: "Project Board".to_string(),
            columns: vec![
                Column::new("backlog", "Backlog").with_color("#6b7280"),
                Column::new("todo", "To Do").with_color("#3b82f6"),
                Column::new("in-progress", "In Progress")
                    .with_color("#f59e0b")
                    .with_limit(5),
                Column::new("review", "Review")
                    .with_color("#8b5cf6")
                    .with_limit(3),
                Column::new("done", "Done").with_color("#10b981"),
            ],
        }
    }
}

/// Checks that no two columns share an id
pub(crate) fn validate_columns(columns: &[Column]) -> Result<()> {
    let mut seen = HashSet::new();
    for column in columns {
        if !seen.insert(&column.id) {
            return Err(KanbanError::DuplicateColumn(column.id.to_string()));
        }
    }
    Ok(())
}
