use thiserror::Error;

pub type Result<T> = std::result::Result<T, KanbanError>;

#[derive(Debug, Error)]
pub enum KanbanError {
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Invalid item ID: {0:?}")]
    InvalidItemId(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Duplicate column id: {0}")]
    DuplicateColumn(String),

    #[error("Duplicate item id: {0}")]
    DuplicateItem(String),

    #[error("Column {column} is at its WIP limit of {limit}")]
    ColumnFull { column: String, limit: usize },

    #[error("Column {0} has no rank left after its last item")]
    RankOverflow(String),

    #[error("Board not initialized")]
    BoardNotInitialized,

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
