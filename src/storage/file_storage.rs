use crate::{
    domain::{BoardConfig, ColumnId, Item, ItemId},
    error::{KanbanError, Result},
    storage::Persistence,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Last persisted column and rank of an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub id: ItemId,
    pub column_id: ColumnId,
    pub order: i64,
    pub updated_at: DateTime<Utc>,
}

impl Placement {
    fn of<T>(item: &Item<T>, order: i64) -> Self {
        Self {
            id: item.id.clone(),
            column_id: item.column_id.clone(),
            order,
            updated_at: Utc::now(),
        }
    }
}

/// File-based persistence: the board configuration plus one placement file
/// per item
pub struct FileStorage {
    root_path: PathBuf,
}

impl FileStorage {
    const KANBAN_DIR: &'static str = ".kanban";
    const ITEMS_DIR: &'static str = "items";
    const BOARD_FILE: &'static str = "board.json";

    /// Creates a new FileStorage instance for the given project root
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            root_path: project_root.as_ref().join(Self::KANBAN_DIR),
        }
    }

    fn items_dir(&self) -> PathBuf {
        self.root_path.join(Self::ITEMS_DIR)
    }

    fn board_file(&self) -> PathBuf {
        self.root_path.join(Self::BOARD_FILE)
    }

    fn placement_file(&self, id: &ItemId) -> Result<PathBuf> {
        let name = id.as_str();
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(KanbanError::InvalidItemId(name.to_string()));
        }
        Ok(self.items_dir().join(format!("{}.json", name)))
    }

    async fn ensure_directory_exists(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).await?;
        }
        Ok(())
    }

    /// Creates the directory layout and a default board if none exists
    pub async fn initialize(&self) -> Result<()> {
        self.ensure_directory_exists(&self.root_path).await?;
        self.ensure_directory_exists(&self.items_dir()).await?;

        if !self.board_file().exists() {
            self.save_board(&BoardConfig::default()).await?;
        }

        Ok(())
    }

    pub async fn is_initialized(&self) -> bool {
        self.root_path.exists() && self.board_file().exists()
    }

    /// Saves the board configuration
    pub async fn save_board(&self, config: &BoardConfig) -> Result<()> {
        config.validate()?;
        self.ensure_directory_exists(&self.root_path).await?;

        let json = serde_json::to_string_pretty(config)?;
        fs::write(self.board_file(), json).await?;

        Ok(())
    }

    /// Loads and validates the board configuration
    pub async fn load_board(&self) -> Result<BoardConfig> {
        let board_file = self.board_file();

        if !board_file.exists() {
            return Err(KanbanError::BoardNotInitialized);
        }

        let contents = fs::read_to_string(&board_file).await?;
        BoardConfig::from_json(&contents)
    }

    async fn save_placement(&self, placement: &Placement) -> Result<()> {
        let file_path = self.placement_file(&placement.id)?;
        self.ensure_directory_exists(&self.items_dir()).await?;

        let json = serde_json::to_string_pretty(placement)?;
        fs::write(&file_path, json).await?;
        debug!(item = %placement.id, path = %file_path.display(), "placement saved");
        Ok(())
    }

    /// Loads the last persisted placement of an item
    pub async fn load_placement(&self, id: &ItemId) -> Result<Placement> {
        let file_path = self.placement_file(id)?;

        if !file_path.exists() {
            return Err(KanbanError::ItemNotFound(id.to_string()));
        }

        let contents = fs::read_to_string(&file_path).await?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Lists every persisted placement, sorted by column then rank
    pub async fn list_placements(&self) -> Result<Vec<Placement>> {
        let items_dir = self.items_dir();

        if !items_dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries = fs::read_dir(&items_dir).await?;
        let mut placements = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("json") {
                let contents = fs::read_to_string(&path).await?;
                placements.push(serde_json::from_str::<Placement>(&contents)?);
            }
        }

        placements.sort_by(|a, b| {
            a.column_id
                .cmp(&b.column_id)
                .then(a.order.cmp(&b.order))
        });
        Ok(placements)
    }
}

#[async_trait]
impl<T> Persistence<T> for FileStorage
where
    T: Send + Sync,
{
    async fn on_item_move(&self, item: &Item<T>, _from: &ColumnId, _to: &ColumnId) -> Result<()> {
        self.save_placement(&Placement::of(item, item.order)).await
    }

    async fn on_item_reorder(&self, item: &Item<T>, new_order: i64) -> Result<()> {
        self.save_placement(&Placement::of(item, new_order)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::KanbanController;
    use crate::domain::Column;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_storage_initialization() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        assert!(!storage.is_initialized().await);

        storage.initialize().await.unwrap();

        assert!(storage.is_initialized().await);
        assert!(storage.items_dir().exists());
        assert_eq!(storage.load_board().await.unwrap(), BoardConfig::default());
    }

    #[tokio::test]
    async fn test_load_board_before_initialize() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        assert!(matches!(
            storage.load_board().await,
            Err(KanbanError::BoardNotInitialized)
        ));
    }

    #[tokio::test]
    async fn test_board_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        storage.initialize().await.unwrap();

        let config = BoardConfig::new(
            "Support",
            vec![
                Column::new("open", "Open"),
                Column::new("waiting", "Waiting").with_limit(4),
            ],
        );
        storage.save_board(&config).await.unwrap();

        assert_eq!(storage.load_board().await.unwrap(), config);
    }

    #[tokio::test]
    async fn test_save_board_rejects_invalid_config() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        let config = BoardConfig::new("Empty", Vec::new());
        assert!(storage.save_board(&config).await.is_err());
        assert!(!storage.is_initialized().await);
    }

    #[tokio::test]
    async fn test_placement_rejects_path_like_ids() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        for bad in ["../board", "a/b", ".hidden"] {
            assert!(matches!(
                storage.load_placement(&ItemId::from(bad)).await,
                Err(KanbanError::InvalidItemId(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_controller_persists_moves_and_reorders() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Arc::new(FileStorage::new(temp_dir.path()));
        storage.initialize().await.unwrap();

        let config = storage.load_board().await.unwrap();
        let controller: KanbanController = KanbanController::from_config(
            config,
            vec![
                Item::new("1", "Design System Audit", "backlog", 0),
                Item::new("2", "Update Documentation", "backlog", 1),
                Item::new("3", "Implement Auth Flow", "in-progress", 0),
            ],
        )
        .unwrap()
        .with_persistence(storage.clone());

        assert!(controller
            .move_item(&ItemId::from("1"), &ColumnId::from("in-progress"))
            .await
            .is_applied());
        assert!(controller
            .reorder_item(&ItemId::from("2"), 0)
            .await
            .is_applied());

        let moved = storage.load_placement(&ItemId::from("1")).await.unwrap();
        assert_eq!(moved.column_id.as_str(), "in-progress");
        assert_eq!(moved.order, 1);

        let placements = storage.list_placements().await.unwrap();
        let summary: Vec<(&str, &str, i64)> = placements
            .iter()
            .map(|p| (p.id.as_str(), p.column_id.as_str(), p.order))
            .collect();
        assert_eq!(summary, vec![("2", "backlog", 0), ("1", "in-progress", 1)]);
    }

    #[tokio::test]
    async fn test_failed_write_reverts_move() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Arc::new(FileStorage::new(temp_dir.path()));
        storage.initialize().await.unwrap();

        let controller: KanbanController = KanbanController::new(
            vec![Item::new(".draft", "Draft", "todo", 0)],
            vec![Column::new("todo", "To Do"), Column::new("done", "Done")],
        )
        .unwrap()
        .with_persistence(storage.clone());

        let outcome = controller
            .move_item(&ItemId::from(".draft"), &ColumnId::from("done"))
            .await;

        assert!(matches!(
            outcome,
            crate::controller::Outcome::Reverted(KanbanError::InvalidItemId(_))
        ));
        let item = controller.get_item(&ItemId::from(".draft")).unwrap();
        assert_eq!(item.column_id.as_str(), "todo");
        assert!(storage.list_placements().await.unwrap().is_empty());
    }
}
