use crate::{
    domain::{Board, BoardId, Card, List, OrgId},
    error::{Result, TaskifyError},
    storage::{record::BoardRecord, Storage},
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::{fs, sync::Mutex};
use tracing::debug;

/// File-based storage implementation.
///
/// Each board is one JSON document holding the board, its lists and their
/// cards. Writes go to a temporary file that is then renamed over the
/// original, so a command is either fully on disk or not at all.
pub struct FileStorage {
    root_path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStorage {
    const TASKIFY_DIR: &'static str = ".taskify";
    const BOARDS_DIR: &'static str = "boards";

    /// Creates a new FileStorage instance rooted at the given data directory
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            root_path: data_dir.as_ref().join(Self::TASKIFY_DIR),
            write_lock: Mutex::new(()),
        }
    }

    fn boards_dir(&self) -> PathBuf {
        self.root_path.join(Self::BOARDS_DIR)
    }

    fn board_file(&self, id: &BoardId) -> PathBuf {
        self.boards_dir().join(format!("{}.json", id))
    }

    async fn ensure_directory_exists(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).await?;
        }
        Ok(())
    }

    async fn read_record(&self, id: &BoardId) -> Result<BoardRecord> {
        let file_path = self.board_file(id);

        if !file_path.exists() {
            return Err(TaskifyError::BoardNotFound(id.to_string()));
        }

        let contents = fs::read_to_string(&file_path).await?;
        let record: BoardRecord = serde_json::from_str(&contents)?;

        Ok(record)
    }

    async fn write_record(&self, record: &BoardRecord) -> Result<()> {
        self.ensure_directory_exists(&self.boards_dir()).await?;

        let json = serde_json::to_string_pretty(record)?;
        let file_path = self.board_file(&record.board.id);
        let tmp_path = file_path.with_extension("json.tmp");

        fs::write(&tmp_path, json).await?;
        fs::rename(&tmp_path, &file_path).await?;
        Ok(())
    }

    /// Read-modify-write of one board under the write lock
    async fn update_record<T, F>(&self, id: &BoardId, f: F) -> Result<T>
    where
        F: FnOnce(&mut BoardRecord) -> Result<T> + Send,
        T: Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut record = self.read_record(id).await?;
        let value = f(&mut record)?;
        self.write_record(&record).await?;
        Ok(value)
    }

    async fn read_all_records(&self) -> Result<Vec<BoardRecord>> {
        let boards_dir = self.boards_dir();

        if !boards_dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries = fs::read_dir(&boards_dir).await?;
        let mut records = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("json") {
                let contents = fs::read_to_string(&path).await?;
                records.push(serde_json::from_str::<BoardRecord>(&contents)?);
            }
        }

        Ok(records)
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn initialize(&self) -> Result<()> {
        self.ensure_directory_exists(&self.root_path).await?;
        self.ensure_directory_exists(&self.boards_dir()).await?;

        let gitignore_path = self.root_path.join(".gitignore");
        if !gitignore_path.exists() {
            fs::write(gitignore_path, "# Interrupted writes\n*.tmp\n").await?;
        }

        Ok(())
    }

    async fn save_board(&self, board: &Board) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let record = match self.read_record(&board.id).await {
            Ok(mut record) => {
                record.board = board.clone();
                record
            }
            Err(TaskifyError::BoardNotFound(_)) => BoardRecord::new(board.clone()),
            Err(e) => return Err(e),
        };
        self.write_record(&record).await
    }

    async fn load_board(&self, id: &BoardId) -> Result<Board> {
        Ok(self.read_record(id).await?.board)
    }

    async fn list_boards(&self, org_id: &OrgId) -> Result<Vec<Board>> {
        let mut boards: Vec<Board> = self
            .read_all_records()
            .await?
            .into_iter()
            .map(|record| record.board)
            .filter(|board| board.is_owned_by(org_id))
            .collect();
        boards.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(boards)
    }

    async fn delete_board(&self, id: &BoardId) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let file_path = self.board_file(id);

        if !file_path.exists() {
            return Err(TaskifyError::BoardNotFound(id.to_string()));
        }

        fs::remove_file(file_path).await?;
        debug!(board_id = %id, "Deleted board file");
        Ok(())
    }

    async fn save_list(&self, list: &List) -> Result<()> {
        self.update_record(&list.board_id, |record| record.upsert_list(list))
            .await
    }

    async fn save_card(&self, board_id: &BoardId, card: &Card) -> Result<()> {
        self.update_record(board_id, |record| record.upsert_card(card))
            .await
    }

    async fn load_lists(&self, board_id: &BoardId) -> Result<Vec<List>> {
        Ok(self.read_record(board_id).await?.sorted_lists())
    }

    async fn update_list_order(&self, board_id: &BoardId, items: &[List]) -> Result<Vec<List>> {
        self.update_record(board_id, |record| record.apply_list_order(items))
            .await
    }

    async fn update_card_order(&self, board_id: &BoardId, items: &[Card]) -> Result<Vec<Card>> {
        self.update_record(board_id, |record| record.apply_card_order(items))
            .await
    }

    async fn is_initialized(&self) -> bool {
        self.root_path.exists() && self.boards_dir().exists()
    }
}
