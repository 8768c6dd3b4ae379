//! High score leaderboard
//!
//! The board holds the top 20 `{name, score}` entries. Persistence goes through
//! a [`ScoreStore`]; any store failure degrades to an empty board with a
//! logged warning.

use serde::{Deserialize, Serialize};

use crate::error::ScoreError;

/// Maximum number of high scores shown and kept
pub const MAX_SCORES: usize = 20;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u64,
}

impl ScoreEntry {
    pub fn new(name: impl Into<String>, score: u64) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// Ordered leaderboard (descending by score, ties keep insertion order)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBoard {
    pub entries: Vec<ScoreEntry>,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from arbitrary entries, sorting and trimming
    pub fn from_entries(mut entries: Vec<ScoreEntry>) -> Self {
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(MAX_SCORES);
        Self { entries }
    }

    /// Insert a score; returns the 1-based rank or None if it fell off the end
    pub fn insert(&mut self, entry: ScoreEntry) -> Option<usize> {
        let pos = self
            .entries
            .iter()
            .position(|e| entry.score > e.score)
            .unwrap_or(self.entries.len());
        if pos >= MAX_SCORES {
            return None;
        }
        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_SCORES);
        Some(pos + 1)
    }

    /// Top `n` entries
    pub fn top(&self, n: usize) -> Vec<ScoreEntry> {
        self.entries.iter().take(n).cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}

/// Display rows for the start-screen table: always `MAX_SCORES` rows,
/// missing ones shown as `---` with zero.
pub fn table_rows(entries: &[ScoreEntry]) -> Vec<(usize, String, u64)> {
    (0..MAX_SCORES)
        .map(|i| match entries.get(i) {
            Some(e) => (i + 1, e.name.clone(), e.score),
            None => (i + 1, "---".to_string(), 0),
        })
        .collect()
}

/// Score persistence contract
pub trait ScoreStore {
    /// Top `n` entries, best first
    fn load_top(&mut self, n: usize) -> Result<Vec<ScoreEntry>, ScoreError>;
    /// Record a score
    fn save(&mut self, name: &str, score: u64) -> Result<(), ScoreError>;
}

/// Volatile store (tests, headless runs)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    board: ScoreBoard,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<ScoreEntry>) -> Self {
        Self {
            board: ScoreBoard::from_entries(entries),
        }
    }
}

impl ScoreStore for MemoryStore {
    fn load_top(&mut self, n: usize) -> Result<Vec<ScoreEntry>, ScoreError> {
        Ok(self.board.top(n))
    }

    fn save(&mut self, name: &str, score: u64) -> Result<(), ScoreError> {
        self.board.insert(ScoreEntry::new(name, score));
        Ok(())
    }
}

/// Store that always fails (exercises the degraded path)
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineStore;

impl ScoreStore for OfflineStore {
    fn load_top(&mut self, _n: usize) -> Result<Vec<ScoreEntry>, ScoreError> {
        Err(ScoreError::Unavailable("offline".into()))
    }

    fn save(&mut self, _name: &str, _score: u64) -> Result<(), ScoreError> {
        Err(ScoreError::Unavailable("offline".into()))
    }
}

/// Browser LocalStorage store
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    const STORAGE_KEY: &'static str = "cosmic_parasite_highscores";

    fn storage() -> Result<web_sys::Storage, ScoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| ScoreError::Unavailable("no localStorage".into()))
    }

    fn read_board() -> Result<ScoreBoard, ScoreError> {
        let storage = Self::storage()?;
        match storage
            .get_item(Self::STORAGE_KEY)
            .map_err(|e| ScoreError::Storage(format!("{e:?}")))?
        {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(ScoreBoard::new()),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalStorageStore {
    fn load_top(&mut self, n: usize) -> Result<Vec<ScoreEntry>, ScoreError> {
        Ok(Self::read_board()?.top(n))
    }

    fn save(&mut self, name: &str, score: u64) -> Result<(), ScoreError> {
        let mut board = Self::read_board()?;
        board.insert(ScoreEntry::new(name, score));
        let json = serde_json::to_string(&board)?;
        Self::storage()?
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|e| ScoreError::Storage(format!("{e:?}")))
    }
}

/// JSON file store for native runs
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl JsonFileStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_board(&self) -> Result<ScoreBoard, ScoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ScoreBoard::new()),
            Err(e) => Err(ScoreError::Storage(e.to_string())),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ScoreStore for JsonFileStore {
    fn load_top(&mut self, n: usize) -> Result<Vec<ScoreEntry>, ScoreError> {
        Ok(self.read_board()?.top(n))
    }

    fn save(&mut self, name: &str, score: u64) -> Result<(), ScoreError> {
        let mut board = self.read_board()?;
        board.insert(ScoreEntry::new(name, score));
        let json = serde_json::to_string_pretty(&board)?;
        std::fs::write(&self.path, json).map_err(|e| ScoreError::Storage(e.to_string()))
    }
}

/// Cached view of the leaderboard backed by a store
pub struct ScoreManager {
    store: Box<dyn ScoreStore>,
    high_scores: Vec<ScoreEntry>,
}

impl ScoreManager {
    pub fn new(store: Box<dyn ScoreStore>) -> Self {
        Self {
            store,
            high_scores: Vec::new(),
        }
    }

    /// Reload the cached list. Failures leave an empty list.
    pub fn refresh(&mut self) -> &[ScoreEntry] {
        self.high_scores = match self.store.load_top(MAX_SCORES) {
            Ok(scores) => {
                log::info!("Loaded {} high scores", scores.len());
                scores
            }
            Err(e) => {
                log::warn!("Failed to load high scores: {e}");
                Vec::new()
            }
        };
        &self.high_scores
    }

    /// Save a score and reload the list. Returns whether the save succeeded.
    pub fn submit(&mut self, name: &str, score: u64) -> bool {
        let saved = match self.store.save(name, score) {
            Ok(()) => {
                log::info!("High score saved: {name} {score}");
                true
            }
            Err(e) => {
                log::warn!("Failed to save high score: {e}");
                false
            }
        };
        self.refresh();
        saved
    }

    pub fn high_scores(&self) -> &[ScoreEntry] {
        &self.high_scores
    }
}

impl Default for ScoreManager {
    fn default() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_descending_order() {
        let mut board = ScoreBoard::new();
        assert_eq!(board.insert(ScoreEntry::new("A", 100)), Some(1));
        assert_eq!(board.insert(ScoreEntry::new("B", 300)), Some(1));
        assert_eq!(board.insert(ScoreEntry::new("C", 200)), Some(2));
        let scores: Vec<u64> = board.entries.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![300, 200, 100]);
        assert_eq!(board.top_score(), Some(300));
    }

    #[test]
    fn test_board_caps_at_max() {
        let mut board = ScoreBoard::new();
        for i in 0..(MAX_SCORES as u64 + 5) {
            board.insert(ScoreEntry::new("X", i * 10 + 10));
        }
        assert_eq!(board.entries.len(), MAX_SCORES);
        // Lower than everything on a full board
        assert_eq!(board.insert(ScoreEntry::new("LOW", 0)), None);
    }

    #[test]
    fn test_table_rows_pad_missing() {
        let rows = table_rows(&[ScoreEntry::new("ACE", 500)]);
        assert_eq!(rows.len(), MAX_SCORES);
        assert_eq!(rows[0], (1, "ACE".to_string(), 500));
        assert_eq!(rows[19], (20, "---".to_string(), 0));
    }

    #[test]
    fn test_manager_degrades_to_empty() {
        let mut mgr = ScoreManager::new(Box::new(OfflineStore));
        assert!(mgr.refresh().is_empty());
        assert!(!mgr.submit("BOB", 100));
        assert!(mgr.high_scores().is_empty());
    }

    #[test]
    fn test_manager_submit_reloads() {
        let mut mgr = ScoreManager::new(Box::new(MemoryStore::with_entries(vec![
            ScoreEntry::new("OLD", 50),
        ])));
        mgr.refresh();
        assert_eq!(mgr.high_scores().len(), 1);
        assert!(mgr.submit("NEW", 900));
        assert_eq!(mgr.high_scores()[0], ScoreEntry::new("NEW", 900));
    }

    #[test]
    fn test_json_file_store_roundtrip_and_missing_file() {
        let dir = std::env::temp_dir().join(format!("cosmic_parasite_scores_{}", std::process::id()));
        let _ = std::fs::create_dir_all(&dir);
        let path = dir.join("scores.json");
        let _ = std::fs::remove_file(&path);

        let mut store = JsonFileStore::new(&path);
        assert!(store.load_top(MAX_SCORES).unwrap().is_empty());
        store.save("ZED", 42).unwrap();
        let top = store.load_top(MAX_SCORES).unwrap();
        assert_eq!(top, vec![ScoreEntry::new("ZED", 42)]);

        let _ = std::fs::remove_file(&path);
    }
}
