//! Disk-backed profile store and config loading.

use std::fs;
use std::path::{Path, PathBuf};

use bulwark_core::config::GameConfig;
use bulwark_sim::ProfileStore;

/// Profile blob kept in a single JSON file.
#[derive(Debug, Clone)]
pub struct FileProfileStore {
    path: PathBuf,
}

impl FileProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProfileStore for FileProfileStore {
    fn load(&self) -> Result<Option<String>, String> {
        if !self.path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&self.path)
            .map(Some)
            .map_err(|e| format!("Failed to read profile file: {e}"))
    }

    fn save(&mut self, blob: &str) -> Result<(), String> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .map_err(|e| format!("Failed to create profile directory: {e}"))?;
        }
        fs::write(&self.path, blob).map_err(|e| format!("Failed to write profile file: {e}"))
    }
}

/// Read a JSON config override. Missing sections keep their defaults.
pub fn load_game_config(path: &Path) -> Result<GameConfig, String> {
    let json = fs::read_to_string(path).map_err(|e| format!("Failed to read config file: {e}"))?;
    GameConfig::from_json(&json)
}
