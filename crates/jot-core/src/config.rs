//! Storage layout configuration

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

const DB_FILE_NAME: &str = "note_database.sqlite3";
const NOTES_DIR_NAME: &str = "Notes";
const DATA_DIR_ENV: &str = "JOT_DATA_DIR";

/// Filesystem layout for the record store and the file mirror.
///
/// Construct the stores once at process start from this layout and inject
/// them into the sync engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StorageLayout {
    /// Root directory holding the database file and the notes directory
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageLayout {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl StorageLayout {
    /// Create a layout rooted at the given directory
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load the layout from a JSON config file.
    ///
    /// A missing file yields the default layout; a present but invalid file
    /// is an error.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(error) => Err(error.into()),
        }
    }

    /// Database file location
    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    /// File-mirror directory
    #[must_use]
    pub fn notes_dir(&self) -> PathBuf {
        self.data_dir.join(NOTES_DIR_NAME)
    }
}

/// Resolve the default data directory, honoring `JOT_DATA_DIR`.
fn default_data_dir() -> PathBuf {
    std::env::var_os(DATA_DIR_ENV).map_or_else(|| PathBuf::from("jot-data"), PathBuf::from)
}
