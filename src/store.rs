//! Whole-table snapshots on disk.
//!
//! A table is written as one file `<dir>/<name>.<extension>` holding a versioned
//! snapshot of its schema and tuples. The key index is not stored; it is rebuilt
//! when the snapshot is loaded.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::schema::{ColumnDef, Schema, Tuple};
use crate::table::Table;

const SNAPSHOT_VERSION: u32 = 1;

/// Where snapshots live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Directory holding one file per table.
    pub dir: PathBuf,
    /// File extension, without the dot.
    pub extension: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("store"),
            extension: "dbf".to_string(),
        }
    }
}

impl StoreConfig {
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }
}

#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    name: String,
    columns: Vec<ColumnDef>,
    key: Vec<String>,
    tuples: Vec<Tuple>,
}

/// Saves and loads whole tables by name.
#[derive(Debug, Clone)]
pub struct Store {
    config: StoreConfig,
}

impl Store {
    /// Opens the store, creating its directory if needed.
    pub fn open(config: StoreConfig) -> Result<Self, StoreError> {
        fs::create_dir_all(&config.dir)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// `<dir>/<name>.<extension>`; dots inside `name` are kept as part of the name.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.config.dir.join(format!("{name}.{}", self.config.extension))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }

    /// Writes a snapshot of `table` under its name, replacing any previous one.
    ///
    /// The snapshot is written to a temporary file first and renamed into
    /// place, so a failed save leaves the previous snapshot intact.
    pub fn save(&self, table: &Table) -> Result<PathBuf, StoreError> {
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            name: table.name().to_string(),
            columns: table.schema().columns().to_vec(),
            key: table.key().to_vec(),
            tuples: table.tuples().to_vec(),
        };
        let bytes = bincode::serialize(&snapshot).map_err(StoreError::Encode)?;

        let path = self.path_for(table.name());
        let tmp = self
            .config
            .dir
            .join(format!("{}.{}.tmp", table.name(), self.config.extension));
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &path)?;
        log::debug!("saved table {} ({} tuples) to {}", table.name(), table.len(), path.display());
        Ok(path)
    }

    /// Reads the snapshot saved under `name`.
    ///
    /// # Errors
    /// [StoreError::NotFound] if there is no such snapshot; decode, version and
    /// schema errors if the file is not a valid snapshot.
    pub fn load(&self, name: &str) -> Result<Table, StoreError> {
        let path = self.path_for(name);
        let bytes = read(&path, name)?;
        let snapshot: Snapshot = bincode::deserialize(&bytes).map_err(StoreError::Decode)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(StoreError::UnsupportedVersion {
                expected: SNAPSHOT_VERSION,
                found: snapshot.version,
            });
        }

        let mut table = Table::new(snapshot.name, Schema::new(snapshot.columns, snapshot.key)?);
        for tuple in snapshot.tuples {
            table.insert(tuple)?;
        }
        log::debug!("loaded table {} ({} tuples) from {}", table.name(), table.len(), path.display());
        Ok(table)
    }
}

fn read(path: &Path, name: &str) -> Result<Vec<u8>, StoreError> {
    fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => StoreError::NotFound(name.to_string()),
        _ => StoreError::Io(e),
    })
}
