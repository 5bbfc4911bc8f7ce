//! Week snapshots over a [`KvStore`].
//!
//! One record per week, keyed by [`WeekKey`], holding the pretty-printed
//! JSON of a [`WeekData`]. Exported files carry the exact same bytes.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::kv::{KvStore, SqliteKv};
use crate::error::StoreError;
use crate::model::WeekData;
use crate::week::WeekKey;

/// File name used when exporting the snapshot for `key`.
pub fn export_file_name(key: &WeekKey) -> String {
    format!("planner_{key}.json")
}

/// Serialized form of a snapshot, as persisted and exported.
///
/// # Errors
/// Returns an error if the data cannot be encoded.
pub fn export_snapshot(data: &WeekData) -> Result<Vec<u8>, StoreError> {
    Ok(serde_json::to_string_pretty(data)?.into_bytes())
}

pub struct WeekStore<S> {
    kv: S,
}

impl WeekStore<SqliteKv> {
    /// Open a SQLite-backed store at `path`.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Ok(Self::new(SqliteKv::open(path)?))
    }
}

impl<S: KvStore> WeekStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    /// The stored week for `key`, or the default week.
    ///
    /// Never fails: a missing record, an unreadable store and a snapshot
    /// that no longer parses all yield [`WeekData::default`].
    pub fn load(&self, key: &WeekKey) -> WeekData {
        self.try_load(key).unwrap_or_else(|e| {
            warn!(%key, error = %e, "failed to read snapshot, using default week");
            WeekData::default()
        })
    }

    /// Like [`Self::load`], but reports a store that could not be read.
    ///
    /// Missing and corrupt snapshots still resolve to the default week.
    ///
    /// # Errors
    /// Returns the store error when the record could not be fetched.
    pub fn try_load(&self, key: &WeekKey) -> Result<WeekData, StoreError> {
        let Some(raw) = self.kv.get(key.as_str())? else {
            debug!(%key, "no snapshot stored, using default week");
            return Ok(WeekData::default());
        };

        match serde_json::from_str(&raw) {
            Ok(data) => {
                debug!(%key, "loaded snapshot");
                Ok(data)
            }
            Err(e) => {
                warn!(%key, error = %e, "stored snapshot is corrupt, treating as absent");
                Ok(WeekData::default())
            }
        }
    }

    /// Persist `data` under `key`, replacing any previous snapshot.
    ///
    /// # Errors
    /// Returns an error if the data cannot be encoded or the store rejects
    /// the write. The previous snapshot is left untouched in that case.
    pub fn save(&self, key: &WeekKey, data: &WeekData) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(data)?;
        self.kv.set(key.as_str(), &text)?;
        debug!(%key, bytes = text.len(), "saved snapshot");
        Ok(())
    }

    /// Remove the snapshot for `key`; later loads return the default week.
    pub fn clear(&self, key: &WeekKey) -> Result<(), StoreError> {
        self.kv.remove(key.as_str())?;
        info!(%key, "cleared snapshot");
        Ok(())
    }

    /// Keys of every stored week, oldest first.
    pub fn weeks(&self) -> Result<Vec<WeekKey>, StoreError> {
        let mut keys: Vec<_> = self
            .kv
            .keys("week_")?
            .iter()
            .filter_map(|k| WeekKey::parse(k))
            .collect();
        keys.sort_by_key(WeekKey::start);
        keys.dedup();
        Ok(keys)
    }

    /// Write the snapshot of `data` to `dir/planner_{key}.json`.
    ///
    /// # Errors
    /// Returns an error if encoding or writing the file fails.
    pub fn export_to_dir(
        &self,
        dir: &Path,
        key: &WeekKey,
        data: &WeekData,
    ) -> Result<PathBuf, StoreError> {
        let path = dir.join(export_file_name(key));
        let bytes = export_snapshot(data)?;
        std::fs::write(&path, bytes).map_err(|source| StoreError::ExportFailed {
            path: path.clone(),
            source,
        })?;
        info!(%key, path = %path.display(), "exported snapshot");
        Ok(path)
    }
}
