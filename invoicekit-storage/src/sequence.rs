//! Per-directory id sequence persisted in a `_meta.json` sidecar.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{StorageError, StorageResult};

/// Sidecar holding the next unused id of an entity directory.
pub const META_FILE: &str = "_meta.json";

#[derive(Debug, Serialize, Deserialize)]
struct SequenceMeta {
    next_id: i64,
}

enum MetaState {
    Missing,
    Corrupt(String),
    Valid(i64),
}

/// Monotonic id allocator for one entity directory.
///
/// Safe for sequential use from one process. Writers in other processes (or
/// other stores opened on the same directory) are not serialized against it.
#[derive(Debug)]
pub struct SequenceCounter {
    meta_path: PathBuf,
    next_id: Mutex<i64>,
}

impl SequenceCounter {
    /// Loads the counter for `dir`, never going below `floor`.
    ///
    /// `floor` is one past the highest document id already on disk. Missing or
    /// unreadable metadata restarts from the floor instead of failing the store,
    /// so a lost sidecar can never hand out an id that is still in use.
    pub fn load(dir: &Path, floor: i64) -> Self {
        let meta_path = dir.join(META_FILE);
        let floor = floor.max(1);

        let next_id = match read_meta(&meta_path) {
            MetaState::Valid(stored) if stored >= floor => stored,
            MetaState::Valid(stored) => {
                warn!(
                    path = %meta_path.display(),
                    stored,
                    floor,
                    "Id counter is behind documents on disk, raising it"
                );
                floor
            }
            MetaState::Missing => {
                debug!(path = %meta_path.display(), floor, "No id counter yet");
                floor
            }
            MetaState::Corrupt(reason) => {
                warn!(
                    path = %meta_path.display(),
                    floor,
                    "Unreadable id counter ({}), recovering from documents on disk",
                    reason
                );
                floor
            }
        };

        Self {
            meta_path,
            next_id: Mutex::new(next_id),
        }
    }

    /// The id the next allocation will return.
    pub fn peek(&self) -> StorageResult<i64> {
        Ok(*self.lock()?)
    }

    /// Returns the current id after persisting its successor.
    pub fn allocate(&self) -> StorageResult<i64> {
        let mut next = self.lock()?;
        let current = *next;
        let following = current
            .checked_add(1)
            .ok_or_else(|| StorageError::SequenceExhausted(self.meta_path.display().to_string()))?;
        self.persist(following)?;
        *next = following;
        Ok(current)
    }

    /// Restarts the sequence at 1.
    pub fn reset(&self) -> StorageResult<()> {
        let mut next = self.lock()?;
        self.persist(1)?;
        *next = 1;
        Ok(())
    }

    fn lock(&self) -> StorageResult<std::sync::MutexGuard<'_, i64>> {
        self.next_id
            .lock()
            .map_err(|_| StorageError::LockPoisoned("sequence counter"))
    }

    fn persist(&self, next_id: i64) -> StorageResult<()> {
        let body = serde_json::to_string_pretty(&SequenceMeta { next_id })?;
        let tmp_path = self.meta_path.with_extension("json.tmp");
        fs::write(&tmp_path, body)?;
        fs::rename(&tmp_path, &self.meta_path)?;
        Ok(())
    }
}

fn read_meta(path: &Path) -> MetaState {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return MetaState::Missing,
        Err(e) => return MetaState::Corrupt(e.to_string()),
    };

    match serde_json::from_str::<SequenceMeta>(&contents) {
        Ok(meta) if meta.next_id >= 1 => MetaState::Valid(meta.next_id),
        Ok(meta) => MetaState::Corrupt(format!("next_id {} is not positive", meta.next_id)),
        Err(e) => MetaState::Corrupt(e.to_string()),
    }
}
