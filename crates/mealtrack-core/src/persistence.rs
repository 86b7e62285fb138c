//! Durable mirror of the meal list.
//!
//! Storage is a flat key/value slot store in the manner of browser local
//! storage. The whole collection lives under one slot as a single JSON blob;
//! there are no partial writes.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PersistenceError, Result, StoreError};
use crate::item::{Item, ItemId};
use crate::store::watermark;

/// Default slot name for the meal list.
pub const DEFAULT_SLOT: &str = "items";

/// Full serialized collection plus the id watermark.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub next_id: ItemId,
    pub items: Vec<Item>,
}

impl Snapshot {
    /// True when the counter or a stored id sits at `ItemId::MAX`, leaving no
    /// id for the next add.
    pub fn ids_exhausted(&self) -> bool {
        self.next_id == ItemId::MAX || self.items.iter().any(|item| item.id == ItemId::MAX)
    }
}

/// Accepted on-disk layouts. A bare array is what older files contain.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredSnapshot {
    Full(Snapshot),
    Legacy(Vec<Item>),
}

impl From<StoredSnapshot> for Snapshot {
    fn from(stored: StoredSnapshot) -> Self {
        match stored {
            StoredSnapshot::Full(snapshot) => snapshot,
            StoredSnapshot::Legacy(items) => Snapshot {
                next_id: watermark(&items),
                items,
            },
        }
    }
}

/// Named-slot string storage.
pub trait Storage {
    /// Read a slot. `Ok(None)` when it was never written or has been removed.
    fn get_item(&self, key: &str) -> std::result::Result<Option<String>, PersistenceError>;

    /// Overwrite a slot.
    fn set_item(&mut self, key: &str, value: &str) -> std::result::Result<(), PersistenceError>;

    /// Delete a slot. Removing an absent slot is not an error.
    fn remove_item(&mut self, key: &str) -> std::result::Result<(), PersistenceError>;
}

/// Slots stored as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> std::result::Result<Option<String>, PersistenceError> {
        match fs::read_to_string(self.slot_path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> std::result::Result<(), PersistenceError> {
        fs::create_dir_all(&self.dir)?;

        // Write beside the target and rename so a crash never leaves half a file
        let path = self.slot_path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> std::result::Result<(), PersistenceError> {
        match fs::remove_file(self.slot_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local storage, used for tests and `--ephemeral` sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> std::result::Result<Option<String>, PersistenceError> {
        Ok(self.slots.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> std::result::Result<(), PersistenceError> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> std::result::Result<(), PersistenceError> {
        self.slots.remove(key);
        Ok(())
    }
}

/// Reads and writes the meal list under a single storage slot.
#[derive(Debug, Clone)]
pub struct ItemRepository<S: Storage> {
    storage: S,
    slot: String,
}

impl<S: Storage> ItemRepository<S> {
    pub fn new(storage: S) -> Self {
        Self::with_slot(storage, DEFAULT_SLOT)
    }

    pub fn with_slot(storage: S, slot: impl Into<String>) -> Self {
        Self {
            storage,
            slot: slot.into(),
        }
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Stored snapshot, or an empty one when nothing usable is stored.
    pub fn load(&self) -> Snapshot {
        self.read().unwrap_or_else(|e| {
            tracing::warn!(slot = %self.slot, "Failed to read stored items: {}", e);
            Snapshot::default()
        })
    }

    /// Overwrite the stored snapshot.
    pub fn save_all(&mut self, snapshot: &Snapshot) -> std::result::Result<(), PersistenceError> {
        let json = serde_json::to_string(snapshot)?;
        self.storage.set_item(&self.slot, &json)
    }

    pub fn append(&mut self, item: &Item) -> Result<()> {
        let mut snapshot = self.read()?;
        let after = item.id.checked_add(1).ok_or(StoreError::IdsExhausted)?;
        snapshot.next_id = snapshot.next_id.max(after);
        snapshot.items.push(item.clone());
        self.save_all(&snapshot)?;
        Ok(())
    }

    /// Replace the stored item with the same id.
    pub fn replace(&mut self, item: &Item) -> Result<()> {
        let mut snapshot = self.read()?;
        let stored = snapshot
            .items
            .iter_mut()
            .find(|stored| stored.id == item.id)
            .ok_or(StoreError::NotFound(item.id))?;
        *stored = item.clone();
        self.save_all(&snapshot)?;
        Ok(())
    }

    pub fn remove(&mut self, id: ItemId) -> Result<Item> {
        let mut snapshot = self.read()?;
        let index = snapshot
            .items
            .iter()
            .position(|stored| stored.id == id)
            .ok_or(StoreError::NotFound(id))?;
        let removed = snapshot.items.remove(index);
        self.save_all(&snapshot)?;
        Ok(removed)
    }

    /// Erase the slot entirely.
    pub fn clear(&mut self) -> std::result::Result<(), PersistenceError> {
        self.storage.remove_item(&self.slot)
    }

    /// Unparseable contents, and snapshots with no ids left to hand out,
    /// read as empty. I/O failures propagate so a load-mutate-save cycle
    /// never overwrites data it could not read.
    fn read(&self) -> std::result::Result<Snapshot, PersistenceError> {
        let Some(json) = self.storage.get_item(&self.slot)? else {
            return Ok(Snapshot::default());
        };

        match serde_json::from_str::<StoredSnapshot>(&json) {
            Ok(stored) => {
                let snapshot = Snapshot::from(stored);
                if snapshot.ids_exhausted() {
                    tracing::warn!(slot = %self.slot, "Discarding snapshot with exhausted ids");
                    return Ok(Snapshot::default());
                }
                Ok(snapshot)
            }
            Err(e) => {
                tracing::warn!(slot = %self.slot, "Discarding unreadable snapshot: {}", e);
                Ok(Snapshot::default())
            }
        }
    }
}
