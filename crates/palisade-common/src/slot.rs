//! Slot-based save storage.
//!
//! Both plugins persist their state under fixed named slots. A slot holds a
//! single serialized record with a small header:
//!
//! `[magic "PLSV"][u32 format version][bincode body]`
//!
//! The header lets a loader reject foreign or incompatible data with a typed
//! error instead of misreading it.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Magic bytes identifying a Palisade save slot.
pub const SLOT_MAGIC: [u8; 4] = *b"PLSV";

/// Current slot wire-format version.
pub const SLOT_FORMAT_VERSION: u32 = 1;

/// Size of the slot header in bytes.
const HEADER_LEN: usize = 8;

/// Errors that can occur during slot storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid magic bytes
    #[error("Invalid slot format")]
    InvalidFormat,

    /// Version mismatch
    #[error("Incompatible slot version: expected {expected}, found {found}")]
    VersionMismatch {
        /// Expected version
        expected: u32,
        /// Found version
        found: u32,
    },
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// A fixed named slot/user-index pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotKey {
    /// Slot name.
    pub name: &'static str,
    /// User index, for per-profile saves.
    pub user_index: u32,
}

impl SlotKey {
    /// Creates a new slot key.
    #[must_use]
    pub const fn new(name: &'static str, user_index: u32) -> Self {
        Self { name, user_index }
    }

    /// File name used by file-backed storage.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}_{}.sav", self.name, self.user_index)
    }
}

/// Storage backend holding raw slot payloads.
///
/// Implementations store the bytes as-is; the header is produced and checked
/// by [`save_to_slot`] and [`load_from_slot`].
pub trait SlotStorage {
    /// Writes the payload for a slot, replacing any previous content.
    fn write_slot(&mut self, key: SlotKey, bytes: &[u8]) -> StorageResult<()>;

    /// Reads the payload for a slot, or `None` if the slot does not exist.
    fn read_slot(&self, key: SlotKey) -> StorageResult<Option<Vec<u8>>>;

    /// Returns whether a slot exists.
    fn slot_exists(&self, key: SlotKey) -> bool;

    /// Deletes a slot. Deleting a missing slot is not an error.
    fn delete_slot(&mut self, key: SlotKey) -> StorageResult<()>;
}

/// Serializes a record and writes it to a slot with the format header.
pub fn save_to_slot<T: Serialize>(
    storage: &mut dyn SlotStorage,
    key: SlotKey,
    value: &T,
) -> StorageResult<()> {
    let body = bincode::serialize(value).map_err(|e| StorageError::Serialization(e.to_string()))?;

    let mut bytes = Vec::with_capacity(HEADER_LEN + body.len());
    bytes.extend_from_slice(&SLOT_MAGIC);
    bytes.extend_from_slice(&SLOT_FORMAT_VERSION.to_le_bytes());
    bytes.extend_from_slice(&body);

    storage.write_slot(key, &bytes)?;
    debug!(slot = key.name, user_index = key.user_index, "slot written");
    Ok(())
}

/// Reads a record back from a slot, checking magic and version.
///
/// Returns `Ok(None)` when the slot does not exist.
pub fn load_from_slot<T: DeserializeOwned>(
    storage: &dyn SlotStorage,
    key: SlotKey,
) -> StorageResult<Option<T>> {
    let Some(bytes) = storage.read_slot(key)? else {
        return Ok(None);
    };

    if bytes.len() < HEADER_LEN || bytes[..4] != SLOT_MAGIC {
        return Err(StorageError::InvalidFormat);
    }

    let mut version_bytes = [0u8; 4];
    version_bytes.copy_from_slice(&bytes[4..8]);
    let version = u32::from_le_bytes(version_bytes);
    if version != SLOT_FORMAT_VERSION {
        return Err(StorageError::VersionMismatch {
            expected: SLOT_FORMAT_VERSION,
            found: version,
        });
    }

    let value = bincode::deserialize(&bytes[HEADER_LEN..])
        .map_err(|e| StorageError::Serialization(e.to_string()))?;
    Ok(Some(value))
}

/// File-backed slot storage, one file per slot under a base directory.
#[derive(Debug, Clone)]
pub struct FileSlotStorage {
    base_dir: PathBuf,
}

impl FileSlotStorage {
    /// Creates file-backed storage rooted at the given directory.
    #[must_use]
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// Returns the directory slots are stored under.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn slot_path(&self, key: SlotKey) -> PathBuf {
        self.base_dir.join(key.file_name())
    }
}

impl SlotStorage for FileSlotStorage {
    fn write_slot(&mut self, key: SlotKey, bytes: &[u8]) -> StorageResult<()> {
        fs::create_dir_all(&self.base_dir)?;
        fs::write(self.slot_path(key), bytes)?;
        Ok(())
    }

    fn read_slot(&self, key: SlotKey) -> StorageResult<Option<Vec<u8>>> {
        let path = self.slot_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read(path)?))
    }

    fn slot_exists(&self, key: SlotKey) -> bool {
        self.slot_path(key).exists()
    }

    fn delete_slot(&mut self, key: SlotKey) -> StorageResult<()> {
        let path = self.slot_path(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// In-memory slot storage for tests and headless hosts.
#[derive(Debug, Clone, Default)]
pub struct MemorySlotStorage {
    slots: HashMap<SlotKey, Vec<u8>>,
}

impl MemorySlotStorage {
    /// Creates empty in-memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of populated slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns whether no slot is populated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl SlotStorage for MemorySlotStorage {
    fn write_slot(&mut self, key: SlotKey, bytes: &[u8]) -> StorageResult<()> {
        self.slots.insert(key, bytes.to_vec());
        Ok(())
    }

    fn read_slot(&self, key: SlotKey) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.slots.get(&key).cloned())
    }

    fn slot_exists(&self, key: SlotKey) -> bool {
        self.slots.contains_key(&key)
    }

    fn delete_slot(&mut self, key: SlotKey) -> StorageResult<()> {
        self.slots.remove(&key);
        Ok(())
    }
}
