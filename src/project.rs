//! Named project snapshots and the persisted collections.
//!
//! DESIGN
//! ======
//! A project snapshot stores the full page/metadata state under an
//! operator-chosen name. Loading one replaces the live document wholesale —
//! there is no merge and no history beyond the snapshot list itself. All
//! three persisted collections (projects, library assets, folder names) are
//! read once at startup and rewritten wholesale on every mutation; the
//! payloads are small enough that diffing would buy nothing.

#[cfg(test)]
#[path = "project_test.rs"]
mod project_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::doc::{Document, Metadata, Page};
use crate::library::LibraryAsset;
use crate::store::{KvStore, StoreError};

const PROJECTS_KEY: &str = "qcboard_projects";
const LIBRARY_KEY: &str = "qcboard_asset_library";
const FOLDERS_KEY: &str = "qcboard_folders";

/// A named point-in-time snapshot of the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    /// Operator-chosen display name.
    pub name: String,
    pub metadata: Metadata,
    pub pages: Vec<Page>,
    /// Milliseconds since the Unix epoch at save time.
    pub saved_at: i64,
}

/// Capture a named snapshot of the live document.
#[must_use]
pub fn snapshot(doc: &Document, name: &str) -> Project {
    Project {
        id: Uuid::new_v4(),
        name: name.to_owned(),
        metadata: doc.metadata.clone(),
        pages: doc.pages().to_vec(),
        saved_at: now_ms(),
    }
}

/// Load the saved project list. A missing key yields an empty list.
///
/// # Errors
///
/// [`StoreError`] when the store is unreachable or the payload is corrupt.
pub fn load_projects(store: &dyn KvStore) -> Result<Vec<Project>, StoreError> {
    read_collection(store, PROJECTS_KEY)
}

/// Rewrite the saved project list wholesale.
///
/// # Errors
///
/// [`StoreError::Capacity`] when the store refuses the write; the caller's
/// in-memory list is unaffected either way.
pub fn save_projects(store: &mut dyn KvStore, projects: &[Project]) -> Result<(), StoreError> {
    write_collection(store, PROJECTS_KEY, projects)
}

/// Load the persisted library entries. A missing key yields an empty list.
///
/// # Errors
///
/// [`StoreError`] when the store is unreachable or the payload is corrupt.
pub fn load_library(store: &dyn KvStore) -> Result<Vec<LibraryAsset>, StoreError> {
    read_collection(store, LIBRARY_KEY)
}

/// Rewrite the persisted library wholesale.
///
/// # Errors
///
/// See [`save_projects`].
pub fn save_library(store: &mut dyn KvStore, assets: &[LibraryAsset]) -> Result<(), StoreError> {
    write_collection(store, LIBRARY_KEY, assets)
}

/// Load the persisted folder list. `None` means nothing was ever saved and
/// the seeded defaults apply.
///
/// # Errors
///
/// [`StoreError`] when the store is unreachable or the payload is corrupt.
pub fn load_folders(store: &dyn KvStore) -> Result<Option<Vec<String>>, StoreError> {
    let Some(raw) = store.get(FOLDERS_KEY)? else {
        return Ok(None);
    };
    Ok(Some(serde_json::from_str(&raw)?))
}

/// Rewrite the persisted folder list wholesale.
///
/// # Errors
///
/// See [`save_projects`].
pub fn save_folders(store: &mut dyn KvStore, folders: &[String]) -> Result<(), StoreError> {
    write_collection(store, FOLDERS_KEY, folders)
}

fn read_collection<T: serde::de::DeserializeOwned>(
    store: &dyn KvStore,
    key: &str,
) -> Result<Vec<T>, StoreError> {
    let Some(raw) = store.get(key)? else {
        return Ok(Vec::new());
    };
    Ok(serde_json::from_str(&raw)?)
}

fn write_collection<T: Serialize>(
    store: &mut dyn KvStore,
    key: &str,
    values: &[T],
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(values)?;
    store.set(key, &raw)
}

#[cfg(target_arch = "wasm32")]
#[allow(clippy::cast_possible_truncation)]
fn now_ms() -> i64 {
    js_sys::Date::now() as i64
}

#[cfg(not(target_arch = "wasm32"))]
fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}
