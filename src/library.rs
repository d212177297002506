//! Session uploads and the persisted, folder-organized asset library.
//!
//! Uploads land in the session list first; saving one into the library copies
//! it under the active folder after a duplicate check. The duplicate check
//! compares name and payload length only — cheap, collision-prone, and kept
//! from the original workflow. Library content and folder names persist
//! through [`crate::project`]; this module is pure in-memory state.

#[cfg(test)]
#[path = "library_test.rs"]
mod library_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an uploaded or library asset.
pub type AssetId = Uuid;

/// Error returned by rejected library mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LibraryError {
    /// An asset with the same name and payload size is already filed.
    #[error("an asset with the same name and size is already in the library")]
    DuplicateAsset,
    /// The folder name is already taken.
    #[error("folder {0:?} already exists")]
    DuplicateFolder(String),
    /// Folder names must contain at least one non-whitespace character.
    #[error("folder names cannot be empty")]
    EmptyFolderName,
}

/// An image payload uploaded in this session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    /// Opaque image payload reference (e.g. a data URL).
    pub src: String,
    /// Display name, usually the upload's file name.
    pub name: String,
    /// Intrinsic pixel width of the decoded image.
    pub width_px: u32,
    /// Intrinsic pixel height of the decoded image.
    pub height_px: u32,
    /// Whether the payload came out of the PDF decode boundary.
    pub from_pdf: bool,
}

impl Asset {
    /// Create an asset with a fresh identity.
    #[must_use]
    pub fn new(src: String, name: String, width_px: u32, height_px: u32, from_pdf: bool) -> Self {
        Self { id: Uuid::new_v4(), src, name, width_px, height_px, from_pdf }
    }

    /// Height-over-width ratio used to derive placed-item heights. Degenerate
    /// zero-width images fall back to a square ratio.
    #[must_use]
    pub fn aspect(&self) -> f64 {
        if self.width_px == 0 {
            1.0
        } else {
            f64::from(self.height_px) / f64::from(self.width_px)
        }
    }
}

/// A persisted library entry: an asset copy filed under a folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryAsset {
    pub id: AssetId,
    pub src: String,
    pub name: String,
    /// Folder the entry is filed under. Legacy entries may carry an empty
    /// folder and fall back to the first seeded folder when filtering.
    pub folder: String,
    pub width_px: u32,
    pub height_px: u32,
}

impl LibraryAsset {
    /// Height-over-width ratio; see [`Asset::aspect`].
    #[must_use]
    pub fn aspect(&self) -> f64 {
        if self.width_px == 0 {
            1.0
        } else {
            f64::from(self.height_px) / f64::from(self.width_px)
        }
    }

    /// View this entry as a placeable asset.
    #[must_use]
    pub fn as_asset(&self) -> Asset {
        Asset {
            id: self.id,
            src: self.src.clone(),
            name: self.name.clone(),
            width_px: self.width_px,
            height_px: self.height_px,
            from_pdf: false,
        }
    }
}

/// Seed folders for a fresh library.
pub const SEED_FOLDERS: [&str; 4] = ["TM", "EP", "BIKE", "STRENGTH"];

/// The session upload list plus the folder-organized persistent library.
#[derive(Debug, Clone)]
pub struct Library {
    /// Uploads from this session, not yet (necessarily) filed.
    pub session_assets: Vec<Asset>,
    assets: Vec<LibraryAsset>,
    folders: Vec<String>,
    active_folder: String,
    search: String,
}

impl Default for Library {
    fn default() -> Self {
        let folders: Vec<String> = SEED_FOLDERS.iter().map(|&f| f.to_owned()).collect();
        let active_folder = folders[0].clone();
        Self {
            session_assets: Vec::new(),
            assets: Vec::new(),
            folders,
            active_folder,
            search: String::new(),
        }
    }
}

impl Library {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted state (startup path). Unknown active folders
    /// fall back to the first folder; an empty folder list is re-seeded.
    #[must_use]
    pub fn from_persisted(assets: Vec<LibraryAsset>, folders: Option<Vec<String>>) -> Self {
        let mut lib = Self::default();
        lib.assets = assets;
        if let Some(folders) = folders {
            if !folders.is_empty() {
                lib.active_folder = folders[0].clone();
                lib.folders = folders;
            }
        }
        lib
    }

    // --- Session uploads ---

    /// Record a fresh upload in the session list.
    pub fn add_session_asset(&mut self, asset: Asset) {
        self.session_assets.push(asset);
    }

    // --- Persistent library ---

    /// All filed entries, unfiltered.
    #[must_use]
    pub fn assets(&self) -> &[LibraryAsset] {
        &self.assets
    }

    /// Folder names in creation order.
    #[must_use]
    pub fn folders(&self) -> &[String] {
        &self.folders
    }

    /// The folder new entries are filed under.
    #[must_use]
    pub fn active_folder(&self) -> &str {
        &self.active_folder
    }

    /// File a copy of `asset` under the active folder.
    ///
    /// # Errors
    ///
    /// [`LibraryError::DuplicateAsset`] when an entry with the same name and
    /// payload length is already filed anywhere in the library; the library
    /// is unchanged.
    pub fn save_to_library(&mut self, asset: &Asset) -> Result<(), LibraryError> {
        if self
            .assets
            .iter()
            .any(|a| a.name == asset.name && a.src.len() == asset.src.len())
        {
            return Err(LibraryError::DuplicateAsset);
        }
        self.assets.push(LibraryAsset {
            id: asset.id,
            src: asset.src.clone(),
            name: asset.name.clone(),
            folder: self.active_folder.clone(),
            width_px: asset.width_px,
            height_px: asset.height_px,
        });
        Ok(())
    }

    /// Remove a filed entry. Returns `false` if it was absent.
    pub fn remove_from_library(&mut self, id: AssetId) -> bool {
        let before = self.assets.len();
        self.assets.retain(|a| a.id != id);
        self.assets.len() != before
    }

    // --- Folders ---

    /// Create a folder and make it active.
    ///
    /// # Errors
    ///
    /// [`LibraryError::EmptyFolderName`] for blank names,
    /// [`LibraryError::DuplicateFolder`] for existing names; the folder list
    /// is unchanged in both cases.
    pub fn create_folder(&mut self, name: &str) -> Result<(), LibraryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LibraryError::EmptyFolderName);
        }
        if self.folders.iter().any(|f| f == name) {
            return Err(LibraryError::DuplicateFolder(name.to_owned()));
        }
        self.folders.push(name.to_owned());
        self.active_folder = name.to_owned();
        Ok(())
    }

    /// Switch the active folder. Returns `false` for unknown names, which
    /// leave the active folder unchanged.
    pub fn set_active_folder(&mut self, name: &str) -> bool {
        if self.folders.iter().any(|f| f == name) {
            self.active_folder = name.to_owned();
            true
        } else {
            false
        }
    }

    // --- Filtering ---

    /// Set the name search query applied by [`Self::visible_assets`].
    pub fn set_search(&mut self, query: String) {
        self.search = query;
    }

    /// Entries in the active folder whose names match the search query
    /// (case-insensitive substring). Entries with no folder show up in the
    /// first seeded folder.
    #[must_use]
    pub fn visible_assets(&self) -> Vec<&LibraryAsset> {
        let needle = self.search.to_lowercase();
        let fallback = self.folders.first().map(String::as_str).unwrap_or_default();
        self.assets
            .iter()
            .filter(|a| {
                let in_folder = a.folder == self.active_folder
                    || (a.folder.is_empty() && self.active_folder == fallback);
                in_folder && a.name.to_lowercase().contains(&needle)
            })
            .collect()
    }
}
