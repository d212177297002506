//! Document model: pages, placed items, arrows, and their mutation surface.
//!
//! This module defines the core data types that describe what is on each page
//! (`Page`, `CanvasItem`, `Arrow`), sparse-update types for incremental edits
//! (`ItemPatch`, `ArrowPatch`), and the `Document` that owns the ordered page
//! list, the chart metadata, and the active-page pointer.
//!
//! Every mutation targets the active page, clones its record, applies the
//! change to the clone, and swaps the record back in a single assignment —
//! other pages are never touched. A `Document` always keeps at least one page
//! and a valid active index; operations that would break either invariant
//! return [`DocError`] instead.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{DEFAULT_MAIN_SCALE, MAX_MAIN_SCALE, MIN_MAIN_SCALE};
use crate::view::Point;

/// Unique identifier for a page.
pub type PageId = Uuid;

/// Unique identifier for a placed item.
pub type ItemId = Uuid;

/// Unique identifier for an arrow.
pub type ArrowId = Uuid;

/// Error returned by rejected document mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocError {
    /// A document must keep at least one page.
    #[error("a document must keep at least one page")]
    LastPage,
    /// The page index does not refer to an existing page.
    #[error("page index {0} is out of bounds")]
    PageOutOfBounds(usize),
}

/// Chart-wide display strings rendered in every page header.
///
/// Free-form; no format is enforced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub brand: String,
    pub product: String,
    pub date: String,
    pub version: String,
}

/// Placement of a page's background reference image, in document units.
///
/// `scale` is a percentage of the image's intrinsic size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MainImagePos {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

impl Default for MainImagePos {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, scale: DEFAULT_MAIN_SCALE }
    }
}

/// A placed, draggable, resizable image fragment on a page.
///
/// Position and size are unbounded: items may extend past the page extent and
/// are never clamped. Height is not stored; it follows from `width` and the
/// intrinsic aspect ratio captured at placement time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasItem {
    /// Unique identifier for this placement (not the source asset).
    pub id: ItemId,
    /// Opaque image payload reference (e.g. a data URL).
    pub src: String,
    /// Display name inherited from the source asset.
    pub name: String,
    /// Left edge of the item in document units.
    pub x: f64,
    /// Top edge of the item in document units.
    pub y: f64,
    /// Width in document units. Always at least [`crate::consts::MIN_ITEM_WIDTH`]
    /// after a resize gesture; direct construction is not clamped.
    pub width: f64,
    /// Intrinsic height-over-width ratio of the source image.
    pub aspect: f64,
}

impl CanvasItem {
    /// Display height derived from the intrinsic aspect ratio.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.width * self.aspect
    }
}

/// Dash pattern of an arrow stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stroke {
    Solid,
    Dashed,
}

/// Curvature state of an arrow.
///
/// A straight arrow renders as a line segment; a curved arrow renders as a
/// quadratic curve with `mid` as the control point. The midpoint handle
/// toggles between exactly these two states.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Bend {
    Straight,
    Curved { mid: Point },
}

/// A directional annotation on a page, straight or quadratic-curved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    pub id: ArrowId,
    /// Tail of the arrow in document units.
    pub start: Point,
    /// Tip of the arrow (where the head is drawn) in document units.
    pub end: Point,
    pub bend: Bend,
    /// Stroke width in document units.
    pub width: f64,
    /// Stroke color as a CSS color string.
    pub color: String,
    pub stroke: Stroke,
}

impl Arrow {
    /// Position of the midpoint edit handle: the curve control point when
    /// curved, the geometric segment midpoint otherwise.
    #[must_use]
    pub fn mid_handle(&self) -> Point {
        match self.bend {
            Bend::Straight => Point::new(
                (self.start.x + self.end.x) / 2.0,
                (self.start.y + self.end.y) / 2.0,
            ),
            Bend::Curved { mid } => mid,
        }
    }
}

/// One independently composed canvas within a document; the unit of export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Stable identity; `name` is cosmetic only.
    pub id: PageId,
    pub name: String,
    /// Background reference image payload, if one has been uploaded.
    pub main_image: Option<String>,
    pub main_image_pos: MainImagePos,
    /// While `false` the background image owns pointer input and the overlay
    /// (items and arrows) is inert; while `true` the overlay is editable.
    pub main_image_locked: bool,
    pub items: Vec<CanvasItem>,
    pub arrows: Vec<Arrow>,
}

impl Page {
    /// Create an empty page with a fresh identity.
    #[must_use]
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            main_image: None,
            main_image_pos: MainImagePos::default(),
            main_image_locked: false,
            items: Vec::new(),
            arrows: Vec::new(),
        }
    }

    /// Look up a placed item by id.
    #[must_use]
    pub fn item(&self, id: ItemId) -> Option<&CanvasItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Look up an arrow by id.
    #[must_use]
    pub fn arrow(&self, id: ArrowId) -> Option<&Arrow> {
        self.arrows.iter().find(|a| a.id == id)
    }
}

/// Sparse update for a placed item. Only present fields are applied.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ItemPatch {
    /// New left edge, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// New top edge, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// New width, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
}

/// Sparse update for an arrow. Only present fields are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArrowPatch {
    /// New tail position, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<Point>,
    /// New tip position, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<Point>,
    /// New curvature state, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bend: Option<Bend>,
    /// New stroke width, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// New stroke color, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// New dash pattern, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Stroke>,
}

/// The full chart document: ordered pages plus chart-wide metadata.
///
/// Page order is significant — it is the tab order and the export order. The
/// active page is always derived from `active`, never stored redundantly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub metadata: Metadata,
    pages: Vec<Page>,
    active: usize,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document with default metadata and one empty page.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: Metadata::default(),
            pages: vec![Page::new("Page 1".to_owned())],
            active: 0,
        }
    }

    // --- Projection ---

    /// All pages in tab/export order.
    #[must_use]
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Number of pages. Always at least 1.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Index of the active page. Always a valid index into [`Self::pages`].
    #[must_use]
    pub fn active_index(&self) -> usize {
        self.active
    }

    /// The active page.
    #[must_use]
    pub fn active_page(&self) -> &Page {
        &self.pages[self.active]
    }

    // --- Page lifecycle ---

    /// Append a new empty page and make it active. Returns the new page's id.
    pub fn add_page(&mut self) -> PageId {
        let page = Page::new(format!("Page {}", self.pages.len() + 1));
        let id = page.id;
        self.pages.push(page);
        self.active = self.pages.len() - 1;
        id
    }

    /// Remove the page at `index`.
    ///
    /// When the removed page is the active page or precedes it, the active
    /// index moves back one step (floored at 0); otherwise it is unchanged.
    ///
    /// # Errors
    ///
    /// [`DocError::LastPage`] when only one page remains;
    /// [`DocError::PageOutOfBounds`] for an invalid index. The document is
    /// unchanged in both cases.
    pub fn remove_page(&mut self, index: usize) -> Result<(), DocError> {
        if self.pages.len() <= 1 {
            return Err(DocError::LastPage);
        }
        if index >= self.pages.len() {
            return Err(DocError::PageOutOfBounds(index));
        }
        self.pages.remove(index);
        if index <= self.active {
            self.active = self.active.saturating_sub(1);
        }
        Ok(())
    }

    /// Move the active-page pointer.
    ///
    /// # Errors
    ///
    /// [`DocError::PageOutOfBounds`] for an invalid index.
    pub fn set_active_page(&mut self, index: usize) -> Result<(), DocError> {
        if index >= self.pages.len() {
            return Err(DocError::PageOutOfBounds(index));
        }
        self.active = index;
        Ok(())
    }

    /// Rename the page at `index`. The page keeps its identity.
    ///
    /// # Errors
    ///
    /// [`DocError::PageOutOfBounds`] for an invalid index.
    pub fn rename_page(&mut self, index: usize, name: String) -> Result<(), DocError> {
        if index >= self.pages.len() {
            return Err(DocError::PageOutOfBounds(index));
        }
        let mut page = self.pages[index].clone();
        page.name = name;
        self.pages[index] = page;
        Ok(())
    }

    /// Replace metadata and pages wholesale (project load). The active page
    /// resets to the first page.
    ///
    /// # Errors
    ///
    /// [`DocError::LastPage`] when the replacement page list is empty; the
    /// document is unchanged.
    pub fn restore(&mut self, metadata: Metadata, pages: Vec<Page>) -> Result<(), DocError> {
        if pages.is_empty() {
            return Err(DocError::LastPage);
        }
        self.metadata = metadata;
        self.pages = pages;
        self.active = 0;
        Ok(())
    }

    /// Clone the active page, apply `f`, and swap the record back in a single
    /// assignment. Other pages are never touched.
    fn with_active<F: FnOnce(&mut Page)>(&mut self, f: F) {
        let mut page = self.pages[self.active].clone();
        f(&mut page);
        self.pages[self.active] = page;
    }

    // --- Items ---

    /// Append an item to the active page.
    pub fn add_item(&mut self, item: CanvasItem) {
        self.with_active(|p| p.items.push(item));
    }

    /// Apply a sparse update to an item on the active page. Returns `false`
    /// if no item with that id exists there.
    pub fn patch_item(&mut self, id: ItemId, patch: ItemPatch) -> bool {
        if self.active_page().item(id).is_none() {
            return false;
        }
        self.with_active(|p| {
            if let Some(item) = p.items.iter_mut().find(|i| i.id == id) {
                if let Some(x) = patch.x {
                    item.x = x;
                }
                if let Some(y) = patch.y {
                    item.y = y;
                }
                if let Some(width) = patch.width {
                    item.width = width;
                }
            }
        });
        true
    }

    /// Remove an item from the active page. Returns `false` if it was absent.
    pub fn remove_item(&mut self, id: ItemId) -> bool {
        if self.active_page().item(id).is_none() {
            return false;
        }
        self.with_active(|p| p.items.retain(|i| i.id != id));
        true
    }

    // --- Arrows ---

    /// Append an arrow to the active page.
    pub fn add_arrow(&mut self, arrow: Arrow) {
        self.with_active(|p| p.arrows.push(arrow));
    }

    /// Apply a sparse update to an arrow on the active page. Returns `false`
    /// if no arrow with that id exists there.
    pub fn patch_arrow(&mut self, id: ArrowId, patch: ArrowPatch) -> bool {
        if self.active_page().arrow(id).is_none() {
            return false;
        }
        self.with_active(|p| {
            if let Some(arrow) = p.arrows.iter_mut().find(|a| a.id == id) {
                if let Some(start) = patch.start {
                    arrow.start = start;
                }
                if let Some(end) = patch.end {
                    arrow.end = end;
                }
                if let Some(bend) = patch.bend {
                    arrow.bend = bend;
                }
                if let Some(width) = patch.width {
                    arrow.width = width;
                }
                if let Some(color) = patch.color.clone() {
                    arrow.color = color;
                }
                if let Some(stroke) = patch.stroke {
                    arrow.stroke = stroke;
                }
            }
        });
        true
    }

    /// Remove an arrow from the active page. Returns `false` if it was absent.
    pub fn remove_arrow(&mut self, id: ArrowId) -> bool {
        if self.active_page().arrow(id).is_none() {
            return false;
        }
        self.with_active(|p| p.arrows.retain(|a| a.id != id));
        true
    }

    // --- Main image ---

    /// Set or clear the active page's background image. A fresh image resets
    /// the placement and unlocks the page so it can be positioned.
    pub fn set_main_image(&mut self, src: Option<String>) {
        self.with_active(|p| {
            p.main_image = src;
            p.main_image_pos = MainImagePos::default();
            p.main_image_locked = false;
        });
    }

    /// Move the active page's background image.
    pub fn set_main_image_pos(&mut self, pos: MainImagePos) {
        self.with_active(|p| p.main_image_pos = pos);
    }

    /// Rescale the active page's background image; the percentage is clamped
    /// to the allowed domain.
    pub fn set_main_image_scale(&mut self, scale: f64) {
        let scale = scale.clamp(MIN_MAIN_SCALE, MAX_MAIN_SCALE);
        self.with_active(|p| p.main_image_pos.scale = scale);
    }

    /// Lock or unlock the active page's background image.
    pub fn set_main_image_locked(&mut self, locked: bool) {
        self.with_active(|p| p.main_image_locked = locked);
    }
}
