#[cfg(test)]
#[path = "view_test.rs"]
mod view_test;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_ZOOM, MAX_ZOOM, MIN_ZOOM, PAGE_HEIGHT, PAGE_WIDTH};

/// A point in either viewport or document space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Zoom view over the fixed-extent document.
///
/// The document keeps a fixed logical extent ([`PAGE_WIDTH`] × [`PAGE_HEIGHT`]
/// units) regardless of zoom; `zoom` scales display only and never touches
/// stored coordinates. Pointer coordinates arriving from the host are relative
/// to the on-screen page origin, in CSS pixels.
#[derive(Debug, Clone, Copy)]
pub struct View {
    zoom: f64,
}

impl Default for View {
    fn default() -> Self {
        Self { zoom: DEFAULT_ZOOM }
    }
}

impl View {
    /// Create a view at the given zoom, clamped to the allowed domain.
    #[must_use]
    pub fn new(zoom: f64) -> Self {
        Self { zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM) }
    }

    /// The current zoom factor.
    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Set the zoom factor, clamped to the allowed domain.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Convert a page-origin-relative screen point (CSS pixels) to document
    /// coordinates.
    #[must_use]
    pub fn screen_to_page(&self, screen: Point) -> Point {
        Point { x: screen.x / self.zoom, y: screen.y / self.zoom }
    }

    /// Convert a document-space point to screen coordinates (CSS pixels,
    /// relative to the page origin).
    #[must_use]
    pub fn page_to_screen(&self, page: Point) -> Point {
        Point { x: page.x * self.zoom, y: page.y * self.zoom }
    }

    /// Convert a screen-space distance (pixels) to document-space distance.
    #[must_use]
    pub fn screen_dist_to_page(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }

    /// On-screen size of the full page at the current zoom.
    #[must_use]
    pub fn screen_extent(&self) -> (f64, f64) {
        (PAGE_WIDTH * self.zoom, PAGE_HEIGHT * self.zoom)
    }
}
