//! Input model: pointer modes, selection, arrow styling, and the gesture
//! state machine.
//!
//! This module defines the types the engine interprets pointer events
//! against. `Mode` captures how a pointer-down on the canvas is read,
//! `Selection` the single entity (if any) whose handles are live, and
//! `InputState` the pointer session open between a down and its matching up,
//! carrying all context needed to compute incremental deltas.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::consts::{DEFAULT_ARROW_COLOR, DEFAULT_ARROW_WIDTH};
use crate::doc::{ArrowId, ItemId, Stroke};
use crate::hit::ArrowPoint;
use crate::view::Point;

/// How pointer-down events on the canvas are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Select and manipulate existing entities (default).
    #[default]
    Move,
    /// Draw a new arrow with a drag gesture.
    Arrow,
}

/// The currently selected entity. At most one entity is selected at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Item(ItemId),
    Arrow(ArrowId),
}

impl Selection {
    /// The selected entity's id, whichever kind it is.
    #[must_use]
    pub fn id(self) -> uuid::Uuid {
        match self {
            Self::Item(id) | Self::Arrow(id) => id,
        }
    }
}

/// Style stamped onto newly committed arrows.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowSettings {
    pub width: f64,
    pub color: String,
    pub stroke: Stroke,
}

impl Default for ArrowSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_ARROW_WIDTH,
            color: DEFAULT_ARROW_COLOR.to_owned(),
            stroke: Stroke::Solid,
        }
    }
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Current pointer-interpretation mode.
    pub mode: Mode,
    /// The selected entity, if any. Cleared on mode changes, page switches,
    /// and deletion.
    pub selection: Option<Selection>,
    /// Style applied to the next committed arrow.
    pub arrow_settings: ArrowSettings,
}

/// Internal state for the pointer-session state machine.
///
/// Each active variant is one open gesture between a pointer-down and its
/// matching pointer-up, carrying the context needed to apply incremental
/// mutations. At most one session is open at a time; move events without an
/// open session are ignored.
#[derive(Debug, Clone)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    Idle,
    /// Moving a placed item across the page.
    DraggingItem {
        /// Id of the item being dragged.
        id: ItemId,
        /// Document-space pointer position at the previous event, used to
        /// compute the incremental delta.
        last_page: Point,
    },
    /// Resizing a placed item from its bottom-right handle.
    ResizingItem {
        /// Id of the item being resized.
        id: ItemId,
        /// Item width when the gesture began.
        start_width: f64,
        /// Document-space pointer x when the gesture began.
        start_x: f64,
    },
    /// Drawing a new arrow; committed on pointer-up.
    DrawingArrow {
        /// Document-space point of the initial pointer-down.
        start: Point,
        /// Live document-space endpoint under the pointer.
        end: Point,
    },
    /// Repositioning one editable point of an existing arrow.
    DraggingArrowPoint {
        /// Id of the arrow being edited.
        id: ArrowId,
        /// Which point is under manipulation.
        point: ArrowPoint,
        /// Document-space point of the initial pointer-down, used to tell a
        /// click (midpoint toggle) from a drag.
        pressed_at: Point,
        /// Whether the pointer has moved since the down.
        moved: bool,
    },
    /// Moving the page's background image while the page is unlocked.
    DraggingMainImage {
        /// Document-space pointer position at the previous event.
        last_page: Point,
    },
}

impl Default for InputState {
    fn default() -> Self {
        Self::Idle
    }
}
