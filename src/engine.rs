//! Top-level engine: interprets pointer events against the current mode,
//! selection, and page lock, and applies document mutations.
//!
//! The engine is split in two, mirroring how it is deployed: [`EngineCore`]
//! holds every piece of interaction logic and runs headless (the whole test
//! suite drives it natively); [`Engine`] wraps the core together with the
//! browser canvas element and the image cache used by rendering.
//!
//! ## Pointer sessions
//!
//! Every gesture follows the same three-phase pattern: `on_pointer_down`
//! opens a session ([`InputState`] leaves `Idle`), `on_pointer_move` applies
//! an incremental mutation while a session is open, and `on_pointer_up`
//! closes it. Sessions hold no external resources besides the host's DOM
//! listeners; a host tearing down mid-gesture calls [`EngineCore::cancel_session`]
//! so no session outlives its surface. Move or up events without an open
//! session are ignored.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use uuid::Uuid;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlCanvasElement;

use crate::consts::{MID_PROMOTE_OFFSET, MIN_ITEM_WIDTH, PLACED_ITEM_WIDTH, PLACED_ITEM_X, PLACED_ITEM_Y};
use crate::doc::{
    Arrow, ArrowPatch, Bend, CanvasItem, DocError, Document, ItemPatch, MainImagePos, Metadata,
};
use crate::hit::{self, ArrowPoint, Hit};
use crate::input::{ArrowSettings, InputState, Mode, Selection, UiState};
use crate::library::Asset;
use crate::project::Project;
use crate::render::{self, ImageCache};
use crate::view::{Point, View};

/// Actions returned from engine operations for the host to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The scene changed; the host should redraw.
    RenderNeeded,
    /// Document content changed; the host may autosave or mark dirty.
    DocumentChanged,
    /// The pointer cursor should change.
    SetCursor(String),
}

fn cursor(name: &str) -> Action {
    Action::SetCursor(name.to_owned())
}

/// Core engine state — all logic that doesn't depend on the canvas element.
///
/// Separated from [`Engine`] so it can be tested without WASM/browser
/// dependencies.
#[derive(Debug, Default)]
pub struct EngineCore {
    pub doc: Document,
    pub view: View,
    pub ui: UiState,
    pub input: InputState,
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Mode & selection ---

    /// Switch the pointer-interpretation mode. Any selection is cleared:
    /// arrow-drawing and entity-selection are mutually exclusive, and the
    /// move button doubles as "deselect".
    pub fn set_mode(&mut self, mode: Mode) -> Vec<Action> {
        self.ui.mode = mode;
        self.ui.selection = None;
        let name = match mode {
            Mode::Arrow => "crosshair",
            Mode::Move => "default",
        };
        vec![cursor(name), Action::RenderNeeded]
    }

    /// The currently selected entity, if any.
    #[must_use]
    pub fn selection(&self) -> Option<Selection> {
        self.ui.selection
    }

    /// Delete the selected entity and clear the selection.
    pub fn delete_selected(&mut self) -> Vec<Action> {
        let Some(selection) = self.ui.selection.take() else {
            return Vec::new();
        };
        let removed = match selection {
            Selection::Item(id) => self.doc.remove_item(id),
            Selection::Arrow(id) => self.doc.remove_arrow(id),
        };
        if removed {
            vec![Action::DocumentChanged, Action::RenderNeeded]
        } else {
            // Stale selection (entity already gone); dropping it is enough.
            vec![Action::RenderNeeded]
        }
    }

    // --- Page lifecycle ---

    /// Append a new page and make it active. Clears the selection, as every
    /// page switch does.
    pub fn add_page(&mut self) -> Vec<Action> {
        self.doc.add_page();
        self.ui.selection = None;
        vec![Action::DocumentChanged, Action::RenderNeeded]
    }

    /// Remove a page; refuses to remove the last one.
    ///
    /// # Errors
    ///
    /// Propagates [`DocError`] from the document; the rejection is surfaced
    /// to the operator and nothing changes.
    pub fn remove_page(&mut self, index: usize) -> Result<Vec<Action>, DocError> {
        self.doc.remove_page(index)?;
        self.ui.selection = None;
        Ok(vec![Action::DocumentChanged, Action::RenderNeeded])
    }

    /// Switch the active page. Selection never survives a page switch — a
    /// selected id has no meaning on another page.
    ///
    /// # Errors
    ///
    /// Propagates [`DocError::PageOutOfBounds`].
    pub fn set_active_page(&mut self, index: usize) -> Result<Vec<Action>, DocError> {
        self.doc.set_active_page(index)?;
        self.ui.selection = None;
        Ok(vec![Action::RenderNeeded])
    }

    /// Rename a page.
    ///
    /// # Errors
    ///
    /// Propagates [`DocError::PageOutOfBounds`].
    pub fn rename_page(&mut self, index: usize, name: String) -> Result<Vec<Action>, DocError> {
        self.doc.rename_page(index, name)?;
        Ok(vec![Action::DocumentChanged, Action::RenderNeeded])
    }

    // --- View & settings ---

    /// Set the display zoom (clamped to the allowed domain).
    pub fn set_zoom(&mut self, zoom: f64) -> Vec<Action> {
        self.view.set_zoom(zoom);
        vec![Action::RenderNeeded]
    }

    /// Replace the style stamped onto the next committed arrow.
    pub fn set_arrow_settings(&mut self, settings: ArrowSettings) {
        self.ui.arrow_settings = settings;
    }

    /// Replace the chart metadata shown in every page header.
    pub fn set_metadata(&mut self, metadata: Metadata) -> Vec<Action> {
        self.doc.metadata = metadata;
        vec![Action::DocumentChanged, Action::RenderNeeded]
    }

    // --- Main image ---

    /// Upload or clear the active page's background image.
    pub fn set_main_image(&mut self, src: Option<String>) -> Vec<Action> {
        self.doc.set_main_image(src);
        vec![Action::DocumentChanged, Action::RenderNeeded]
    }

    /// Rescale the active page's background image (percent, clamped).
    pub fn set_main_image_scale(&mut self, scale: f64) -> Vec<Action> {
        self.doc.set_main_image_scale(scale);
        vec![Action::DocumentChanged, Action::RenderNeeded]
    }

    /// Flip the active page between positioning the background and editing
    /// the overlay.
    pub fn toggle_main_image_lock(&mut self) -> Vec<Action> {
        let locked = self.doc.active_page().main_image_locked;
        self.doc.set_main_image_locked(!locked);
        vec![Action::DocumentChanged, Action::RenderNeeded]
    }

    // --- Assets & projects ---

    /// Place an asset on the active page as a fresh item.
    pub fn place_asset(&mut self, asset: &Asset) -> Vec<Action> {
        self.doc.add_item(CanvasItem {
            id: Uuid::new_v4(),
            src: asset.src.clone(),
            name: asset.name.clone(),
            x: PLACED_ITEM_X,
            y: PLACED_ITEM_Y,
            width: PLACED_ITEM_WIDTH,
            aspect: asset.aspect(),
        });
        vec![Action::DocumentChanged, Action::RenderNeeded]
    }

    /// Replace the live document with a saved snapshot. The first page
    /// becomes active and any selection or open session is dropped.
    ///
    /// # Errors
    ///
    /// Propagates [`DocError::LastPage`] for an empty snapshot; the live
    /// document is unchanged.
    pub fn load_project(&mut self, project: &Project) -> Result<Vec<Action>, DocError> {
        self.doc.restore(project.metadata.clone(), project.pages.clone())?;
        self.ui.selection = None;
        self.input = InputState::Idle;
        Ok(vec![Action::RenderNeeded])
    }

    // --- Pointer events ---

    /// Begin a pointer session. `screen_pt` is relative to the on-screen
    /// page origin, in CSS pixels.
    pub fn on_pointer_down(&mut self, screen_pt: Point) -> Vec<Action> {
        let page_pt = self.view.screen_to_page(screen_pt);

        if self.ui.mode == Mode::Arrow {
            // Arrows start on empty canvas only, never on top of an entity.
            if hit::hit_test(page_pt, self.doc.active_page(), &self.view, None).is_some() {
                return Vec::new();
            }
            self.input = InputState::DrawingArrow { start: page_pt, end: page_pt };
            return vec![Action::RenderNeeded];
        }

        let page = self.doc.active_page();
        if !page.main_image_locked {
            // The background image owns the pointer until the page is locked.
            if page.main_image.is_some() {
                self.input = InputState::DraggingMainImage { last_page: page_pt };
                return vec![cursor("move")];
            }
            return Vec::new();
        }

        let selected = self.ui.selection.map(Selection::id);
        match hit::hit_test(page_pt, page, &self.view, selected) {
            Some(Hit::ItemResizeHandle { id }) => {
                let Some(item) = page.item(id) else {
                    return Vec::new();
                };
                self.input = InputState::ResizingItem {
                    id,
                    start_width: item.width,
                    start_x: page_pt.x,
                };
                vec![cursor("nwse-resize")]
            }
            Some(Hit::ArrowHandle { id, point }) => self.begin_arrow_point(id, point, page_pt),
            Some(Hit::Arrow { id }) => {
                self.ui.selection = Some(Selection::Arrow(id));
                vec![Action::RenderNeeded]
            }
            Some(Hit::Item { id }) => {
                self.ui.selection = Some(Selection::Item(id));
                self.input = InputState::DraggingItem { id, last_page: page_pt };
                vec![Action::RenderNeeded]
            }
            None => {
                if self.ui.selection.take().is_some() {
                    vec![Action::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Pressing an arrow handle. Start/end handles open a drag session
    /// directly. The midpoint handle is two-phase: on a straight arrow the
    /// press promotes the midpoint to a curve control point without opening
    /// a session (toggle first, drag in a separate gesture); on a curved
    /// arrow it opens a mid-drag session whose release decides between a
    /// click (straighten) and a drag (move the control point).
    fn begin_arrow_point(&mut self, id: Uuid, point: ArrowPoint, page_pt: Point) -> Vec<Action> {
        if point == ArrowPoint::Mid {
            let Some(arrow) = self.doc.active_page().arrow(id) else {
                return Vec::new();
            };
            if arrow.bend == Bend::Straight {
                let m = arrow.mid_handle();
                let mid = Point::new(m.x + MID_PROMOTE_OFFSET, m.y + MID_PROMOTE_OFFSET);
                self.doc.patch_arrow(
                    id,
                    ArrowPatch { bend: Some(Bend::Curved { mid }), ..ArrowPatch::default() },
                );
                return vec![Action::DocumentChanged, Action::RenderNeeded];
            }
        }
        self.input = InputState::DraggingArrowPoint { id, point, pressed_at: page_pt, moved: false };
        Vec::new()
    }

    /// Advance the open pointer session, if any. Ignored while idle.
    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        let page_pt = self.view.screen_to_page(screen_pt);

        match self.input.clone() {
            InputState::Idle => Vec::new(),
            InputState::DraggingItem { id, last_page } => {
                let dx = page_pt.x - last_page.x;
                let dy = page_pt.y - last_page.y;
                self.input = InputState::DraggingItem { id, last_page: page_pt };
                let Some(item) = self.doc.active_page().item(id) else {
                    return Vec::new();
                };
                let patch = ItemPatch {
                    x: Some(item.x + dx),
                    y: Some(item.y + dy),
                    ..ItemPatch::default()
                };
                self.doc.patch_item(id, patch);
                vec![Action::RenderNeeded]
            }
            InputState::ResizingItem { id, start_width, start_x } => {
                let width = (start_width + (page_pt.x - start_x)).max(MIN_ITEM_WIDTH);
                self.doc.patch_item(id, ItemPatch { width: Some(width), ..ItemPatch::default() });
                vec![Action::RenderNeeded]
            }
            InputState::DrawingArrow { start, .. } => {
                self.input = InputState::DrawingArrow { start, end: page_pt };
                vec![Action::RenderNeeded]
            }
            InputState::DraggingArrowPoint { id, point, pressed_at, moved } => {
                let moved = moved || page_pt != pressed_at;
                self.input = InputState::DraggingArrowPoint { id, point, pressed_at, moved };
                if !moved {
                    return Vec::new();
                }
                let patch = match point {
                    ArrowPoint::Start => {
                        ArrowPatch { start: Some(page_pt), ..ArrowPatch::default() }
                    }
                    ArrowPoint::End => ArrowPatch { end: Some(page_pt), ..ArrowPatch::default() },
                    ArrowPoint::Mid => ArrowPatch {
                        bend: Some(Bend::Curved { mid: page_pt }),
                        ..ArrowPatch::default()
                    },
                };
                self.doc.patch_arrow(id, patch);
                vec![Action::RenderNeeded]
            }
            InputState::DraggingMainImage { last_page } => {
                let dx = page_pt.x - last_page.x;
                let dy = page_pt.y - last_page.y;
                self.input = InputState::DraggingMainImage { last_page: page_pt };
                let pos = self.doc.active_page().main_image_pos;
                self.doc.set_main_image_pos(MainImagePos {
                    x: pos.x + dx,
                    y: pos.y + dy,
                    scale: pos.scale,
                });
                vec![Action::RenderNeeded]
            }
        }
    }

    /// Close the open pointer session, if any. An up with no prior down is a
    /// no-op.
    pub fn on_pointer_up(&mut self, _screen_pt: Point) -> Vec<Action> {
        match std::mem::take(&mut self.input) {
            InputState::Idle => Vec::new(),
            InputState::DrawingArrow { start, end } => {
                let settings = &self.ui.arrow_settings;
                self.doc.add_arrow(Arrow {
                    id: Uuid::new_v4(),
                    start,
                    end,
                    bend: Bend::Straight,
                    width: settings.width,
                    color: settings.color.clone(),
                    stroke: settings.stroke,
                });
                // The gesture is complete; hand the pointer back to selection.
                self.ui.mode = Mode::Move;
                vec![Action::DocumentChanged, cursor("default"), Action::RenderNeeded]
            }
            InputState::DraggingArrowPoint { id, point: ArrowPoint::Mid, moved: false, .. } => {
                // A click (not a drag) on the mid handle of a curved arrow
                // straightens it again.
                self.doc.patch_arrow(
                    id,
                    ArrowPatch { bend: Some(Bend::Straight), ..ArrowPatch::default() },
                );
                vec![Action::DocumentChanged, Action::RenderNeeded]
            }
            InputState::DraggingItem { .. }
            | InputState::ResizingItem { .. }
            | InputState::DraggingArrowPoint { .. }
            | InputState::DraggingMainImage { .. } => {
                vec![Action::DocumentChanged, cursor("default")]
            }
        }
    }

    /// Abandon any open pointer session without committing further changes.
    /// Called by the host when the interactive surface is torn down, so that
    /// no session outlives its gesture.
    pub fn cancel_session(&mut self) -> Vec<Action> {
        if matches!(self.input, InputState::Idle) {
            return Vec::new();
        }
        self.input = InputState::Idle;
        vec![Action::RenderNeeded]
    }
}

/// The full canvas engine. Wraps [`EngineCore`] and owns the browser canvas
/// element plus the decoded-image cache used by rendering.
pub struct Engine {
    canvas: HtmlCanvasElement,
    images: ImageCache,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self { canvas, images: ImageCache::default(), core: EngineCore::new() }
    }

    // --- Delegated operations ---

    pub fn set_mode(&mut self, mode: Mode) -> Vec<Action> {
        self.core.set_mode(mode)
    }

    pub fn set_zoom(&mut self, zoom: f64) -> Vec<Action> {
        self.core.set_zoom(zoom)
    }

    pub fn on_pointer_down(&mut self, screen_pt: Point) -> Vec<Action> {
        self.core.on_pointer_down(screen_pt)
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        self.core.on_pointer_move(screen_pt)
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point) -> Vec<Action> {
        self.core.on_pointer_up(screen_pt)
    }

    pub fn cancel_session(&mut self) -> Vec<Action> {
        self.core.cancel_session()
    }

    // --- Render ---

    /// Draw the active page to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context cannot be acquired or any `Canvas2D`
    /// call fails.
    pub fn render(&mut self) -> Result<(), JsValue> {
        let Some(ctx_obj) = self.canvas.get_context("2d")? else {
            return Err(JsValue::from_str("canvas has no 2d context"));
        };
        let ctx = ctx_obj
            .dyn_into::<web_sys::CanvasRenderingContext2d>()
            .map_err(JsValue::from)?;
        render::draw(
            &ctx,
            self.core.doc.active_page(),
            &self.core.doc.metadata,
            &self.core.view,
            &self.core.ui,
            &self.core.input,
            &mut self.images,
        )
    }
}
