//! Rendering: draws the active page to a 2D canvas context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It receives read-only views of the page, view, and UI state and produces
//! pixels — it does not mutate any application state. Image payloads are
//! resolved through an [`ImageCache`] of lazily created `HtmlImageElement`s;
//! entries that have not finished decoding are skipped this frame and picked
//! up on a later draw.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

use std::collections::HashMap;
use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::consts::{HANDLE_RADIUS_PX, HEADER_HEIGHT, PAGE_HEIGHT, PAGE_WIDTH};
use crate::doc::{Arrow, Bend, CanvasItem, Metadata, Page, Stroke};
use crate::hit;
use crate::input::{ArrowSettings, InputState, Selection, UiState};
use crate::view::{Point, View};

/// Arrowhead length in document units.
const ARROW_SIZE: f64 = 10.0;

/// Arrowhead half-angle in radians (~30°).
const ARROW_ANGLE: f64 = PI / 6.0;

/// Dash segment length for dashed arrow strokes, in document units.
const ARROW_DASH: f64 = 8.0;

/// Dash segment length for the transient arrow preview.
const PREVIEW_DASH: f64 = 4.0;

/// Stroke width of the transient arrow preview.
const PREVIEW_WIDTH: f64 = 1.5;

/// Selection dash segment length in screen pixels.
const SELECTION_DASH_PX: f64 = 4.0;

/// Overlay opacity while the page's background image is being positioned.
const INERT_OVERLAY_ALPHA: f64 = 0.5;

/// Selection accent color for items.
const SELECTION_COLOR: &str = "#3b82f6";

/// Lazily created `HtmlImageElement`s keyed by payload reference.
#[derive(Default)]
pub struct ImageCache {
    images: HashMap<String, HtmlImageElement>,
}

impl ImageCache {
    /// The cached element for `src`, creating it on first use. Returns `None`
    /// when the element cannot be created (no DOM) or has not finished
    /// decoding yet.
    fn get(&mut self, src: &str) -> Option<&HtmlImageElement> {
        if !self.images.contains_key(src) {
            match HtmlImageElement::new() {
                Ok(img) => {
                    img.set_src(src);
                    self.images.insert(src.to_owned(), img);
                }
                Err(err) => {
                    log::warn!("image element could not be created: {err:?}");
                    return None;
                }
            }
        }
        self.images.get(src).filter(|img| img.complete())
    }
}

/// Draw the full page: sheet, header, background image, overlay entities,
/// transient preview, and selection UI.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    page: &Page,
    metadata: &Metadata,
    view: &View,
    ui: &UiState,
    input: &InputState,
    images: &mut ImageCache,
) -> Result<(), JsValue> {
    let zoom = view.zoom();
    let (screen_w, screen_h) = view.screen_extent();

    // Layer 1: clear, set up the zoom transform, paint the sheet.
    ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, screen_w, screen_h);
    ctx.scale(zoom, zoom)?;
    ctx.set_fill_style_str("#ffffff");
    ctx.fill_rect(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT);

    draw_header(ctx, metadata, page)?;

    // Layer 2: background image, then the overlay. The overlay is dimmed
    // while the background is being positioned.
    if let Some(src) = &page.main_image {
        if let Some(img) = images.get(src) {
            draw_main_image(ctx, img, page)?;
        }
    }

    if !page.main_image_locked {
        ctx.set_global_alpha(INERT_OVERLAY_ALPHA);
    }
    for item in &page.items {
        draw_item(ctx, item, images)?;
    }
    for arrow in &page.arrows {
        draw_arrow(ctx, arrow)?;
    }
    ctx.set_global_alpha(1.0);

    // Layer 3: transient preview while an arrow is being drawn.
    if let InputState::DrawingArrow { start, end } = input {
        draw_preview(ctx, *start, *end, &ui.arrow_settings)?;
    }

    // Layer 4: selection UI, only while the overlay is editable.
    if page.main_image_locked {
        match ui.selection {
            Some(Selection::Item(id)) => {
                if let Some(item) = page.item(id) {
                    draw_item_selection(ctx, item, zoom)?;
                }
            }
            Some(Selection::Arrow(id)) => {
                if let Some(arrow) = page.arrow(id) {
                    draw_arrow_handles(ctx, arrow, zoom)?;
                }
            }
            None => {}
        }
    }

    Ok(())
}

// =============================================================
// Header
// =============================================================

fn draw_header(
    ctx: &CanvasRenderingContext2d,
    metadata: &Metadata,
    page: &Page,
) -> Result<(), JsValue> {
    ctx.save();

    ctx.set_stroke_style_str("#000");
    ctx.set_line_width(2.0);
    ctx.begin_path();
    ctx.move_to(0.0, HEADER_HEIGHT);
    ctx.line_to(PAGE_WIDTH, HEADER_HEIGHT);
    ctx.stroke();

    ctx.set_text_baseline("middle");
    let mid_y = HEADER_HEIGHT / 2.0;

    ctx.set_fill_style_str("#1e293b");
    ctx.set_text_align("left");
    ctx.set_font("700 30px sans-serif");
    ctx.fill_text(&metadata.brand.to_uppercase(), 32.0, mid_y)?;

    if !metadata.product.is_empty() {
        ctx.set_fill_style_str("#4b5563");
        ctx.set_font("24px sans-serif");
        let brand_gap = 32.0 + metadata.brand.len() as f64 * 20.0 + 24.0;
        ctx.fill_text(&metadata.product, brand_gap, mid_y)?;
    }

    ctx.set_text_align("right");
    ctx.set_fill_style_str("#1f2937");
    ctx.set_font("600 16px sans-serif");
    ctx.fill_text(&format!("QC Checklist / {}", page.name), PAGE_WIDTH - 32.0, mid_y - 12.0)?;
    ctx.set_fill_style_str("#6b7280");
    ctx.set_font("16px sans-serif");
    ctx.fill_text(
        &format!("{} | {}", metadata.date, metadata.version),
        PAGE_WIDTH - 32.0,
        mid_y + 12.0,
    )?;

    ctx.restore();
    Ok(())
}

// =============================================================
// Background image
// =============================================================

fn draw_main_image(
    ctx: &CanvasRenderingContext2d,
    img: &HtmlImageElement,
    page: &Page,
) -> Result<(), JsValue> {
    let pos = page.main_image_pos;
    let scale = pos.scale / 100.0;
    ctx.save();
    ctx.translate(pos.x, pos.y)?;
    ctx.scale(scale, scale)?;
    ctx.draw_image_with_html_image_element(img, 0.0, 0.0)?;
    ctx.restore();
    Ok(())
}

// =============================================================
// Items
// =============================================================

fn draw_item(
    ctx: &CanvasRenderingContext2d,
    item: &CanvasItem,
    images: &mut ImageCache,
) -> Result<(), JsValue> {
    let height = item.height();
    if let Some(img) = images.get(&item.src) {
        ctx.draw_image_with_html_image_element_and_dw_and_dh(
            img, item.x, item.y, item.width, height,
        )?;
    } else {
        // Payload still decoding; hold its footprint.
        ctx.set_fill_style_str("#f3f4f6");
        ctx.fill_rect(item.x, item.y, item.width, height);
        ctx.set_stroke_style_str("#d1d5db");
        ctx.set_line_width(1.0);
        ctx.stroke_rect(item.x, item.y, item.width, height);
    }
    Ok(())
}

fn draw_item_selection(
    ctx: &CanvasRenderingContext2d,
    item: &CanvasItem,
    zoom: f64,
) -> Result<(), JsValue> {
    let height = item.height();
    let dash = SELECTION_DASH_PX / zoom;

    ctx.save();
    ctx.set_stroke_style_str(SELECTION_COLOR);
    ctx.set_line_width(1.0 / zoom);
    let dash_array = js_sys::Array::new();
    dash_array.push(&dash.into());
    dash_array.push(&dash.into());
    ctx.set_line_dash(&dash_array)?;
    ctx.stroke_rect(item.x, item.y, item.width, height);
    ctx.set_line_dash(&js_sys::Array::new())?;

    // Resize handle at the bottom-right corner.
    let handle = hit::resize_handle_position(item);
    let radius = HANDLE_RADIUS_PX / zoom;
    ctx.set_fill_style_str(SELECTION_COLOR);
    ctx.begin_path();
    ctx.arc(handle.x, handle.y, radius, 0.0, 2.0 * PI)?;
    ctx.fill();

    ctx.restore();
    Ok(())
}

// =============================================================
// Arrows
// =============================================================

fn draw_arrow(ctx: &CanvasRenderingContext2d, arrow: &Arrow) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_stroke_style_str(&arrow.color);
    ctx.set_line_width(arrow.width);
    if arrow.stroke == Stroke::Dashed {
        let dash_array = js_sys::Array::new();
        dash_array.push(&ARROW_DASH.into());
        dash_array.push(&(ARROW_DASH * 0.75).into());
        ctx.set_line_dash(&dash_array)?;
    }

    ctx.begin_path();
    ctx.move_to(arrow.start.x, arrow.start.y);
    match arrow.bend {
        Bend::Straight => ctx.line_to(arrow.end.x, arrow.end.y),
        Bend::Curved { mid } => {
            ctx.quadratic_curve_to(mid.x, mid.y, arrow.end.x, arrow.end.y);
        }
    }
    ctx.stroke();
    ctx.set_line_dash(&js_sys::Array::new())?;

    ctx.set_fill_style_str(&arrow.color);
    draw_arrowhead(ctx, arrow.end, tip_angle(arrow));

    ctx.restore();
    Ok(())
}

/// Direction the arrowhead points, from the path's tangent at the tip.
fn tip_angle(arrow: &Arrow) -> f64 {
    let from = match arrow.bend {
        Bend::Straight => arrow.start,
        Bend::Curved { mid } => mid,
    };
    (arrow.end.y - from.y).atan2(arrow.end.x - from.x)
}

fn draw_arrowhead(ctx: &CanvasRenderingContext2d, tip: Point, angle: f64) {
    let x1 = tip.x - ARROW_SIZE * (angle - ARROW_ANGLE).cos();
    let y1 = tip.y - ARROW_SIZE * (angle - ARROW_ANGLE).sin();
    let x2 = tip.x - ARROW_SIZE * (angle + ARROW_ANGLE).cos();
    let y2 = tip.y - ARROW_SIZE * (angle + ARROW_ANGLE).sin();

    ctx.begin_path();
    ctx.move_to(tip.x, tip.y);
    ctx.line_to(x1, y1);
    ctx.line_to(x2, y2);
    ctx.close_path();
    ctx.fill();
}

fn draw_preview(
    ctx: &CanvasRenderingContext2d,
    start: Point,
    end: Point,
    settings: &ArrowSettings,
) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_stroke_style_str(&settings.color);
    ctx.set_line_width(PREVIEW_WIDTH);
    let dash_array = js_sys::Array::new();
    dash_array.push(&PREVIEW_DASH.into());
    dash_array.push(&PREVIEW_DASH.into());
    ctx.set_line_dash(&dash_array)?;

    ctx.begin_path();
    ctx.move_to(start.x, start.y);
    ctx.line_to(end.x, end.y);
    ctx.stroke();
    ctx.set_line_dash(&js_sys::Array::new())?;

    ctx.set_fill_style_str(&settings.color);
    draw_arrowhead(ctx, end, (end.y - start.y).atan2(end.x - start.x));

    ctx.restore();
    Ok(())
}

fn draw_arrow_handles(
    ctx: &CanvasRenderingContext2d,
    arrow: &Arrow,
    zoom: f64,
) -> Result<(), JsValue> {
    let radius = HANDLE_RADIUS_PX * 0.5 / zoom;

    ctx.save();
    ctx.set_line_width(1.0 / zoom);
    ctx.set_stroke_style_str(&arrow.color);
    ctx.set_fill_style_str("#fff");

    for pt in [arrow.start, arrow.end] {
        ctx.begin_path();
        ctx.arc(pt.x, pt.y, radius, 0.0, 2.0 * PI)?;
        ctx.fill();
        ctx.stroke();
    }

    // The midpoint handle is filled: it is a toggle, not just an anchor.
    let mid = arrow.mid_handle();
    ctx.set_fill_style_str(&arrow.color);
    ctx.begin_path();
    ctx.arc(mid.x, mid.y, radius * 0.75, 0.0, 2.0 * PI)?;
    ctx.fill();

    ctx.restore();
    Ok(())
}
