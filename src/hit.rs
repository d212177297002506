//! Hit-testing against the active page's entities and their edit handles.
//!
//! All tests run in document space; screen-constant tolerances (handle radii,
//! arrow slop) are divided by the current zoom so they track what the
//! operator sees. Arrows sit above items, so they are tested first; within a
//! layer the topmost entity is the most recently added one.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use uuid::Uuid;

use crate::consts::{ARROW_HIT_SLOP_PX, HANDLE_RADIUS_PX};
use crate::doc::{Arrow, ArrowId, Bend, CanvasItem, ItemId, Page};
use crate::view::{Point, View};

/// Number of segments a curved arrow is flattened into for distance tests.
const CURVE_STEPS: usize = 16;

/// Which editable point of an arrow a handle belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowPoint {
    Start,
    End,
    Mid,
}

/// Result of a hit test: the entity (or handle) under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    /// The body of a placed item.
    Item { id: ItemId },
    /// The resize handle at the selected item's bottom-right corner.
    ItemResizeHandle { id: ItemId },
    /// The path of an arrow.
    Arrow { id: ArrowId },
    /// An edit handle of the selected arrow.
    ArrowHandle { id: ArrowId, point: ArrowPoint },
}

/// Test what lies under `page_pt`, checking the selected entity's handles
/// first, then arrow paths, then item bodies.
#[must_use]
pub fn hit_test(page_pt: Point, page: &Page, view: &View, selected: Option<Uuid>) -> Option<Hit> {
    let handle_r = HANDLE_RADIUS_PX / view.zoom();

    if let Some(sel_id) = selected {
        if let Some(arrow) = page.arrow(sel_id) {
            if let Some(point) = arrow_handle_at(arrow, page_pt, handle_r) {
                return Some(Hit::ArrowHandle { id: arrow.id, point });
            }
        }
        if let Some(item) = page.item(sel_id) {
            if dist(page_pt, resize_handle_position(item)) <= handle_r {
                return Some(Hit::ItemResizeHandle { id: item.id });
            }
        }
    }

    let slop = ARROW_HIT_SLOP_PX / view.zoom();
    for arrow in page.arrows.iter().rev() {
        if arrow_path_distance(arrow, page_pt) <= slop.max(arrow.width / 2.0) {
            return Some(Hit::Arrow { id: arrow.id });
        }
    }

    for item in page.items.iter().rev() {
        if item_contains(item, page_pt) {
            return Some(Hit::Item { id: item.id });
        }
    }

    None
}

/// Document-space position of an item's resize handle (bottom-right corner).
#[must_use]
pub fn resize_handle_position(item: &CanvasItem) -> Point {
    Point::new(item.x + item.width, item.y + item.height())
}

/// Point on a quadratic curve at parameter `t`, with `mid` as control point.
#[must_use]
pub fn curve_point(start: Point, mid: Point, end: Point, t: f64) -> Point {
    let u = 1.0 - t;
    Point::new(
        u * u * start.x + 2.0 * u * t * mid.x + t * t * end.x,
        u * u * start.y + 2.0 * u * t * mid.y + t * t * end.y,
    )
}

fn arrow_handle_at(arrow: &Arrow, page_pt: Point, handle_r: f64) -> Option<ArrowPoint> {
    if dist(page_pt, arrow.start) <= handle_r {
        return Some(ArrowPoint::Start);
    }
    if dist(page_pt, arrow.end) <= handle_r {
        return Some(ArrowPoint::End);
    }
    if dist(page_pt, arrow.mid_handle()) <= handle_r {
        return Some(ArrowPoint::Mid);
    }
    None
}

fn item_contains(item: &CanvasItem, p: Point) -> bool {
    p.x >= item.x && p.x <= item.x + item.width && p.y >= item.y && p.y <= item.y + item.height()
}

/// Shortest distance from `p` to the arrow's rendered path.
fn arrow_path_distance(arrow: &Arrow, p: Point) -> f64 {
    match arrow.bend {
        Bend::Straight => dist_to_segment(p, arrow.start, arrow.end),
        Bend::Curved { mid } => {
            let mut best = f64::INFINITY;
            let mut prev = arrow.start;
            for step in 1..=CURVE_STEPS {
                #[allow(clippy::cast_precision_loss)]
                let t = step as f64 / CURVE_STEPS as f64;
                let next = curve_point(arrow.start, mid, arrow.end, t);
                best = best.min(dist_to_segment(p, prev, next));
                prev = next;
            }
            best
        }
    }
}

fn dist(a: Point, b: Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

fn dist_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return dist(p, a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    dist(p, Point::new(a.x + t * dx, a.y + t * dy))
}
