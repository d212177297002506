#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// --- Point ---

#[test]
fn point_new() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(p.x, 3.0);
    assert_eq!(p.y, 4.0);
}

#[test]
fn point_clone() {
    let p = Point::new(1.0, 2.0);
    let q = p;
    assert!(point_approx_eq(p, q));
}

#[test]
fn point_equality() {
    let a = Point::new(1.0, 2.0);
    let b = Point::new(1.0, 2.0);
    assert_eq!(a, b);
}

#[test]
fn point_inequality() {
    let a = Point::new(1.0, 2.0);
    let b = Point::new(1.0, 3.0);
    assert_ne!(a, b);
}

#[test]
fn point_serde_roundtrip() {
    let p = Point::new(100.5, -42.25);
    let json = serde_json::to_string(&p).unwrap();
    let back: Point = serde_json::from_str(&json).unwrap();
    assert_eq!(p, back);
}

#[test]
fn point_debug_format() {
    let p = Point::new(1.0, 2.0);
    let s = format!("{p:?}");
    assert!(s.contains("Point"));
}

// --- View defaults ---

#[test]
fn view_default_zoom() {
    let view = View::default();
    assert_eq!(view.zoom(), DEFAULT_ZOOM);
}

#[test]
fn view_new_within_domain() {
    let view = View::new(0.8);
    assert_eq!(view.zoom(), 0.8);
}

#[test]
fn view_new_clamps_low() {
    let view = View::new(0.05);
    assert_eq!(view.zoom(), MIN_ZOOM);
}

#[test]
fn view_new_clamps_high() {
    let view = View::new(5.0);
    assert_eq!(view.zoom(), MAX_ZOOM);
}

#[test]
fn set_zoom_clamps_low() {
    let mut view = View::default();
    view.set_zoom(-1.0);
    assert_eq!(view.zoom(), MIN_ZOOM);
}

#[test]
fn set_zoom_clamps_high() {
    let mut view = View::default();
    view.set_zoom(2.0);
    assert_eq!(view.zoom(), MAX_ZOOM);
}

#[test]
fn set_zoom_within_domain() {
    let mut view = View::default();
    view.set_zoom(1.0);
    assert_eq!(view.zoom(), 1.0);
}

// --- screen_to_page ---

#[test]
fn screen_to_page_identity_at_zoom_one() {
    let view = View::new(1.0);
    let page = view.screen_to_page(Point::new(50.0, 75.0));
    assert!(point_approx_eq(page, Point::new(50.0, 75.0)));
}

#[test]
fn screen_to_page_with_zoom() {
    let view = View::new(0.5);
    let page = view.screen_to_page(Point::new(40.0, 80.0));
    assert!(approx_eq(page.x, 80.0));
    assert!(approx_eq(page.y, 160.0));
}

#[test]
fn screen_to_page_default_zoom() {
    let view = View::default();
    let page = view.screen_to_page(Point::new(60.0, 30.0));
    assert!(approx_eq(page.x, 100.0));
    assert!(approx_eq(page.y, 50.0));
}

#[test]
fn screen_to_page_origin() {
    let view = View::new(0.3);
    let page = view.screen_to_page(Point::new(0.0, 0.0));
    assert!(point_approx_eq(page, Point::new(0.0, 0.0)));
}

#[test]
fn screen_to_page_negative_coords() {
    let view = View::new(0.5);
    let page = view.screen_to_page(Point::new(-10.0, -20.0));
    assert!(approx_eq(page.x, -20.0));
    assert!(approx_eq(page.y, -40.0));
}

// --- page_to_screen ---

#[test]
fn page_to_screen_identity_at_zoom_one() {
    let view = View::new(1.0);
    let screen = view.page_to_screen(Point::new(50.0, 75.0));
    assert!(point_approx_eq(screen, Point::new(50.0, 75.0)));
}

#[test]
fn page_to_screen_with_zoom() {
    let view = View::new(0.5);
    let screen = view.page_to_screen(Point::new(10.0, 20.0));
    assert!(approx_eq(screen.x, 5.0));
    assert!(approx_eq(screen.y, 10.0));
}

// --- Round trips ---

#[test]
fn round_trip_default_zoom() {
    let view = View::default();
    let page = Point::new(100.0, 200.0);
    let back = view.screen_to_page(view.page_to_screen(page));
    assert!(point_approx_eq(page, back));
}

#[test]
fn round_trip_fractional_zoom() {
    let view = View::new(0.75);
    let page = Point::new(333.3, 999.9);
    let back = view.screen_to_page(view.page_to_screen(page));
    assert!(point_approx_eq(page, back));
}

#[test]
fn round_trip_screen_first() {
    let view = View::new(1.2);
    let screen = Point::new(400.0, 300.0);
    let back = view.page_to_screen(view.screen_to_page(screen));
    assert!(point_approx_eq(screen, back));
}

// --- screen_dist_to_page ---

#[test]
fn screen_dist_identity_at_zoom_one() {
    let view = View::new(1.0);
    assert!(approx_eq(view.screen_dist_to_page(42.0), 42.0));
}

#[test]
fn screen_dist_grows_when_zoomed_out() {
    let view = View::new(0.5);
    assert!(approx_eq(view.screen_dist_to_page(10.0), 20.0));
}

#[test]
fn screen_dist_zero() {
    let view = View::new(0.9);
    assert!(approx_eq(view.screen_dist_to_page(0.0), 0.0));
}

// --- screen_extent ---

#[test]
fn screen_extent_at_zoom_one() {
    let view = View::new(1.0);
    let (w, h) = view.screen_extent();
    assert!(approx_eq(w, PAGE_WIDTH));
    assert!(approx_eq(h, PAGE_HEIGHT));
}

#[test]
fn screen_extent_scales_with_zoom() {
    let view = View::new(0.5);
    let (w, h) = view.screen_extent();
    assert!(approx_eq(w, PAGE_WIDTH * 0.5));
    assert!(approx_eq(h, PAGE_HEIGHT * 0.5));
}

#[test]
fn zoom_never_affects_stored_coordinates() {
    // Converting the same screen point at two zoom levels gives different
    // document points; the document itself never moves.
    let near = View::new(1.0);
    let far = View::new(0.5);
    let screen = Point::new(100.0, 100.0);
    let a = near.screen_to_page(screen);
    let b = far.screen_to_page(screen);
    assert!(approx_eq(a.x * 2.0, b.x));
    assert!(approx_eq(a.y * 2.0, b.y));
}
