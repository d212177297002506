//! Shared numeric constants for the qcboard crate.

// ── Page geometry ───────────────────────────────────────────────

/// Logical page width in document units (A3 landscape at 96 units per inch).
pub const PAGE_WIDTH: f64 = 1587.0;

/// Logical page height in document units.
pub const PAGE_HEIGHT: f64 = 1123.0;

/// Height of the printed header band at the top of every page.
pub const HEADER_HEIGHT: f64 = 80.0;

// ── Zoom ────────────────────────────────────────────────────────

/// Smallest allowed display zoom factor.
pub const MIN_ZOOM: f64 = 0.2;

/// Largest allowed display zoom factor.
pub const MAX_ZOOM: f64 = 1.2;

/// Default display zoom; the full A3 sheet fits a typical viewport.
pub const DEFAULT_ZOOM: f64 = 0.6;

// ── Items ───────────────────────────────────────────────────────

/// Width floor for placed items; resize can never go below this.
pub const MIN_ITEM_WIDTH: f64 = 20.0;

/// Position a freshly placed item lands at.
pub const PLACED_ITEM_X: f64 = 50.0;

/// See [`PLACED_ITEM_X`].
pub const PLACED_ITEM_Y: f64 = 50.0;

/// Width a freshly placed item starts with.
pub const PLACED_ITEM_WIDTH: f64 = 150.0;

// ── Arrows ──────────────────────────────────────────────────────

/// Default stroke width stamped onto new arrows.
pub const DEFAULT_ARROW_WIDTH: f64 = 2.0;

/// Default stroke color stamped onto new arrows.
pub const DEFAULT_ARROW_COLOR: &str = "#dc2626";

/// Offset applied on both axes when promoting a straight arrow's midpoint
/// to a curve control point.
pub const MID_PROMOTE_OFFSET: f64 = 20.0;

// ── Main image ──────────────────────────────────────────────────

/// Smallest allowed background-image scale, in percent.
pub const MIN_MAIN_SCALE: f64 = 10.0;

/// Largest allowed background-image scale, in percent.
pub const MAX_MAIN_SCALE: f64 = 200.0;

/// Background-image scale a fresh upload starts at, in percent.
pub const DEFAULT_MAIN_SCALE: f64 = 100.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels for edit handles.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

/// Screen-space hit slop in pixels on either side of an arrow's path.
pub const ARROW_HIT_SLOP_PX: f64 = 10.0;

// ── Export ──────────────────────────────────────────────────────

/// Reference resolution the document extent is defined against.
pub const BASE_DPI: f64 = 96.0;

/// Physical width of the assembled output sheet, in millimetres (A3 landscape).
pub const SHEET_WIDTH_MM: f64 = 420.0;

/// Physical height of the assembled output sheet, in millimetres.
pub const SHEET_HEIGHT_MM: f64 = 297.0;
