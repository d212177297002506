#![allow(clippy::float_cmp)]

use super::*;
use crate::engine::EngineCore;

// =============================================================
// Helpers
// =============================================================

/// Rasterizer that records which pages were active when it ran.
struct RecordingRasterizer {
    captured: Vec<usize>,
    scales: Vec<f64>,
    fail_at: Option<usize>,
}

impl RecordingRasterizer {
    fn new() -> Self {
        Self { captured: Vec::new(), scales: Vec::new(), fail_at: None }
    }

    fn failing_at(index: usize) -> Self {
        Self { captured: Vec::new(), scales: Vec::new(), fail_at: Some(index) }
    }
}

impl PageRasterizer for RecordingRasterizer {
    fn rasterize_active_page(&mut self, dpi_scale: f64) -> Result<PageRaster, BoundaryError> {
        let index = self.captured.len();
        if self.fail_at == Some(index) {
            return Err(BoundaryError("surface lost".to_owned()));
        }
        self.captured.push(index);
        self.scales.push(dpi_scale);
        Ok(PageRaster { bytes: vec![index as u8], width_px: 1587, height_px: 1123 })
    }
}

/// Assembler that concatenates page bytes, or fails on demand.
struct StubAssembler {
    calls: usize,
    sheets: Vec<SheetSize>,
    fail: bool,
}

impl StubAssembler {
    fn new() -> Self {
        Self { calls: 0, sheets: Vec::new(), fail: false }
    }

    fn failing() -> Self {
        Self { calls: 0, sheets: Vec::new(), fail: true }
    }
}

impl SheetAssembler for StubAssembler {
    fn assemble(&mut self, pages: &[PageRaster], sheet: SheetSize) -> Result<Vec<u8>, BoundaryError> {
        self.calls += 1;
        self.sheets.push(sheet);
        if self.fail {
            return Err(BoundaryError("writer crashed".to_owned()));
        }
        Ok(pages.iter().flat_map(|p| p.bytes.clone()).collect())
    }
}

fn three_page_core() -> EngineCore {
    let mut core = EngineCore::new();
    core.doc.add_page();
    core.doc.add_page();
    core
}

// =============================================================
// ExportDpi
// =============================================================

#[test]
fn dpi_default_is_150() {
    assert_eq!(ExportDpi::default(), ExportDpi::Dpi150);
}

#[test]
fn dpi_scale_against_baseline() {
    assert_eq!(ExportDpi::Dpi96.scale(), 1.0);
    assert_eq!(ExportDpi::Dpi150.scale(), 150.0 / 96.0);
    assert_eq!(ExportDpi::Dpi300.scale(), 300.0 / 96.0);
}

// =============================================================
// SheetSize
// =============================================================

#[test]
fn sheet_default_is_a3_landscape() {
    let sheet = SheetSize::default();
    assert_eq!(sheet.width_mm, 420.0);
    assert_eq!(sheet.height_mm, 297.0);
}

// =============================================================
// export_document — success path
// =============================================================

#[test]
fn export_walks_pages_in_order() {
    let mut core = three_page_core();
    let mut rasterizer = RecordingRasterizer::new();
    let mut assembler = StubAssembler::new();

    let bytes =
        export_document(&mut core, &mut rasterizer, &mut assembler, ExportDpi::Dpi96).unwrap();
    assert_eq!(rasterizer.captured, vec![0, 1, 2]);
    assert_eq!(bytes, vec![0, 1, 2]);
    assert_eq!(assembler.calls, 1);
}

#[test]
fn export_passes_dpi_scale_to_every_page() {
    let mut core = three_page_core();
    let mut rasterizer = RecordingRasterizer::new();
    let mut assembler = StubAssembler::new();

    export_document(&mut core, &mut rasterizer, &mut assembler, ExportDpi::Dpi300).unwrap();
    assert_eq!(rasterizer.scales, vec![300.0 / 96.0; 3]);
}

#[test]
fn export_assembles_onto_a3_sheets() {
    let mut core = three_page_core();
    let mut rasterizer = RecordingRasterizer::new();
    let mut assembler = StubAssembler::new();

    export_document(&mut core, &mut rasterizer, &mut assembler, ExportDpi::Dpi150).unwrap();
    assert_eq!(assembler.sheets, vec![SheetSize::a3_landscape()]);
}

#[test]
fn export_restores_active_page_on_success() {
    let mut core = three_page_core();
    core.doc.set_active_page(1).unwrap();
    let mut rasterizer = RecordingRasterizer::new();
    let mut assembler = StubAssembler::new();

    export_document(&mut core, &mut rasterizer, &mut assembler, ExportDpi::Dpi96).unwrap();
    assert_eq!(core.doc.active_index(), 1);
}

#[test]
fn export_single_page_document() {
    let mut core = EngineCore::new();
    let mut rasterizer = RecordingRasterizer::new();
    let mut assembler = StubAssembler::new();

    let bytes =
        export_document(&mut core, &mut rasterizer, &mut assembler, ExportDpi::Dpi96).unwrap();
    assert_eq!(bytes, vec![0]);
}

// =============================================================
// export_document — failure paths
// =============================================================

#[test]
fn rasterize_failure_aborts_without_assembly() {
    let mut core = three_page_core();
    let mut rasterizer = RecordingRasterizer::failing_at(1);
    let mut assembler = StubAssembler::new();

    let result = export_document(&mut core, &mut rasterizer, &mut assembler, ExportDpi::Dpi96);
    match result {
        Err(ExportError::Rasterize { index, .. }) => assert_eq!(index, 1),
        other => panic!("expected Rasterize error, got {other:?}"),
    }
    // No partial output: the assembler never ran.
    assert_eq!(assembler.calls, 0);
}

#[test]
fn rasterize_failure_still_restores_active_page() {
    let mut core = three_page_core();
    core.doc.set_active_page(2).unwrap();
    let mut rasterizer = RecordingRasterizer::failing_at(0);
    let mut assembler = StubAssembler::new();

    drop(export_document(&mut core, &mut rasterizer, &mut assembler, ExportDpi::Dpi96));
    assert_eq!(core.doc.active_index(), 2);
}

#[test]
fn assemble_failure_surfaces_and_restores() {
    let mut core = three_page_core();
    core.doc.set_active_page(0).unwrap();
    let mut rasterizer = RecordingRasterizer::new();
    let mut assembler = StubAssembler::failing();

    let result = export_document(&mut core, &mut rasterizer, &mut assembler, ExportDpi::Dpi96);
    assert!(matches!(result, Err(ExportError::Assemble(_))));
    assert_eq!(core.doc.active_index(), 0);
}

#[test]
fn export_failure_leaves_document_intact() {
    let mut core = three_page_core();
    let pages_before = core.doc.pages().to_vec();
    let mut rasterizer = RecordingRasterizer::failing_at(2);
    let mut assembler = StubAssembler::new();

    drop(export_document(&mut core, &mut rasterizer, &mut assembler, ExportDpi::Dpi96));
    assert_eq!(core.doc.pages(), &pages_before[..]);
}

// =============================================================
// Errors
// =============================================================

#[test]
fn rasterize_error_names_page() {
    let err = ExportError::Rasterize { index: 3, source: BoundaryError("x".to_owned()) };
    assert!(err.to_string().contains("page 3"));
}

#[test]
fn boundary_error_displays_reason() {
    let err = BoundaryError("canvas detached".to_owned());
    assert_eq!(err.to_string(), "canvas detached");
}
