//! Export pipeline boundary: rasterize each page, assemble a document file.
//!
//! Rasterization and file assembly are host concerns (the browser host
//! captures the rendered page surface and feeds a PDF/slide builder); this
//! module owns the driver that walks the pages in order. The driver switches
//! the active page before each capture and restores the original active page
//! on every path — success, rasterize failure, or assembly failure. Any
//! failure aborts the whole run; no partial output is returned.

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use crate::consts::{BASE_DPI, SHEET_HEIGHT_MM, SHEET_WIDTH_MM};
use crate::doc::DocError;
use crate::engine::EngineCore;

/// Error reported by a boundary implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct BoundaryError(pub String);

/// Error aborting an export run.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// A page could not be captured; the run stops at that page.
    #[error("page {index} could not be rasterized")]
    Rasterize {
        index: usize,
        #[source]
        source: BoundaryError,
    },
    /// The captured pages could not be assembled into an output file.
    #[error("the output file could not be assembled")]
    Assemble(#[source] BoundaryError),
    /// The document rejected a page switch mid-run.
    #[error(transparent)]
    Doc(#[from] DocError),
}

/// Operator-selectable export resolutions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportDpi {
    Dpi96,
    #[default]
    Dpi150,
    Dpi300,
}

impl ExportDpi {
    /// Scale factor against the 96-unit baseline resolution.
    #[must_use]
    pub fn scale(self) -> f64 {
        match self {
            Self::Dpi96 => 1.0,
            Self::Dpi150 => 150.0 / BASE_DPI,
            Self::Dpi300 => 300.0 / BASE_DPI,
        }
    }
}

/// An encoded raster of one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRaster {
    pub bytes: Vec<u8>,
    pub width_px: u32,
    pub height_px: u32,
}

/// Physical sheet size of the assembled output, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetSize {
    pub width_mm: f64,
    pub height_mm: f64,
}

impl SheetSize {
    /// The fixed A3-landscape output sheet.
    #[must_use]
    pub fn a3_landscape() -> Self {
        Self { width_mm: SHEET_WIDTH_MM, height_mm: SHEET_HEIGHT_MM }
    }
}

impl Default for SheetSize {
    fn default() -> Self {
        Self::a3_landscape()
    }
}

/// Boundary: captures the currently active page as an encoded raster.
pub trait PageRasterizer {
    /// Rasterize the active page at `dpi_scale` times the baseline
    /// resolution.
    ///
    /// # Errors
    ///
    /// Any failure aborts the export run.
    fn rasterize_active_page(&mut self, dpi_scale: f64) -> Result<PageRaster, BoundaryError>;
}

/// Boundary: assembles per-page rasters into a single output file.
pub trait SheetAssembler {
    /// Build the output file, one sheet per raster, in order.
    ///
    /// # Errors
    ///
    /// Any failure aborts the export run; no partial file may be left in a
    /// usable state.
    fn assemble(&mut self, pages: &[PageRaster], sheet: SheetSize) -> Result<Vec<u8>, BoundaryError>;
}

/// Export every page in order and assemble the output file.
///
/// The active page is switched to each page before capture and restored
/// afterward regardless of how the run ends.
///
/// # Errors
///
/// [`ExportError`] from the first failing step; the document state (minus
/// the restored active-page pointer) is untouched.
pub fn export_document(
    core: &mut EngineCore,
    rasterizer: &mut dyn PageRasterizer,
    assembler: &mut dyn SheetAssembler,
    dpi: ExportDpi,
) -> Result<Vec<u8>, ExportError> {
    let original = core.doc.active_index();
    let captured = rasterize_all(core, rasterizer, dpi);
    // Restore the pointer before reporting success or failure.
    if core.doc.set_active_page(original).is_err() {
        log::warn!("active page {original} no longer exists after export");
    }
    let rasters = captured?;
    assembler
        .assemble(&rasters, SheetSize::a3_landscape())
        .map_err(ExportError::Assemble)
}

fn rasterize_all(
    core: &mut EngineCore,
    rasterizer: &mut dyn PageRasterizer,
    dpi: ExportDpi,
) -> Result<Vec<PageRaster>, ExportError> {
    let mut rasters = Vec::with_capacity(core.doc.page_count());
    for index in 0..core.doc.page_count() {
        core.doc.set_active_page(index)?;
        let raster = rasterizer
            .rasterize_active_page(dpi.scale())
            .map_err(|source| ExportError::Rasterize { index, source })?;
        rasters.push(raster);
    }
    Ok(rasters)
}
