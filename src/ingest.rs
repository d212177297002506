//! Upload ingestion: classifies incoming files and routes PDFs through the
//! decode boundary.
//!
//! Each file in a batch is handled independently: a file that cannot be
//! decoded is skipped with a warning and the rest of the batch continues.
//! Decoding itself is a host concern — the browser host renders the PDF's
//! first page to a canvas and hands back an image payload.

#[cfg(test)]
#[path = "ingest_test.rs"]
mod ingest_test;

use crate::library::Asset;

/// Upload kinds accepted by the ingest pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Image,
    Pdf,
}

/// Classify an upload by MIME type. Unsupported types yield `None`.
#[must_use]
pub fn classify(mime: &str) -> Option<UploadKind> {
    if mime == "application/pdf" {
        Some(UploadKind::Pdf)
    } else if mime.starts_with("image/") {
        Some(UploadKind::Image)
    } else {
        None
    }
}

/// An image payload produced by the decode boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Opaque image payload reference (e.g. a data URL).
    pub src: String,
    pub width_px: u32,
    pub height_px: u32,
}

/// Boundary: renders the first page of a PDF to an image payload.
///
/// Decode failure yields `None` — it is an expected outcome for malformed
/// uploads, not a fault.
pub trait PdfDecoder {
    fn decode_first_page(&mut self, bytes: &[u8]) -> Option<DecodedImage>;
}

/// One file in an upload batch, as handed over by the host.
#[derive(Debug, Clone)]
pub enum UploadFile {
    /// An image the host has already read into a payload reference.
    Image { name: String, src: String, width_px: u32, height_px: u32 },
    /// A PDF as raw bytes, to be decoded through the boundary.
    Pdf { name: String, bytes: Vec<u8> },
}

/// Process an upload batch into session assets. Files that fail to decode
/// are skipped; the rest of the batch continues.
pub fn ingest_batch(files: Vec<UploadFile>, decoder: &mut dyn PdfDecoder) -> Vec<Asset> {
    let mut assets = Vec::new();
    for file in files {
        match file {
            UploadFile::Image { name, src, width_px, height_px } => {
                assets.push(Asset::new(src, name, width_px, height_px, false));
            }
            UploadFile::Pdf { name, bytes } => match decoder.decode_first_page(&bytes) {
                Some(img) => {
                    assets.push(Asset::new(img.src, name, img.width_px, img.height_px, true));
                }
                None => {
                    log::warn!("skipping PDF upload {name:?}: first page could not be decoded");
                }
            },
        }
    }
    assets
}
