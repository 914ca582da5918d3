// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory document model: pages hold an append-only list of draw
// operations; images are decoded once and referenced by handle.
//
// Coordinates are PDF points with the origin at the bottom-left corner of
// the page. Nothing here wraps or reflows text: callers place every line.

use std::sync::atomic::{AtomicU64, Ordering};

use folio_core::error::{FolioError, Result};
use folio_core::{PaperSize, RasterFormat};
use tracing::debug;

use crate::pdf::serialize::FrozenDocument;
use crate::raster::RasterImage;

/// Spacing between consecutive lines of a multi-line text operation, as a
/// multiple of the font size.
pub const LINE_SPACING: f32 = 1.2;

static NEXT_DOCUMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Handle to a page of one specific document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRef {
    document: u64,
    index: usize,
}

impl PageRef {
    /// Zero-based position of the page in its document.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Fill colour for text, components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
}

impl Default for Rgb {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Placement options for [`Document::draw_text`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub x: f32,
    /// Baseline of the first line.
    pub y: f32,
    pub size: f32,
    /// Text is clipped to `[x, x + max_width]` when set.
    pub max_width: Option<f32>,
    pub color: Rgb,
}

impl TextStyle {
    pub fn new(x: f32, y: f32, size: f32) -> Self {
        Self {
            x,
            y,
            size,
            max_width: None,
            color: Rgb::BLACK,
        }
    }

    pub fn with_max_width(mut self, max_width: f32) -> Self {
        self.max_width = Some(max_width);
        self
    }
}

/// Placement rectangle for [`Document::draw_image`], lower-left anchored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// One atomic rendering instruction. Never mutated once appended.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOperation {
    Text {
        content: String,
        x: f32,
        y: f32,
        font_size: f32,
        max_width: Option<f32>,
        color: Rgb,
    },
    Image {
        /// Index into the owning document's embedded images.
        image: usize,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

impl DrawOperation {
    /// Text content, for text operations.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text { content, .. } => Some(content),
            Self::Image { .. } => None,
        }
    }
}

/// One page's worth of draw operations plus fixed dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct PageCanvas {
    width: f32,
    height: f32,
    operations: Vec<DrawOperation>,
}

impl PageCanvas {
    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn operations(&self) -> &[DrawOperation] {
        &self.operations
    }

    /// Iterate the text content drawn on this page, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.operations.iter().filter_map(DrawOperation::text)
    }
}

/// An image decoded into a document, with its intrinsic pixel size.
///
/// Only valid for the document that embedded it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbeddedImage {
    document: u64,
    index: usize,
    width: u32,
    height: u32,
}

/// Rendered size of an image after scaling, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledSize {
    pub width: f32,
    pub height: f32,
}

impl EmbeddedImage {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Intrinsic size multiplied by `factor` (one pixel maps to one point).
    pub fn scaled(&self, factor: f32) -> ScaledSize {
        ScaledSize {
            width: self.width as f32 * factor,
            height: self.height as f32 * factor,
        }
    }
}

/// The PDF being built: an ordered list of pages plus embedded images.
///
/// Mutable only while building. [`Document::freeze`] turns it into an
/// immutable [`FrozenDocument`] that can be serialized.
#[derive(Debug)]
pub struct Document {
    id: u64,
    default_size: (f32, f32),
    title: Option<String>,
    pages: Vec<PageCanvas>,
    images: Vec<RasterImage>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document with A4 as the default page size.
    pub fn new() -> Self {
        Self::unchecked(PaperSize::A4.dimensions_pt())
    }

    /// Create an empty document whose default pages are `width` x `height`
    /// points. Both must be finite and positive.
    pub fn with_page_size(width: f32, height: f32) -> Result<Self> {
        check_page_size(width, height)?;
        Ok(Self::unchecked((width, height)))
    }

    fn unchecked(default_size: (f32, f32)) -> Self {
        Self {
            id: NEXT_DOCUMENT_ID.fetch_add(1, Ordering::Relaxed),
            default_size,
            title: None,
            pages: Vec::new(),
            images: Vec::new(),
        }
    }

    /// Set the title stored in the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn default_page_size(&self) -> (f32, f32) {
        self.default_size
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn pages(&self) -> &[PageCanvas] {
        &self.pages
    }

    pub fn page(&self, page: PageRef) -> Option<&PageCanvas> {
        if page.document != self.id {
            return None;
        }
        self.pages.get(page.index)
    }

    // -- Pages ----------------------------------------------------------------

    /// Append a page of the given size and return its handle.
    pub fn add_page(&mut self, width: f32, height: f32) -> Result<PageRef> {
        check_page_size(width, height)?;
        Ok(self.push_page(width, height))
    }

    /// Append a page of the document's default size. The default size was
    /// validated when the document was created, so this cannot fail.
    pub fn add_default_page(&mut self) -> PageRef {
        let (width, height) = self.default_size;
        self.push_page(width, height)
    }

    fn push_page(&mut self, width: f32, height: f32) -> PageRef {
        self.pages.push(PageCanvas {
            width,
            height,
            operations: Vec::new(),
        });
        let index = self.pages.len() - 1;
        debug!(page = index + 1, width, height, "page added");
        PageRef {
            document: self.id,
            index,
        }
    }

    fn page_mut(&mut self, page: PageRef) -> Result<&mut PageCanvas> {
        if page.document != self.id {
            return Err(FolioError::InvalidGeometry(
                "page belongs to a different document".into(),
            ));
        }
        self.pages.get_mut(page.index).ok_or_else(|| {
            FolioError::InvalidGeometry(format!("page {} does not exist", page.index + 1))
        })
    }

    // -- Drawing --------------------------------------------------------------

    /// Append a text operation. Lines separated by `\n` are stacked
    /// downwards, [`LINE_SPACING`] x size apart.
    pub fn draw_text(&mut self, page: PageRef, content: &str, style: TextStyle) -> Result<()> {
        if !style.x.is_finite() || !style.y.is_finite() {
            return Err(FolioError::InvalidGeometry(format!(
                "text position ({}, {}) is not finite",
                style.x, style.y
            )));
        }
        if !style.size.is_finite() || style.size <= 0.0 {
            return Err(FolioError::InvalidGeometry(format!(
                "font size {} must be positive",
                style.size
            )));
        }
        if let Some(max_width) = style.max_width.filter(|w| !w.is_finite() || *w <= 0.0) {
            return Err(FolioError::InvalidGeometry(format!(
                "max width {max_width} must be positive"
            )));
        }

        self.page_mut(page)?.operations.push(DrawOperation::Text {
            content: content.to_string(),
            x: style.x,
            y: style.y,
            font_size: style.size,
            max_width: style.max_width,
            color: style.color,
        });
        Ok(())
    }

    /// Decode `bytes` as the given raster format and keep it for drawing.
    pub fn embed_raster_image(&mut self, bytes: &[u8], format: &RasterFormat) -> Result<EmbeddedImage> {
        let raster = RasterImage::decode(bytes, format)?;
        let embedded = EmbeddedImage {
            document: self.id,
            index: self.images.len(),
            width: raster.width(),
            height: raster.height(),
        };
        self.images.push(raster);
        Ok(embedded)
    }

    /// Append an image operation placing `image` in `rect`.
    pub fn draw_image(&mut self, page: PageRef, image: &EmbeddedImage, rect: ImageRect) -> Result<()> {
        if image.document != self.id {
            return Err(FolioError::InvalidGeometry(
                "image was embedded in a different document".into(),
            ));
        }
        let finite = [rect.x, rect.y, rect.width, rect.height]
            .iter()
            .all(|v| v.is_finite());
        if !finite || rect.width <= 0.0 || rect.height <= 0.0 {
            return Err(FolioError::InvalidGeometry(format!(
                "image rectangle {rect:?} is not drawable"
            )));
        }

        self.page_mut(page)?.operations.push(DrawOperation::Image {
            image: image.index,
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
        });
        Ok(())
    }

    // -- Output ---------------------------------------------------------------

    /// Finish building. Fails with `Serialization` if there are no pages.
    pub fn freeze(self) -> Result<FrozenDocument> {
        if self.pages.is_empty() {
            return Err(FolioError::Serialization("document has no pages".into()));
        }
        Ok(FrozenDocument::new(self.title, self.pages, self.images))
    }

    /// Freeze and serialize in one step, stamping the current time.
    pub fn serialize(self) -> Result<Vec<u8>> {
        self.freeze()?.serialize()
    }
}

fn check_page_size(width: f32, height: f32) -> Result<()> {
    let valid = |v: f32| v.is_finite() && v > 0.0;
    if valid(width) && valid(height) {
        Ok(())
    } else {
        Err(FolioError::InvalidGeometry(format!(
            "page size {width} x {height} must be finite and positive"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_document_has_no_pages() {
        let doc = Document::new();
        assert_eq!(doc.page_count(), 0);
        assert_eq!(doc.default_page_size(), (595.0, 842.0));
    }

    #[test]
    fn add_page_returns_sequential_handles() {
        let mut doc = Document::new();
        let first = doc.add_default_page();
        let second = doc.add_page(300.0, 400.0).unwrap();
        assert_eq!(first.index(), 0);
        assert_eq!(second.index(), 1);
        assert_eq!(doc.page(second).unwrap().width(), 300.0);
    }

    #[test]
    fn draw_text_appends_in_order() {
        let mut doc = Document::new();
        let page = doc.add_default_page();
        doc.draw_text(page, "one", TextStyle::new(50.0, 750.0, 12.0)).unwrap();
        doc.draw_text(page, "two", TextStyle::new(50.0, 736.0, 12.0)).unwrap();

        let texts: Vec<&str> = doc.page(page).unwrap().texts().collect();
        assert_eq!(texts, ["one", "two"]);
    }

    #[test]
    fn draw_text_rejects_bad_geometry() {
        let mut doc = Document::new();
        let page = doc.add_default_page();

        for style in [
            TextStyle::new(f32::NAN, 10.0, 12.0),
            TextStyle::new(10.0, f32::INFINITY, 12.0),
            TextStyle::new(10.0, 10.0, 0.0),
            TextStyle::new(10.0, 10.0, -3.0),
            TextStyle::new(10.0, 10.0, 12.0).with_max_width(0.0),
        ] {
            let err = doc.draw_text(page, "x", style).unwrap_err();
            assert!(matches!(err, FolioError::InvalidGeometry(_)), "{style:?}");
        }
        assert!(doc.page(page).unwrap().operations().is_empty());
    }

    #[test]
    fn pages_cannot_cross_documents() {
        let mut a = Document::new();
        let mut b = Document::new();
        let page_a = a.add_default_page();
        b.add_default_page();

        let err = b
            .draw_text(page_a, "x", TextStyle::new(1.0, 1.0, 12.0))
            .unwrap_err();
        assert!(matches!(err, FolioError::InvalidGeometry(_)));
        assert!(b.page(page_a).is_none());
    }

    #[test]
    fn freeze_requires_a_page() {
        let err = Document::new().freeze().unwrap_err();
        assert!(matches!(err, FolioError::Serialization(_)));
    }

    #[test]
    fn unsupported_format_is_rejected_before_decoding() {
        let mut doc = Document::new();
        let err = doc
            .embed_raster_image(b"GIF89a", &RasterFormat::Unsupported("image/gif".into()))
            .unwrap_err();
        assert!(matches!(err, FolioError::UnsupportedImageFormat(_)));
    }

    #[test]
    fn scaled_size_halves_dimensions() {
        let image = EmbeddedImage {
            document: 0,
            index: 0,
            width: 641,
            height: 480,
        };
        let size = image.scaled(0.5);
        assert!((size.width - 320.5).abs() < f32::EPSILON);
        assert!((size.height - 240.0).abs() < f32::EPSILON);
    }

    #[test]
    fn page_sizes_must_be_finite_and_positive() {
        for (w, h) in [(0.0, 842.0), (595.0, -1.0), (f32::NAN, 842.0), (595.0, f32::INFINITY)] {
            let err = Document::with_page_size(w, h).unwrap_err();
            assert!(matches!(err, FolioError::InvalidGeometry(_)), "{w} x {h}");

            let mut doc = Document::new();
            let err = doc.add_page(w, h).unwrap_err();
            assert!(matches!(err, FolioError::InvalidGeometry(_)), "{w} x {h}");
            assert_eq!(doc.page_count(), 0);
        }
    }
}
