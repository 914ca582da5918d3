// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image embedding: one raster image, scaled, placed once on the first page.

use folio_bridge::{Base64Codec, FileSource};
use folio_core::config::ImagePlacement;
use folio_core::error::Result;
use folio_core::{RasterFormat, SourceFile};
use tracing::{debug, instrument};

use crate::pdf::document::{Document, ImageRect, PageRef};

/// Read `file` as base64, decode it as `format`, and draw it on `page`.
///
/// The format comes from the declared MIME type only; the bytes are never
/// sniffed.
#[instrument(skip_all, fields(name = %file.display_name, format = %format))]
pub fn render(
    document: &mut Document,
    page: PageRef,
    source: &dyn FileSource,
    codec: &dyn Base64Codec,
    file: &SourceFile,
    format: &RasterFormat,
    placement: &ImagePlacement,
) -> Result<()> {
    let bytes = {
        let encoded = source.read_bytes_base64(&file.locator)?;
        codec.decode(&encoded)?
    };

    let image = document.embed_raster_image(&bytes, format)?;
    drop(bytes);

    let size = image.scaled(placement.scale);
    debug!(
        intrinsic_w = image.width(),
        intrinsic_h = image.height(),
        width = size.width,
        height = size.height,
        "placing image"
    );
    document.draw_image(
        page,
        &image,
        ImageRect {
            x: placement.x,
            y: placement.y,
            width: size.width,
            height: size.height,
        },
    )
}

#[cfg(test)]
mod tests {
    use folio_bridge::StandardBase64;
    use folio_core::error::FolioError;

    use super::*;
    use crate::pdf::document::DrawOperation;
    use crate::raster::tests::{jpeg_bytes, png_bytes};
    use crate::synth::fakes::MemorySource;

    fn run(source: &MemorySource, mime: &str) -> Result<Document> {
        let mut doc = Document::new();
        let page = doc.add_default_page();
        let file = SourceFile::new("img", "picture", Some(mime.into()));
        render(
            &mut doc,
            page,
            source,
            &StandardBase64,
            &file,
            &RasterFormat::from_mime(mime),
            &ImagePlacement::default(),
        )?;
        Ok(doc)
    }

    fn placed_size(doc: &Document) -> (f32, f32) {
        doc.pages()[0]
            .operations()
            .iter()
            .find_map(|op| match op {
                DrawOperation::Image { width, height, .. } => Some((*width, *height)),
                DrawOperation::Text { .. } => None,
            })
            .unwrap()
    }

    #[test]
    fn png_and_jpeg_are_drawn_at_half_size() {
        let source = MemorySource::default().with_file("img", png_bytes(101, 64));
        let doc = run(&source, "image/png").unwrap();
        let (w, h) = placed_size(&doc);
        assert!((w - 50.5).abs() < 1e-4);
        assert!((h - 32.0).abs() < 1e-4);

        let source = MemorySource::default().with_file("img", jpeg_bytes(30, 18));
        let doc = run(&source, "image/jpeg").unwrap();
        assert_eq!(placed_size(&doc), (15.0, 9.0));
    }

    #[test]
    fn image_is_drawn_exactly_once_at_fixed_origin() {
        let source = MemorySource::default().with_file("img", png_bytes(10, 10));
        let doc = run(&source, "image/png").unwrap();
        let ops = doc.pages()[0].operations();
        assert_eq!(ops.len(), 1);
        match &ops[0] {
            DrawOperation::Image { x, y, .. } => assert_eq!((*x, *y), (50.0, 400.0)),
            other => panic!("unexpected operation {other:?}"),
        }
        assert_eq!(doc.page_count(), 1);
    }

    #[test]
    fn unknown_image_subtype_is_decoded_as_jpeg() {
        let source = MemorySource::default().with_file("img", jpeg_bytes(8, 8));
        assert!(run(&source, "image/x-camera-raw").is_ok());

        // PNG bytes under a JPEG-implied type fail: no sniffing.
        let source = MemorySource::default().with_file("img", png_bytes(8, 8));
        let err = run(&source, "image/x-camera-raw").unwrap_err();
        assert!(matches!(err, FolioError::CorruptImageData(_)));
    }

    #[test]
    fn gif_is_unsupported() {
        let source = MemorySource::default().with_file("img", b"GIF89a....".to_vec());
        let err = run(&source, "image/gif").unwrap_err();
        assert!(matches!(err, FolioError::UnsupportedImageFormat(_)));
    }

    #[test]
    fn empty_png_is_corrupt() {
        let source = MemorySource::default().with_file("img", Vec::new());
        let err = run(&source, "image/png").unwrap_err();
        assert!(matches!(err, FolioError::CorruptImageData(_)));
    }

    #[test]
    fn bad_base64_is_source_unreadable() {
        let source = MemorySource::default().with_encoded("img", "%%% not base64 %%%");
        let err = run(&source, "image/png").unwrap_err();
        assert!(matches!(err, FolioError::SourceUnreadable(_)));
    }

    #[test]
    fn missing_source_is_source_unreadable() {
        let err = run(&MemorySource::default(), "image/png").unwrap_err();
        assert!(matches!(err, FolioError::SourceUnreadable(_)));
    }
}
