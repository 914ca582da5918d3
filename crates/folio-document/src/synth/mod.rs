// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Synthesizer: turns a picked file into PDF bytes.
//
// The declared MIME type is resolved once into a `PayloadKind`, and exactly
// one strategy runs against a fresh document whose first page already
// carries the "Converted from" title line:
//
//   text/*   → text::render        (line-by-line, page overflow)
//   image/*  → image::render       (one image, half size)
//   other    → fallback::render    (file details block)

pub mod fallback;
pub mod image;
pub mod text;

use chrono::{DateTime, Utc};
use folio_bridge::{Base64Codec, FileSource};
use folio_core::error::{FolioError, Result};
use folio_core::{ConversionConfig, PayloadKind, SourceFile};
use tracing::{info, instrument};

use crate::pdf::document::{Document, TextStyle};

/// Output of one synthesis run.
#[derive(Debug, Clone)]
pub struct SynthesizedPdf {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// Stateless converter. Borrows its collaborators for the duration of one
/// call; every call builds a fresh document.
pub struct Synthesizer<'a> {
    source: &'a dyn FileSource,
    codec: &'a dyn Base64Codec,
    config: &'a ConversionConfig,
}

impl<'a> Synthesizer<'a> {
    pub fn new(
        source: &'a dyn FileSource,
        codec: &'a dyn Base64Codec,
        config: &'a ConversionConfig,
    ) -> Self {
        Self {
            source,
            codec,
            config,
        }
    }

    /// Convert `file` to PDF bytes, stamped with the current time.
    pub fn synthesize(&self, file: &SourceFile) -> Result<SynthesizedPdf> {
        self.synthesize_at(file, Utc::now())
    }

    /// Convert `file` to PDF bytes. `now` is used both for the fallback
    /// details block and for the PDF creation date.
    #[instrument(skip(self, file), fields(name = %file.display_name, mime = ?file.declared_mime_type))]
    pub fn synthesize_at(&self, file: &SourceFile, now: DateTime<Utc>) -> Result<SynthesizedPdf> {
        let document = self.build(file, now)?;
        let frozen = document.freeze()?;
        let page_count = frozen.page_count();
        let bytes = frozen.serialize_at(now)?;
        info!(page_count, bytes = bytes.len(), "synthesis complete");
        Ok(SynthesizedPdf { bytes, page_count })
    }

    /// Build the in-memory document for `file` without serializing it.
    ///
    /// `now` is the conversion time shown by the fallback details block.
    pub fn build(&self, file: &SourceFile, now: DateTime<Utc>) -> Result<Document> {
        let (width, height) = self.config.paper_size.dimensions_pt();
        let mut document = Document::with_page_size(width, height)?;
        let title = format!("Converted from: {}", file.display_name);
        document.set_title(title.clone());

        let first_page = document.add_default_page();
        let style = self.config.title;
        let baseline = style.baseline(height);
        if baseline <= 0.0 {
            return Err(FolioError::InvalidGeometry(format!(
                "title offset {} does not fit a page {height}pt tall",
                style.top_offset
            )));
        }
        document.draw_text(first_page, &title, TextStyle::new(style.x, baseline, style.font_size))?;

        let kind = file.payload_kind();
        info!(?kind, "dispatching payload");
        match kind {
            PayloadKind::Text => {
                text::render(&mut document, first_page, self.source, file, &self.config.text)?
            }
            PayloadKind::Image(format) => image::render(
                &mut document,
                first_page,
                self.source,
                self.codec,
                file,
                &format,
                &self.config.image,
            )?,
            PayloadKind::Fallback => {
                fallback::render(&mut document, first_page, self.source, file, now)?
            }
        }
        Ok(document)
    }
}
