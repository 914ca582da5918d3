// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text layout: one line per `\n`, top to bottom, new page on overflow.

use folio_bridge::FileSource;
use folio_core::SourceFile;
use folio_core::config::TextLayout;
use folio_core::error::{FolioError, Result};
use tracing::{debug, instrument};

use crate::pdf::document::{Document, PageRef, TextStyle};

/// Read `file` as text and lay it out starting on `first_page`.
#[instrument(skip_all, fields(name = %file.display_name))]
pub fn render(
    document: &mut Document,
    first_page: PageRef,
    source: &dyn FileSource,
    file: &SourceFile,
    layout: &TextLayout,
) -> Result<()> {
    let text = source.read_text(&file.locator)?;
    debug!(chars = text.len(), "text payload read");
    layout_lines(document, first_page, &text, layout)?;
    Ok(())
}

/// Split `text` into lines. A trailing newline ends the last line rather
/// than starting an empty one, and `\r` from CRLF endings is dropped.
pub fn split_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    let body = text.strip_suffix('\n').unwrap_or(text);
    body.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

/// Place each line at the cursor, starting a new page once the cursor
/// reaches the bottom margin. The first baseline on each page is measured
/// from the top of the document's default page size. Returns the page the
/// last line landed on.
///
/// Lines are never wrapped; each is clipped to `layout.max_width`.
pub fn layout_lines(
    document: &mut Document,
    first_page: PageRef,
    text: &str,
    layout: &TextLayout,
) -> Result<PageRef> {
    if !layout.line_height.is_finite() || layout.line_height <= 0.0 {
        return Err(FolioError::InvalidGeometry(format!(
            "line height {} must be positive",
            layout.line_height
        )));
    }

    let (_, page_height) = document.default_page_size();
    let top = layout.first_baseline(page_height);
    if top <= layout.bottom_margin {
        return Err(FolioError::InvalidGeometry(format!(
            "first baseline {top} is not above the bottom margin {}",
            layout.bottom_margin
        )));
    }

    let mut page = first_page;
    let mut cursor = top;
    let lines = split_lines(text);

    for line in &lines {
        if cursor <= layout.bottom_margin {
            page = document.add_default_page();
            cursor = top;
        }
        let style = TextStyle::new(layout.left_margin, cursor, layout.font_size)
            .with_max_width(layout.max_width);
        document.draw_text(page, line, style)?;
        cursor -= layout.line_height;
    }

    debug!(
        lines = lines.len(),
        pages = document.page_count(),
        "text layout complete"
    );
    Ok(page)
}
