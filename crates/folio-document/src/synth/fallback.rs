// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Fallback for payloads that are neither text nor image: a short block
// describing the original file.

use chrono::{DateTime, Utc};
use folio_bridge::FileSource;
use folio_core::error::Result;
use folio_core::{FileProbe, SourceFile};
use tracing::{debug, instrument};

use crate::pdf::document::{Document, PageRef, TextStyle};

pub const HEADER: &str = "File Conversion Details";

const LEFT: f32 = 50.0;
/// Baselines are measured down from the top edge (y = 700 and 650 on A4).
const HEADER_FROM_TOP: f32 = 142.0;
const HEADER_SIZE: f32 = 18.0;
const BLOCK_FROM_TOP: f32 = 192.0;
const BLOCK_SIZE: f32 = 12.0;

/// Probe `file` and draw the details block on `page`.
#[instrument(skip_all, fields(name = %file.display_name))]
pub fn render(
    document: &mut Document,
    page: PageRef,
    source: &dyn FileSource,
    file: &SourceFile,
    now: DateTime<Utc>,
) -> Result<()> {
    let probe = source.probe_exists(&file.locator)?;
    debug!(exists = probe.exists, size = ?probe.size_bytes, "source probed");

    let (_, height) = document.default_page_size();
    document.draw_text(
        page,
        HEADER,
        TextStyle::new(LEFT, height - HEADER_FROM_TOP, HEADER_SIZE),
    )?;
    document.draw_text(
        page,
        &details_block(file, probe, now),
        TextStyle::new(LEFT, height - BLOCK_FROM_TOP, BLOCK_SIZE),
    )
}

/// The multi-line description: name, type, size in KB, conversion time.
pub fn details_block(file: &SourceFile, probe: FileProbe, now: DateTime<Utc>) -> String {
    let size = probe
        .size_kb()
        .map(|kb| format!("{kb:.2} KB"))
        .unwrap_or_else(|| "unknown".into());
    format!(
        "Original file: {}\nType: {}\nSize: {}\nConverted: {}",
        file.display_name,
        file.mime_type().unwrap_or("unknown"),
        size,
        now.format("%Y-%m-%d %H:%M:%S UTC"),
    )
}
