// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// folio-document: PDF synthesis for the Folio converter.
//
// Provides the in-memory document builder (pages, text and image draw
// operations, serialization through `lopdf`), raster decoding, and the
// synthesizer that turns a picked file into PDF bytes.

pub mod pdf;
pub mod raster;
pub mod synth;

// Re-export the primary types so callers can use `folio_document::Document` etc.
pub use pdf::document::{Document, DrawOperation, EmbeddedImage, PageCanvas, PageRef};
pub use pdf::serialize::FrozenDocument;
pub use synth::{SynthesizedPdf, Synthesizer};
