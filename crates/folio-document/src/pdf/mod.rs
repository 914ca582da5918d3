// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module: building documents in memory and serializing them.

pub mod document;
pub mod encoding;
pub mod serialize;

pub use document::{Document, DrawOperation, EmbeddedImage, ImageRect, PageRef, Rgb, TextStyle};
pub use serialize::FrozenDocument;
