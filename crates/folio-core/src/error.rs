// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Folio.

use thiserror::Error;

/// Top-level error type for all Folio operations.
///
/// Every variant aborts the conversion in flight. Nothing is retried
/// automatically; the UI decides whether to offer the user another attempt.
#[derive(Debug, Error)]
pub enum FolioError {
    // -- Input --
    #[error("no file selected")]
    NoFileSelected,

    #[error("source file unreadable: {0}")]
    SourceUnreadable(String),

    // -- Synthesis --
    #[error("unsupported image format: {0}")]
    UnsupportedImageFormat(String),

    #[error("corrupt image data: {0}")]
    CorruptImageData(String),

    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("PDF serialization failed: {0}")]
    Serialization(String),

    // -- Output --
    #[error("could not persist PDF: {0}")]
    Persistence(String),

    #[error("no viewer available: {0}")]
    ViewerUnavailable(String),

    // -- Ambient --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FolioError>;
