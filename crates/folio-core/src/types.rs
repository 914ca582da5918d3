// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Folio converter.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// A file chosen by the user, as handed over by the platform picker.
///
/// Immutable once selected. The locator is opaque to the converter: only the
/// `FileSource` that produced it knows how to resolve it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Platform handle (filesystem path, `content://` URI, security-scoped URL, ...).
    pub locator: String,
    /// Name shown to the user, usually the original file name.
    pub display_name: String,
    /// MIME type reported by the picker. Trusted without content verification.
    pub declared_mime_type: Option<String>,
}

impl SourceFile {
    pub fn new(
        locator: impl Into<String>,
        display_name: impl Into<String>,
        declared_mime_type: Option<String>,
    ) -> Self {
        Self {
            locator: locator.into(),
            display_name: display_name.into(),
            declared_mime_type,
        }
    }

    /// Declared MIME type, or `None` when the picker did not report one.
    pub fn mime_type(&self) -> Option<&str> {
        self.declared_mime_type.as_deref()
    }

    /// The payload kind this file will be converted as.
    pub fn payload_kind(&self) -> PayloadKind {
        PayloadKind::from_declared(self.mime_type())
    }

    /// File name of the produced PDF: the display name without its last
    /// extension, plus `.pdf`.
    ///
    /// Directory components in the display name are discarded so the output
    /// always lands directly inside the documents root.
    pub fn pdf_file_name(&self) -> String {
        let stem = Path::new(&self.display_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "document".into());
        format!("{stem}.pdf")
    }
}

/// Which synthesis strategy handles a payload.
///
/// Resolved once from the declared MIME type (case-sensitive prefix match,
/// first match wins).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadKind {
    /// `text/*`: laid out line by line.
    Text,
    /// `image/*`: embedded once, in the format implied by the declared type.
    Image(RasterFormat),
    /// Anything else, including a missing type.
    Fallback,
}

impl PayloadKind {
    pub fn from_declared(mime_type: Option<&str>) -> Self {
        match mime_type {
            Some(mime) if mime.starts_with("text/") => Self::Text,
            Some(mime) if mime.starts_with("image/") => Self::Image(RasterFormat::from_mime(mime)),
            _ => Self::Fallback,
        }
    }
}

/// Raster encoding of an image payload, taken from its declared MIME type.
///
/// There is no content sniffing: a JPEG declared as `image/png` is decoded
/// as PNG and fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RasterFormat {
    Png,
    Jpeg,
    /// A raster subtype we know is neither PNG nor JPEG (carries the MIME type).
    Unsupported(String),
}

/// Image subtypes that are definitely not JPEG. Everything else under
/// `image/` that is not `image/png` is treated as JPEG.
const NON_JPEG_SUBTYPES: &[&str] = &[
    "gif", "webp", "bmp", "x-bmp", "tiff", "heic", "heif", "avif", "svg+xml", "x-icon",
    "vnd.microsoft.icon",
];

impl RasterFormat {
    pub fn from_mime(mime_type: &str) -> Self {
        let subtype = mime_type.strip_prefix("image/").unwrap_or(mime_type);
        if subtype == "png" {
            Self::Png
        } else if NON_JPEG_SUBTYPES.contains(&subtype) {
            Self::Unsupported(mime_type.to_string())
        } else {
            Self::Jpeg
        }
    }
}

impl std::fmt::Display for RasterFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Png => write!(f, "PNG"),
            Self::Jpeg => write!(f, "JPEG"),
            Self::Unsupported(mime) => write!(f, "{mime}"),
        }
    }
}

/// Result of asking a file source whether a locator still resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FileProbe {
    pub exists: bool,
    /// Size in bytes, if the source can report it.
    pub size_bytes: Option<u64>,
}

impl FileProbe {
    pub fn missing() -> Self {
        Self::default()
    }

    pub fn found(size_bytes: u64) -> Self {
        Self {
            exists: true,
            size_bytes: Some(size_bytes),
        }
    }

    /// Size in kilobytes (1 KB = 1024 bytes), only when the file exists and
    /// reported a size.
    pub fn size_kb(&self) -> Option<f64> {
        if !self.exists {
            return None;
        }
        self.size_bytes.map(|bytes| bytes as f64 / 1024.0)
    }
}

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A5,
    Letter,
    Legal,
    Custom { width_pt: f32, height_pt: f32 },
}

impl PaperSize {
    /// Dimensions in PDF points (width, height), portrait.
    pub fn dimensions_pt(&self) -> (f32, f32) {
        match self {
            Self::A4 => (595.0, 842.0),
            Self::A5 => (420.0, 595.0),
            Self::Letter => (612.0, 792.0),
            Self::Legal => (612.0, 1008.0),
            Self::Custom {
                width_pt,
                height_pt,
            } => (*width_pt, *height_pt),
        }
    }
}

/// Infer a MIME type from a file extension, for pickers that only return paths.
pub fn mime_from_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "txt" | "text" | "log" => Some("text/plain"),
        "md" | "markdown" => Some("text/markdown"),
        "csv" => Some("text/csv"),
        "html" | "htm" => Some("text/html"),
        "png" => Some("image/png"),
        "jpg" | "jpeg" | "jpe" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "tif" | "tiff" => Some("image/tiff"),
        "heic" => Some("image/heic"),
        "pdf" => Some("application/pdf"),
        "zip" => Some("application/zip"),
        "json" => Some("application/json"),
        "docx" => Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
        _ => None,
    }
}
