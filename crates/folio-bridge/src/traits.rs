// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for the capabilities the converter
// needs from its host.

use std::path::{Path, PathBuf};

use folio_core::error::Result;
use folio_core::{FileProbe, SourceFile};

/// Unified bridge that groups every capability a host must provide.
///
/// `Send + Sync` so the async service can hand it to a blocking worker.
pub trait PlatformBridge: FileSource + FilePicker + DocumentStore + ViewerLauncher + Send + Sync {
    /// Human-readable platform name (e.g. "iOS 17", "Desktop").
    fn platform_name(&self) -> &str;
}

/// Reads the payload behind a picked file's locator.
pub trait FileSource: Send + Sync {
    /// Read the whole file as text.
    fn read_text(&self, locator: &str) -> Result<String>;

    /// Read the whole file, returned base64-encoded.
    fn read_bytes_base64(&self, locator: &str) -> Result<String>;

    /// Check whether the locator still resolves and how large the file is.
    ///
    /// A missing file is `Ok(FileProbe::missing())`; only a failure of the
    /// probe itself is an error.
    fn probe_exists(&self, locator: &str) -> Result<FileProbe>;
}

/// Lets the user choose a file.
pub trait FilePicker: Send + Sync {
    /// Show a picker filtered to the given MIME types (`text/*` style
    /// wildcards allowed). Returns `None` if the user cancelled.
    fn pick_file(&self, mime_types: &[&str]) -> Result<Option<SourceFile>>;
}

/// Persists produced documents.
pub trait DocumentStore: Send + Sync {
    /// Directory converted PDFs are written to.
    fn documents_root(&self) -> PathBuf;

    /// Write base64-encoded bytes to `destination`, replacing any existing file.
    ///
    /// Either the whole file is written or nothing is left behind.
    fn write_bytes_base64(&self, destination: &Path, base64: &str) -> Result<()>;
}

/// Opens a persisted file with the system's default handler.
pub trait ViewerLauncher: Send + Sync {
    fn open_with_default(&self, path: &Path) -> Result<()>;
}

/// Whether `mime` satisfies a picker filter such as `image/*` or `text/plain`.
pub fn mime_matches(filter: &str, mime: &str) -> bool {
    match filter.strip_suffix("/*") {
        Some("*") => true,
        Some(major) => mime
            .split_once('/')
            .is_some_and(|(mime_major, _)| mime_major == major),
        None => filter == mime,
    }
}
