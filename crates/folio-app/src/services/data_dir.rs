// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware data directory resolution.

use std::path::{Path, PathBuf};

use folio_core::ConversionConfig;
use tracing::warn;

const APP_DIR: &str = "folio";
const DOCUMENTS_SUBDIR: &str = "documents";

/// Return the application data directory, creating it if needed.
///
/// On mobile the platform bridge supplies its own documents root and this
/// is only used for `config.json`.
pub fn data_dir() -> PathBuf {
    let dir = base_dir().join(APP_DIR);
    ensure_dir(&dir);
    dir
}

/// Where converted PDFs go: the configured directory if set, otherwise
/// `documents/` inside the data directory.
pub fn documents_dir(data_dir: &Path, config: &ConversionConfig) -> PathBuf {
    let dir = config
        .documents_dir
        .clone()
        .unwrap_or_else(|| data_dir.join(DOCUMENTS_SUBDIR));
    ensure_dir(&dir);
    dir
}

fn ensure_dir(dir: &Path) {
    // Creation failures surface later as Persistence errors on write.
    if let Err(err) = std::fs::create_dir_all(dir) {
        warn!(path = %dir.display(), error = %err, "could not create directory");
    }
}

fn base_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg);
    }
    if let Some(home) = std::env::var_os("HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(home).join(".local").join("share");
    }
    std::env::temp_dir()
}
