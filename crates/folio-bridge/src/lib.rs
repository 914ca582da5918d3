// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Folio: platform capability abstractions.
//
// The converter never touches the filesystem, the share sheet, or the
// viewer directly. Everything platform-specific is reached through the
// traits in `traits`, injected by the host application. Mobile hosts supply
// their own `PlatformBridge`; desktop and CI builds get `DesktopBridge`.

pub mod codec;
pub mod traits;

#[cfg(not(any(target_os = "ios", target_os = "android")))]
pub mod desktop;

use std::path::PathBuf;

pub use codec::{Base64Codec, StandardBase64};
pub use traits::{DocumentStore, FilePicker, FileSource, PlatformBridge, ViewerLauncher};

/// Builds the bridge for the current desktop platform, storing converted
/// documents under `documents_root`.
#[cfg(not(any(target_os = "ios", target_os = "android")))]
pub fn platform_bridge(documents_root: PathBuf) -> Box<dyn PlatformBridge> {
    Box::new(desktop::DesktopBridge::new(documents_root))
}
