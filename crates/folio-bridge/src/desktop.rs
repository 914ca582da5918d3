// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Desktop bridge: locators are plain filesystem paths, the picker is the
// native file dialog via `rfd`, and PDFs open with the OS default handler.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;

use folio_core::error::{FolioError, Result};
use folio_core::{FileProbe, SourceFile, mime_from_extension};
use tracing::{debug, info, warn};

use crate::codec::{Base64Codec, StandardBase64};
use crate::traits::*;

/// Extensions offered by the desktop picker when the requested MIME types
/// narrow the choice.
const PICKABLE_EXTENSIONS: &[&str] = &[
    "txt", "md", "csv", "log", "png", "jpg", "jpeg", "gif", "webp", "bmp", "tif", "tiff", "pdf",
    "zip", "json",
];

/// Filesystem-backed bridge for desktop and CI builds.
pub struct DesktopBridge {
    documents_root: PathBuf,
    codec: Arc<dyn Base64Codec>,
}

impl DesktopBridge {
    pub fn new(documents_root: impl Into<PathBuf>) -> Self {
        Self::with_codec(documents_root, Arc::new(StandardBase64))
    }

    pub fn with_codec(documents_root: impl Into<PathBuf>, codec: Arc<dyn Base64Codec>) -> Self {
        Self {
            documents_root: documents_root.into(),
            codec,
        }
    }

    /// Build a `SourceFile` for a path chosen outside the picker.
    pub fn source_for_path(path: &Path) -> SourceFile {
        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown".into());
        let declared_mime_type = path
            .extension()
            .and_then(|ext| mime_from_extension(&ext.to_string_lossy()))
            .map(str::to_string);
        SourceFile::new(path.display().to_string(), display_name, declared_mime_type)
    }

    fn read_raw(&self, locator: &str) -> Result<Vec<u8>> {
        std::fs::read(locator)
            .map_err(|err| FolioError::SourceUnreadable(format!("{locator}: {err}")))
    }
}

impl PlatformBridge for DesktopBridge {
    fn platform_name(&self) -> &str {
        "Desktop"
    }
}

impl FileSource for DesktopBridge {
    fn read_text(&self, locator: &str) -> Result<String> {
        let bytes = self.read_raw(locator)?;
        debug!(locator, bytes = bytes.len(), "read text source");
        // Invalid UTF-8 is replaced rather than rejected.
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn read_bytes_base64(&self, locator: &str) -> Result<String> {
        let bytes = self.read_raw(locator)?;
        debug!(locator, bytes = bytes.len(), "read binary source");
        Ok(self.codec.encode(&bytes))
    }

    fn probe_exists(&self, locator: &str) -> Result<FileProbe> {
        match std::fs::metadata(locator) {
            Ok(meta) => Ok(FileProbe::found(meta.len())),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(FileProbe::missing()),
            Err(err) => Err(FolioError::SourceUnreadable(format!("{locator}: {err}"))),
        }
    }
}

impl FilePicker for DesktopBridge {
    fn pick_file(&self, mime_types: &[&str]) -> Result<Option<SourceFile>> {
        let mut dialog = rfd::FileDialog::new();
        if let Some(extensions) = picker_extensions(mime_types) {
            dialog = dialog.add_filter("Supported files", &extensions);
        }

        match dialog.pick_file() {
            Some(path) => {
                let source = Self::source_for_path(&path);
                info!(name = %source.display_name, mime = ?source.declared_mime_type, "file picked");
                Ok(Some(source))
            }
            None => Ok(None),
        }
    }
}

/// The extension filter for the native dialog, or `None` to allow any file.
///
/// An empty request or a `*/*` entry leaves the dialog unfiltered, so files
/// with no known extension can still reach the fallback page.
fn picker_extensions(mime_types: &[&str]) -> Option<Vec<&'static str>> {
    if mime_types.is_empty() || mime_types.contains(&"*/*") {
        return None;
    }
    let extensions: Vec<&'static str> = PICKABLE_EXTENSIONS
        .iter()
        .copied()
        .filter(|ext| {
            mime_from_extension(ext)
                .is_some_and(|mime| mime_types.iter().any(|f| mime_matches(f, mime)))
        })
        .collect();
    // Nothing known matches: let the dialog show everything.
    (!extensions.is_empty()).then_some(extensions)
}

impl DocumentStore for DesktopBridge {
    fn documents_root(&self) -> PathBuf {
        self.documents_root.clone()
    }

    fn write_bytes_base64(&self, destination: &Path, base64: &str) -> Result<()> {
        let bytes = self
            .codec
            .decode(base64)
            .map_err(|err| FolioError::Persistence(err.to_string()))?;

        if let Some(parent) = destination.parent() {
            std::fs::create_dir_all(parent).map_err(|err| {
                FolioError::Persistence(format!("{}: {err}", parent.display()))
            })?;
        }

        // Write beside the target, then rename, so a failed write never
        // leaves a truncated PDF in place.
        let partial = destination.with_extension("part");
        if let Err(err) = std::fs::write(&partial, &bytes) {
            let _ = std::fs::remove_file(&partial);
            return Err(FolioError::Persistence(format!("{}: {err}", partial.display())));
        }
        std::fs::rename(&partial, destination).map_err(|err| {
            let _ = std::fs::remove_file(&partial);
            FolioError::Persistence(format!("{}: {err}", destination.display()))
        })?;

        info!(path = %destination.display(), bytes = bytes.len(), "document written");
        Ok(())
    }
}

impl ViewerLauncher for DesktopBridge {
    fn open_with_default(&self, path: &Path) -> Result<()> {
        if !path.is_file() {
            return Err(FolioError::ViewerUnavailable(format!(
                "{} does not exist",
                path.display()
            )));
        }

        run_opener(opener_command(path), path)?;
        info!(path = %path.display(), "opened with default viewer");
        Ok(())
    }
}

/// Run the platform opener to completion. A launch failure or a non-zero
/// exit (no handler registered) is `ViewerUnavailable`.
fn run_opener(mut command: Command, path: &Path) -> Result<()> {
    let status = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|err| {
            warn!(error = %err, "no default viewer could be launched");
            FolioError::ViewerUnavailable(err.to_string())
        })?;

    if status.success() {
        Ok(())
    } else {
        warn!(%status, path = %path.display(), "default viewer refused the file");
        Err(FolioError::ViewerUnavailable(format!(
            "no application is registered to open {} ({status})",
            path.display()
        )))
    }
}

#[cfg(target_os = "macos")]
fn opener_command(path: &Path) -> Command {
    let mut command = Command::new("open");
    command.arg(path);
    command
}

#[cfg(target_os = "windows")]
fn opener_command(path: &Path) -> Command {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", ""]).arg(path);
    command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn opener_command(path: &Path) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(path);
    command
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bridge(dir: &Path) -> DesktopBridge {
        DesktopBridge::new(dir.join("docs"))
    }

    #[test]
    fn reads_text_and_replaces_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"caf\xe9\nline two").unwrap();

        let text = bridge(dir.path()).read_text(path.to_str().unwrap()).unwrap();
        assert!(text.starts_with("caf"));
        assert!(text.ends_with("line two"));
    }

    #[test]
    fn reads_bytes_as_base64() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.bin");
        std::fs::write(&path, b"folio").unwrap();

        let encoded = bridge(dir.path())
            .read_bytes_base64(path.to_str().unwrap())
            .unwrap();
        assert_eq!(encoded, "Zm9saW8=");
    }

    #[test]
    fn missing_source_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.txt");
        let err = bridge(dir.path())
            .read_text(missing.to_str().unwrap())
            .unwrap_err();
        assert!(matches!(err, FolioError::SourceUnreadable(_)));
    }

    #[test]
    fn probe_reports_size_or_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("archive.zip");
        std::fs::write(&path, vec![0u8; 2048]).unwrap();
        let b = bridge(dir.path());

        assert_eq!(b.probe_exists(path.to_str().unwrap()).unwrap(), FileProbe::found(2048));
        let missing = dir.path().join("gone.zip");
        assert_eq!(
            b.probe_exists(missing.to_str().unwrap()).unwrap(),
            FileProbe::missing()
        );
    }

    #[test]
    fn write_creates_root_and_leaves_no_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let b = bridge(dir.path());
        let dest = b.documents_root().join("notes.pdf");

        b.write_bytes_base64(&dest, "JVBERi0xLjU=").unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), b"%PDF-1.5");
        assert!(!dest.with_extension("part").exists());
    }

    #[test]
    fn write_rejects_bad_payload_as_persistence_failure() {
        let dir = tempfile::tempdir().unwrap();
        let b = bridge(dir.path());
        let dest = b.documents_root().join("bad.pdf");

        let err = b.write_bytes_base64(&dest, "@@@").unwrap_err();
        assert!(matches!(err, FolioError::Persistence(_)));
        assert!(!dest.exists());
    }

    #[test]
    fn opening_missing_file_is_viewer_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = bridge(dir.path())
            .open_with_default(&dir.path().join("missing.pdf"))
            .unwrap_err();
        assert!(matches!(err, FolioError::ViewerUnavailable(_)));
    }

    #[cfg(unix)]
    #[test]
    fn opener_exit_status_decides_the_outcome() {
        let path = Path::new("/tmp/out.pdf");
        assert!(run_opener(Command::new("true"), path).is_ok());

        let err = run_opener(Command::new("false"), path).unwrap_err();
        assert!(matches!(err, FolioError::ViewerUnavailable(_)));

        let err = run_opener(Command::new("/nonexistent/folio-opener"), path).unwrap_err();
        assert!(matches!(err, FolioError::ViewerUnavailable(_)));
    }

    #[test]
    fn wildcard_picker_is_unfiltered() {
        assert_eq!(picker_extensions(&["*/*"]), None);
        assert_eq!(picker_extensions(&["image/*", "*/*"]), None);
        assert_eq!(picker_extensions(&[]), None);
    }

    #[test]
    fn picker_filter_follows_mime_families() {
        assert_eq!(
            picker_extensions(&["text/*"]),
            Some(vec!["txt", "md", "csv", "log"])
        );
        assert_eq!(
            picker_extensions(&["image/*"]),
            Some(vec!["png", "jpg", "jpeg", "gif", "webp", "bmp", "tif", "tiff"])
        );
        assert_eq!(picker_extensions(&["application/pdf"]), Some(vec!["pdf"]));
        assert_eq!(picker_extensions(&["video/mp4"]), None);
    }

    #[test]
    fn source_for_path_infers_mime() {
        let source = DesktopBridge::source_for_path(Path::new("/home/me/Photo.JPG"));
        assert_eq!(source.display_name, "Photo.JPG");
        assert_eq!(source.declared_mime_type.as_deref(), Some("image/jpeg"));

        let source = DesktopBridge::source_for_path(Path::new("/home/me/data.xyz"));
        assert_eq!(source.declared_mime_type, None);
    }
}
