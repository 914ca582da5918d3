// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the conversion screen.
//
// Every technical error is mapped to one plain English message with a clear
// suggestion. Nothing is retried automatically; `retriable` only tells the UI
// whether offering "Try again" makes sense.

use crate::error::FolioError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Storage or viewer hiccup; trying again may work.
    Transient,
    /// User must do something (pick a file, install a viewer).
    ActionRequired,
    /// This file cannot be converted as it is.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether the UI should offer to try again.
    pub retriable: bool,
    /// Severity level (drives icon/colour in UI).
    pub severity: Severity,
}

/// Convert a `FolioError` into a `HumanError` suitable for an alert.
pub fn humanize_error(err: &FolioError) -> HumanError {
    match err {
        FolioError::NoFileSelected => HumanError {
            message: "No file selected.".into(),
            suggestion: "Choose a text file or a picture, then tap Convert.".into(),
            retriable: true,
            severity: Severity::ActionRequired,
        },

        FolioError::SourceUnreadable(_) => HumanError {
            message: "We couldn't read that file.".into(),
            suggestion: "It may have been moved, deleted, or still be downloading. Try choosing it again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        FolioError::UnsupportedImageFormat(detail) => HumanError {
            message: "This kind of picture isn't supported.".into(),
            suggestion: format!("Save the picture as a JPEG or PNG first, then convert that copy. (Picture type: {detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        FolioError::CorruptImageData(_) => HumanError {
            message: "There's a problem with this picture.".into(),
            suggestion: "The picture may be damaged, or its type doesn't match its contents. Try opening it in your photo app and saving a new copy.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        FolioError::InvalidGeometry(_) | FolioError::Serialization(_) => HumanError {
            message: "The PDF couldn't be created.".into(),
            suggestion: "Something went wrong while building the document. Try a different file.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        FolioError::Persistence(_) => HumanError {
            message: "The PDF couldn't be saved.".into(),
            suggestion: "Your device may be low on storage. Free up some space and try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        FolioError::ViewerUnavailable(_) => HumanError {
            message: "We couldn't open the PDF.".into(),
            suggestion: "Install an app that can show PDF files, then tap Open again. Your PDF is already saved.".into(),
            retriable: true,
            severity: Severity::ActionRequired,
        },

        FolioError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Try choosing the file again.".into(),
                    retriable: true,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or saving a file.".into(),
                    suggestion: "Try again. If this keeps happening, restart the app.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        FolioError::Config(_) => HumanError {
            message: "The app's settings couldn't be loaded.".into(),
            suggestion: "Default settings are being used instead.".into(),
            retriable: false,
            severity: Severity::Transient,
        },
    }
}
