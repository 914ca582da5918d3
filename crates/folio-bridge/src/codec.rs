// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Base64 transport codec. Platform file APIs hand binary payloads across as
// base64 strings; this is the single codec used for both directions.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use folio_core::error::{FolioError, Result};

pub trait Base64Codec: Send + Sync {
    fn encode(&self, bytes: &[u8]) -> String;

    /// Decode a base64 payload. Surrounding whitespace and line breaks (as
    /// produced by MIME-style encoders) are ignored.
    fn decode(&self, text: &str) -> Result<Vec<u8>>;
}

/// RFC 4648 standard alphabet with padding.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardBase64;

impl Base64Codec for StandardBase64 {
    fn encode(&self, bytes: &[u8]) -> String {
        STANDARD.encode(bytes)
    }

    fn decode(&self, text: &str) -> Result<Vec<u8>> {
        let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        STANDARD
            .decode(compact.as_bytes())
            .map_err(|err| FolioError::SourceUnreadable(format!("invalid base64 payload: {err}")))
    }
}
