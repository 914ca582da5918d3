// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster decoding: turns PNG/JPEG bytes into Flate-compressed samples
// ready to be written as a PDF image XObject.

use std::io::Write;

use flate2::Compression;
use flate2::write::ZlibEncoder;
use folio_core::RasterFormat;
use folio_core::error::{FolioError, Result};
use image::{DynamicImage, ImageFormat};
use tracing::{debug, instrument};

/// A decoded image, stored as 8-bit DeviceRGB samples with an optional
/// DeviceGray soft mask, both zlib-compressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    rgb: Vec<u8>,
    alpha: Option<Vec<u8>>,
}

impl RasterImage {
    /// Decode `bytes` strictly as `format`. The bytes are not sniffed.
    #[instrument(skip(bytes, format), fields(bytes_len = bytes.len(), format = %format))]
    pub fn decode(bytes: &[u8], format: &RasterFormat) -> Result<Self> {
        let image_format = match format {
            RasterFormat::Png => ImageFormat::Png,
            RasterFormat::Jpeg => ImageFormat::Jpeg,
            RasterFormat::Unsupported(mime) => {
                return Err(FolioError::UnsupportedImageFormat(mime.clone()));
            }
        };

        if bytes.is_empty() {
            return Err(FolioError::CorruptImageData(format!("empty {format} payload")));
        }

        let decoded = image::load_from_memory_with_format(bytes, image_format).map_err(|err| {
            FolioError::CorruptImageData(format!("failed to decode {format}: {err}"))
        })?;

        let image = Self::from_dynamic(&decoded)?;
        debug!(
            width = image.width,
            height = image.height,
            has_alpha = image.alpha.is_some(),
            "image decoded"
        );
        Ok(image)
    }

    fn from_dynamic(decoded: &DynamicImage) -> Result<Self> {
        let rgb = decoded.to_rgb8();
        let alpha = if decoded.color().has_alpha() {
            let alpha: Vec<u8> = decoded.to_rgba8().pixels().map(|p| p.0[3]).collect();
            // Fully opaque images don't need a mask.
            if alpha.iter().all(|&a| a == u8::MAX) {
                None
            } else {
                Some(deflate(&alpha)?)
            }
        } else {
            None
        };

        Ok(Self {
            width: decoded.width(),
            height: decoded.height(),
            rgb: deflate(rgb.as_raw())?,
            alpha,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Zlib-compressed RGB samples, row-major, 3 bytes per pixel.
    pub fn rgb_deflated(&self) -> &[u8] {
        &self.rgb
    }

    /// Zlib-compressed alpha samples, if the image has transparency.
    pub fn alpha_deflated(&self) -> Option<&[u8]> {
        self.alpha.as_deref()
    }
}

fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len() / 2), Compression::default());
    encoder
        .write_all(data)
        .map_err(|err| FolioError::Serialization(format!("image compression failed: {err}")))?;
    encoder
        .finish()
        .map_err(|err| FolioError::Serialization(format!("image compression failed: {err}")))
}
