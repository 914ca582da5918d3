// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversion configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Persistent conversion settings.
///
/// The defaults reproduce the fixed layout of the converter: A4 pages, 12pt
/// text on 14pt lines from 92pt below the top edge (y = 750 on A4) down to
/// the 50pt bottom margin, a title 42pt below the top edge, and
/// images at half size anchored at (50, 400).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Page size for every page of the produced document.
    pub paper_size: crate::PaperSize,
    /// Title line placement on the first page.
    pub title: TitleStyle,
    /// Line-by-line layout for text payloads.
    pub text: TextLayout,
    /// Placement of image payloads.
    pub image: ImagePlacement,
    /// Where converted PDFs are written. `None` means the platform default.
    pub documents_dir: Option<PathBuf>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            paper_size: crate::PaperSize::A4,
            title: TitleStyle::default(),
            text: TextLayout::default(),
            image: ImagePlacement::default(),
            documents_dir: None,
        }
    }
}

/// Title line on the first page. Vertical placement is measured down from
/// the top edge so it stays on the page for every paper size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleStyle {
    pub x: f32,
    /// Distance from the top edge of the page to the title baseline.
    pub top_offset: f32,
    pub font_size: f32,
}

impl TitleStyle {
    /// Title baseline on a page `page_height` points tall.
    pub fn baseline(&self, page_height: f32) -> f32 {
        page_height - self.top_offset
    }
}

impl Default for TitleStyle {
    fn default() -> Self {
        Self {
            x: 50.0,
            top_offset: 42.0,
            font_size: 16.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextLayout {
    pub font_size: f32,
    pub line_height: f32,
    pub left_margin: f32,
    /// Distance from the top edge of the page to the first baseline.
    pub top_margin: f32,
    /// A line whose baseline would reach this height starts a new page.
    pub bottom_margin: f32,
    /// Lines are clipped to this width; they are never wrapped.
    pub max_width: f32,
}

impl TextLayout {
    /// Baseline of the first line on a page `page_height` points tall.
    pub fn first_baseline(&self, page_height: f32) -> f32 {
        page_height - self.top_margin
    }
}

impl Default for TextLayout {
    fn default() -> Self {
        Self {
            font_size: 12.0,
            line_height: 14.0,
            left_margin: 50.0,
            top_margin: 92.0,
            bottom_margin: 50.0,
            max_width: 500.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagePlacement {
    /// Factor applied to the intrinsic pixel dimensions (1 px = 1 pt).
    pub scale: f32,
    pub x: f32,
    pub y: f32,
}

impl Default for ImagePlacement {
    fn default() -> Self {
        Self {
            scale: 0.5,
            x: 50.0,
            y: 400.0,
        }
    }
}
