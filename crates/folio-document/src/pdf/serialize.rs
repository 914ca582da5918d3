// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF serialization: writes a frozen document out through `lopdf`.
//
// Object layout is fixed: page tree, one shared Helvetica font, image
// XObjects in embedding order, then per page a content stream and the page
// dictionary, then catalog and info, followed by a classic xref table and
// trailer. Given the same document the output is byte-identical except for
// /CreationDate.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use lopdf::content::{Content, Operation};
use lopdf::xref::XrefType;
use lopdf::{Dictionary, Object, ObjectId, Stream, StringFormat};
use tracing::{debug, info, instrument};

use folio_core::error::{FolioError, Result};

use crate::pdf::document::{DrawOperation, LINE_SPACING, PageCanvas, Rgb};
use crate::pdf::encoding::encode_win_ansi;
use crate::raster::RasterImage;

const PDF_VERSION: &str = "1.7";
const PRODUCER: &str = "Folio";
const FONT_RESOURCE: &str = "F1";

/// Ascent and descent of Helvetica as a fraction of the font size, used for
/// the clip rectangle of width-limited text.
const ASCENT: f32 = 0.75;
const DESCENT: f32 = 0.25;

/// A finished document. Pages and images can no longer change.
#[derive(Debug)]
pub struct FrozenDocument {
    title: Option<String>,
    pages: Vec<PageCanvas>,
    images: Vec<RasterImage>,
}

impl FrozenDocument {
    pub(crate) fn new(title: Option<String>, pages: Vec<PageCanvas>, images: Vec<RasterImage>) -> Self {
        Self {
            title,
            pages,
            images,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn pages(&self) -> &[PageCanvas] {
        &self.pages
    }

    /// Serialize, stamping the current time as the creation date.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        self.serialize_at(Utc::now())
    }

    /// Serialize with an explicit creation date.
    #[instrument(skip(self), fields(pages = self.pages.len(), images = self.images.len()))]
    pub fn serialize_at(&self, created: DateTime<Utc>) -> Result<Vec<u8>> {
        let mut pdf = lopdf::Document::with_version(PDF_VERSION);
        pdf.reference_table.cross_reference_type = XrefType::CrossReferenceTable;
        let pages_id = pdf.new_object_id();

        let font_id = pdf.add_object(Dictionary::from_iter([
            ("Type", name("Font")),
            ("Subtype", name("Type1")),
            ("BaseFont", name("Helvetica")),
            ("Encoding", name("WinAnsiEncoding")),
        ]));

        let image_ids: Vec<ObjectId> = self
            .images
            .iter()
            .map(|image| add_image(&mut pdf, image))
            .collect();

        let mut kids = Vec::with_capacity(self.pages.len());
        for (index, page) in self.pages.iter().enumerate() {
            let content = Content {
                operations: page_operations(page),
            };
            let encoded = content.encode().map_err(|err| {
                FolioError::Serialization(format!("page {} content: {err}", index + 1))
            })?;
            let content_id = pdf.add_object(Stream::new(Dictionary::new(), encoded));

            let mut resources = Dictionary::from_iter([(
                "Font",
                Object::Dictionary(Dictionary::from_iter([(
                    FONT_RESOURCE,
                    Object::Reference(font_id),
                )])),
            )]);
            let used: BTreeSet<usize> = page
                .operations()
                .iter()
                .filter_map(|op| match op {
                    DrawOperation::Image { image, .. } => Some(*image),
                    DrawOperation::Text { .. } => None,
                })
                .collect();
            if !used.is_empty() {
                let mut xobjects = Dictionary::new();
                for image in used {
                    let id = image_ids.get(image).copied().ok_or_else(|| {
                        FolioError::Serialization(format!("page {} uses unknown image {image}", index + 1))
                    })?;
                    xobjects.set(image_resource(image), Object::Reference(id));
                }
                resources.set("XObject", Object::Dictionary(xobjects));
            }

            let page_id = pdf.add_object(Dictionary::from_iter([
                ("Type", name("Page")),
                ("Parent", Object::Reference(pages_id)),
                (
                    "MediaBox",
                    Object::Array(vec![
                        0.into(),
                        0.into(),
                        page.width().into(),
                        page.height().into(),
                    ]),
                ),
                ("Contents", Object::Reference(content_id)),
                ("Resources", Object::Dictionary(resources)),
            ]));
            kids.push(Object::Reference(page_id));
        }

        let page_count = kids.len() as i64;
        pdf.objects.insert(
            pages_id,
            Object::Dictionary(Dictionary::from_iter([
                ("Type", name("Pages")),
                ("Kids", Object::Array(kids)),
                ("Count", Object::Integer(page_count)),
            ])),
        );

        let catalog_id = pdf.add_object(Dictionary::from_iter([
            ("Type", name("Catalog")),
            ("Pages", Object::Reference(pages_id)),
        ]));

        let mut info_dict = Dictionary::from_iter([
            ("Producer", Object::string_literal(PRODUCER)),
            (
                "CreationDate",
                Object::string_literal(created.format("D:%Y%m%d%H%M%S+00'00'").to_string()),
            ),
        ]);
        if let Some(title) = &self.title {
            info_dict.set("Title", lopdf::text_string(title));
        }
        let info_id = pdf.add_object(info_dict);

        pdf.trailer.set("Root", Object::Reference(catalog_id));
        pdf.trailer.set("Info", Object::Reference(info_id));

        let mut output = Vec::new();
        pdf.save_to(&mut output)
            .map_err(|err| FolioError::Serialization(format!("failed to write PDF: {err}")))?;

        info!(pages = page_count, bytes = output.len(), "PDF serialized");
        Ok(output)
    }
}

fn name(value: &str) -> Object {
    Object::Name(value.as_bytes().to_vec())
}

fn image_resource(index: usize) -> String {
    format!("Im{index}")
}

fn add_image(pdf: &mut lopdf::Document, image: &RasterImage) -> ObjectId {
    let sample_dict = |color_space: &str| {
        Dictionary::from_iter([
            ("Type", name("XObject")),
            ("Subtype", name("Image")),
            ("Width", Object::Integer(i64::from(image.width()))),
            ("Height", Object::Integer(i64::from(image.height()))),
            ("ColorSpace", name(color_space)),
            ("BitsPerComponent", Object::Integer(8)),
            ("Filter", name("FlateDecode")),
        ])
    };

    let mut dict = sample_dict("DeviceRGB");
    if let Some(alpha) = image.alpha_deflated() {
        let mask_id = pdf.add_object(Stream::new(sample_dict("DeviceGray"), alpha.to_vec()));
        dict.set("SMask", Object::Reference(mask_id));
    }
    let id = pdf.add_object(Stream::new(dict, image.rgb_deflated().to_vec()));
    debug!(width = image.width(), height = image.height(), ?id, "image XObject written");
    id
}

/// Translate one page's draw operations into content stream operators.
fn page_operations(page: &PageCanvas) -> Vec<Operation> {
    let mut ops = Vec::new();
    for op in page.operations() {
        match op {
            DrawOperation::Text {
                content,
                x,
                y,
                font_size,
                max_width,
                color,
            } => text_operations(&mut ops, content, *x, *y, *font_size, *max_width, *color),
            DrawOperation::Image {
                image,
                x,
                y,
                width,
                height,
            } => {
                ops.push(Operation::new("q", vec![]));
                ops.push(Operation::new(
                    "cm",
                    vec![
                        (*width).into(),
                        0.into(),
                        0.into(),
                        (*height).into(),
                        (*x).into(),
                        (*y).into(),
                    ],
                ));
                ops.push(Operation::new("Do", vec![name(&image_resource(*image))]));
                ops.push(Operation::new("Q", vec![]));
            }
        }
    }
    ops
}

fn text_operations(
    ops: &mut Vec<Operation>,
    content: &str,
    x: f32,
    y: f32,
    size: f32,
    max_width: Option<f32>,
    color: Rgb,
) {
    let lines: Vec<&str> = content.split('\n').collect();
    let line_height = size * LINE_SPACING;

    ops.push(Operation::new("q", vec![]));

    // Long lines are clipped at the max width, never wrapped.
    if let Some(width) = max_width {
        let last_baseline = y - line_height * (lines.len() - 1) as f32;
        let bottom = last_baseline - size * DESCENT;
        let top = y + size * ASCENT;
        ops.push(Operation::new(
            "re",
            vec![x.into(), bottom.into(), width.into(), (top - bottom).into()],
        ));
        ops.push(Operation::new("W", vec![]));
        ops.push(Operation::new("n", vec![]));
    }

    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new("Tf", vec![name(FONT_RESOURCE), size.into()]));
    ops.push(Operation::new(
        "rg",
        vec![color.r.into(), color.g.into(), color.b.into()],
    ));
    for (i, line) in lines.iter().enumerate() {
        let encoded = encode_win_ansi(line);
        if encoded.is_empty() {
            continue;
        }
        let baseline = y - line_height * i as f32;
        ops.push(Operation::new(
            "Tm",
            vec![1.into(), 0.into(), 0.into(), 1.into(), x.into(), baseline.into()],
        ));
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(encoded, StringFormat::Literal)],
        ));
    }
    ops.push(Operation::new("ET", vec![]));
    ops.push(Operation::new("Q", vec![]));
}
