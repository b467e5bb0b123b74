//! # PDF Serializer
//!
//! Takes the laid-out pages and writes a PDF 1.7 file from scratch. The
//! subset needed here is small: the Helvetica family from the standard 14
//! fonts (never embedded), lines, rectangles, text, and image XObjects.
//!
//! ## PDF Structure (simplified)
//!
//! ```text
//! %PDF-1.7            <- header
//! 1 0 obj ... endobj  <- objects (fonts, pages, content streams, etc.)
//! 2 0 obj ... endobj
//! ...
//! xref                <- cross-reference table (byte offsets of each object)
//! trailer             <- points to the root object
//! %%EOF
//! ```
//!
//! Output is a pure function of the pages and metadata: no timestamps, no
//! random file IDs, fonts in a fixed order. The same document serializes to
//! the same bytes every time.

use std::collections::BTreeSet;
use std::fmt::Write as FmtWrite; // for write! on String
use std::io::Write as IoWrite; // for write! on Vec<u8>
use std::sync::Arc;

use miniz_oxide::deflate::compress_to_vec_zlib;

use crate::font::StandardFont;
use crate::image_loader::{ImagePixelData, JpegColorSpace, LoadedImage};
use crate::layout::{DrawCommand, LayoutPage};
use crate::model::Metadata;
use crate::style::Color;

const PRODUCER: &str = concat!("motordocs ", env!("CARGO_PKG_VERSION"));

pub struct PdfWriter;

/// Tracks allocated PDF objects during writing.
struct PdfBuilder {
    objects: Vec<PdfObject>,
    /// Font -> object id. Resource name is `/F{index}`.
    font_objects: Vec<(StandardFont, usize)>,
    /// Distinct images -> XObject id. Resource name is `/Im{index}`.
    image_objects: Vec<(Arc<LoadedImage>, usize)>,
}

struct PdfObject {
    data: Vec<u8>,
}

impl PdfBuilder {
    fn font_index(&self, font: StandardFont) -> usize {
        self.font_objects
            .iter()
            .position(|(f, _)| *f == font)
            .unwrap_or(0)
    }

    fn image_index(&self, image: &Arc<LoadedImage>) -> Option<usize> {
        self.image_objects
            .iter()
            .position(|(img, _)| Arc::ptr_eq(img, image))
    }

    fn push(&mut self, data: Vec<u8>) -> usize {
        let id = self.objects.len();
        self.objects.push(PdfObject { data });
        id
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write laid-out pages to a PDF byte vector.
    pub fn write(&self, pages: &[LayoutPage], metadata: &Metadata) -> Vec<u8> {
        let mut builder = PdfBuilder {
            objects: Vec::new(),
            font_objects: Vec::new(),
            image_objects: Vec::new(),
        };

        // Reserve object IDs:
        // 0 = placeholder (PDF objects are 1-indexed)
        // 1 = Catalog
        // 2 = Pages (page tree root)
        // 3+ = fonts, images, then page objects and content streams
        builder.push(vec![]);
        builder.push(vec![]);
        builder.push(vec![]);

        self.register_fonts(&mut builder, pages);
        self.register_images(&mut builder, pages);

        let mut page_obj_ids: Vec<usize> = Vec::new();
        for page in pages {
            let content = self.build_content_stream(page, &builder);
            let compressed = compress_to_vec_zlib(content.as_bytes(), 6);

            let mut content_data: Vec<u8> = Vec::new();
            let _ = write!(
                content_data,
                "<< /Length {} /Filter /FlateDecode >>\nstream\n",
                compressed.len()
            );
            content_data.extend_from_slice(&compressed);
            content_data.extend_from_slice(b"\nendstream");
            let content_obj_id = builder.push(content_data);

            let mut resources = format!("/Font << {} >>", self.build_font_resource_dict(&builder));
            let xobjects = self.build_xobject_resource_dict(page, &builder);
            if !xobjects.is_empty() {
                let _ = write!(resources, " /XObject << {} >>", xobjects);
            }
            let page_dict = format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Contents {} 0 R /Resources << {} >> >>",
                page.width, page.height, content_obj_id, resources
            );
            page_obj_ids.push(builder.push(page_dict.into_bytes()));
        }

        builder.objects[1].data = b"<< /Type /Catalog /Pages 2 0 R >>".to_vec();

        let kids: String = page_obj_ids
            .iter()
            .map(|id| format!("{} 0 R", id))
            .collect::<Vec<_>>()
            .join(" ");
        builder.objects[2].data = format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids,
            page_obj_ids.len()
        )
        .into_bytes();

        let mut info = String::from("<< ");
        if let Some(ref title) = metadata.title {
            let _ = write!(info, "/Title ({}) ", Self::encode_text(title));
        }
        if let Some(ref author) = metadata.author {
            let _ = write!(info, "/Author ({}) ", Self::encode_text(author));
        }
        if let Some(ref subject) = metadata.subject {
            let _ = write!(info, "/Subject ({}) ", Self::encode_text(subject));
        }
        let _ = write!(info, "/Producer ({}) >>", PRODUCER);
        let info_obj_id = builder.push(info.into_bytes());

        self.serialize(&builder, info_obj_id)
    }

    /// One Type1 font object per face actually used, in a fixed order.
    /// Helvetica is always present so every page has a /F0.
    fn register_fonts(&self, builder: &mut PdfBuilder, pages: &[LayoutPage]) {
        let mut used: BTreeSet<StandardFont> = BTreeSet::new();
        used.insert(StandardFont::Helvetica);
        for page in pages {
            for element in &page.elements {
                if let DrawCommand::Text { font, .. } = element {
                    used.insert(*font);
                }
            }
        }

        for font in used {
            let dict = format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                font.pdf_name()
            );
            let id = builder.push(dict.into_bytes());
            builder.font_objects.push((font, id));
        }
    }

    /// One XObject per distinct image. The same asset drawn on several
    /// pages (the logo in every header) is written once.
    fn register_images(&self, builder: &mut PdfBuilder, pages: &[LayoutPage]) {
        for page in pages {
            for element in &page.elements {
                if let DrawCommand::Image { image, .. } = element {
                    if builder.image_index(image).is_none() {
                        let id = Self::write_image_xobject(builder, image);
                        builder.image_objects.push((Arc::clone(image), id));
                    }
                }
            }
        }
    }

    /// Write a single image as one or two XObject PDF objects.
    /// Returns the main XObject ID.
    fn write_image_xobject(builder: &mut PdfBuilder, image: &LoadedImage) -> usize {
        match &image.pixel_data {
            ImagePixelData::Jpeg { data, color_space } => {
                let color_space_str = match color_space {
                    JpegColorSpace::DeviceRGB => "/DeviceRGB",
                    JpegColorSpace::DeviceGray => "/DeviceGray",
                };

                let mut obj_data: Vec<u8> = Vec::new();
                let _ = write!(
                    obj_data,
                    "<< /Type /XObject /Subtype /Image \
                     /Width {} /Height {} \
                     /ColorSpace {} \
                     /BitsPerComponent 8 \
                     /Filter /DCTDecode \
                     /Length {} >>\nstream\n",
                    image.width_px,
                    image.height_px,
                    color_space_str,
                    data.len()
                );
                obj_data.extend_from_slice(data);
                obj_data.extend_from_slice(b"\nendstream");
                builder.push(obj_data)
            }

            ImagePixelData::Decoded { rgb, alpha } => {
                // SMask first so the image can reference it
                let smask_id = alpha.as_ref().map(|alpha_data| {
                    let compressed_alpha = compress_to_vec_zlib(alpha_data, 6);
                    let mut smask_data: Vec<u8> = Vec::new();
                    let _ = write!(
                        smask_data,
                        "<< /Type /XObject /Subtype /Image \
                         /Width {} /Height {} \
                         /ColorSpace /DeviceGray \
                         /BitsPerComponent 8 \
                         /Filter /FlateDecode \
                         /Length {} >>\nstream\n",
                        image.width_px,
                        image.height_px,
                        compressed_alpha.len()
                    );
                    smask_data.extend_from_slice(&compressed_alpha);
                    smask_data.extend_from_slice(b"\nendstream");
                    builder.push(smask_data)
                });

                let compressed_rgb = compress_to_vec_zlib(rgb, 6);
                let smask_ref = smask_id
                    .map(|id| format!(" /SMask {} 0 R", id))
                    .unwrap_or_default();

                let mut obj_data: Vec<u8> = Vec::new();
                let _ = write!(
                    obj_data,
                    "<< /Type /XObject /Subtype /Image \
                     /Width {} /Height {} \
                     /ColorSpace /DeviceRGB \
                     /BitsPerComponent 8 \
                     /Filter /FlateDecode \
                     /Length {}{} >>\nstream\n",
                    image.width_px,
                    image.height_px,
                    compressed_rgb.len(),
                    smask_ref
                );
                obj_data.extend_from_slice(&compressed_rgb);
                obj_data.extend_from_slice(b"\nendstream");
                builder.push(obj_data)
            }
        }
    }

    /// Build the PDF content stream for a single page.
    fn build_content_stream(&self, page: &LayoutPage, builder: &PdfBuilder) -> String {
        let mut stream = String::new();
        for element in &page.elements {
            self.write_command(&mut stream, element, builder);
        }
        stream
    }

    /// Write one draw command as PDF operators. Layout coordinates are
    /// already PDF user space, so nothing is flipped here.
    fn write_command(&self, stream: &mut String, command: &DrawCommand, builder: &PdfBuilder) {
        match command {
            DrawCommand::Text {
                x,
                y,
                text,
                font,
                size,
                color,
            } => {
                let _ = write!(
                    stream,
                    "BT\n/F{} {} Tf\n{} rg\n{:.2} {:.2} Td\n({}) Tj\nET\n",
                    builder.font_index(*font),
                    fmt_num(*size),
                    fmt_color(color),
                    x,
                    y,
                    Self::encode_text(text)
                );
            }

            DrawCommand::Line {
                x1,
                y1,
                x2,
                y2,
                width,
                color,
            } => {
                let _ = write!(
                    stream,
                    "q\n{} RG\n{} w\n{:.2} {:.2} m\n{:.2} {:.2} l\nS\nQ\n",
                    fmt_color(color),
                    fmt_num(*width),
                    x1,
                    y1,
                    x2,
                    y2
                );
            }

            DrawCommand::Rect {
                x,
                y,
                width,
                height,
                fill,
                stroke,
            } => {
                if fill.is_none() && stroke.is_none() {
                    return;
                }
                stream.push_str("q\n");
                if let Some(fill) = fill {
                    let _ = writeln!(stream, "{} rg", fmt_color(fill));
                }
                if let Some((color, line_width)) = stroke {
                    let _ = write!(stream, "{} RG\n{} w\n", fmt_color(color), fmt_num(*line_width));
                }
                let op = match (fill.is_some(), stroke.is_some()) {
                    (true, true) => "B",
                    (true, false) => "f",
                    _ => "S",
                };
                let _ = write!(
                    stream,
                    "{:.2} {:.2} {:.2} {:.2} re\n{}\nQ\n",
                    x, y, width, height, op
                );
            }

            DrawCommand::Image {
                x,
                y,
                width,
                height,
                image,
            } => {
                if let Some(idx) = builder.image_index(image) {
                    let _ = write!(
                        stream,
                        "q\n{:.4} 0 0 {:.4} {:.2} {:.2} cm\n/Im{} Do\nQ\n",
                        width, height, x, y, idx
                    );
                }
            }
        }
    }

    fn build_font_resource_dict(&self, builder: &PdfBuilder) -> String {
        builder
            .font_objects
            .iter()
            .enumerate()
            .map(|(i, (_, obj_id))| format!("/F{} {} 0 R", i, obj_id))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The /XObject entries for the images drawn on `page`.
    fn build_xobject_resource_dict(&self, page: &LayoutPage, builder: &PdfBuilder) -> String {
        let mut entries: Vec<(usize, usize)> = page
            .elements
            .iter()
            .filter_map(|e| match e {
                DrawCommand::Image { image, .. } => builder
                    .image_index(image)
                    .map(|idx| (idx, builder.image_objects[idx].1)),
                _ => None,
            })
            .collect();
        entries.sort_by_key(|(idx, _)| *idx);
        entries.dedup();
        entries
            .iter()
            .map(|(idx, obj_id)| format!("/Im{} {} 0 R", idx, obj_id))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Encode text as the body of a PDF literal string in WinAnsiEncoding.
    /// Characters outside the encoding become `?`.
    fn encode_text(s: &str) -> String {
        let mut out = String::with_capacity(s.len());
        for ch in s.chars() {
            let b = Self::unicode_to_winansi(ch).unwrap_or(b'?');
            match b {
                b'\\' => out.push_str("\\\\"),
                b'(' => out.push_str("\\("),
                b')' => out.push_str("\\)"),
                0x20..=0x7E => out.push(b as char),
                _ => {
                    // Octal escape for bytes outside ASCII printable range
                    let _ = write!(out, "\\{:03o}", b);
                }
            }
        }
        out
    }

    /// Map a Unicode codepoint to a WinAnsiEncoding byte value.
    ///
    /// WinAnsiEncoding is based on Windows-1252. Most codepoints in
    /// 0x20..=0x7E and 0xA0..=0xFF map directly. The 0x80..=0x9F range
    /// contains special mappings for smart quotes, bullets, dashes, etc.
    fn unicode_to_winansi(ch: char) -> Option<u8> {
        let cp = ch as u32;
        if (0x20..=0x7E).contains(&cp) || (0xA0..=0xFF).contains(&cp) {
            return Some(cp as u8);
        }
        match cp {
            0x20AC => Some(0x80), // Euro sign
            0x201A => Some(0x82), // Single low-9 quotation mark
            0x0192 => Some(0x83), // Latin small letter f with hook
            0x201E => Some(0x84), // Double low-9 quotation mark
            0x2026 => Some(0x85), // Horizontal ellipsis
            0x2020 => Some(0x86), // Dagger
            0x2021 => Some(0x87), // Double dagger
            0x02C6 => Some(0x88), // Modifier letter circumflex accent
            0x2030 => Some(0x89), // Per mille sign
            0x0160 => Some(0x8A), // Latin capital letter S with caron
            0x2039 => Some(0x8B), // Single left-pointing angle quotation
            0x0152 => Some(0x8C), // Latin capital ligature OE
            0x017D => Some(0x8E), // Latin capital letter Z with caron
            0x2018 => Some(0x91), // Left single quotation mark
            0x2019 => Some(0x92), // Right single quotation mark
            0x201C => Some(0x93), // Left double quotation mark
            0x201D => Some(0x94), // Right double quotation mark
            0x2022 => Some(0x95), // Bullet
            0x2013 => Some(0x96), // En dash
            0x2014 => Some(0x97), // Em dash
            0x02DC => Some(0x98), // Small tilde
            0x2122 => Some(0x99), // Trade mark sign
            0x0161 => Some(0x9A), // Latin small letter s with caron
            0x203A => Some(0x9B), // Single right-pointing angle quotation
            0x0153 => Some(0x9C), // Latin small ligature oe
            0x017E => Some(0x9E), // Latin small letter z with caron
            0x0178 => Some(0x9F), // Latin capital letter Y with diaeresis
            _ => None,
        }
    }

    /// Serialize all objects into the final PDF byte stream.
    fn serialize(&self, builder: &PdfBuilder, info_obj_id: usize) -> Vec<u8> {
        let mut output: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = vec![0; builder.objects.len()];

        output.extend_from_slice(b"%PDF-1.7\n");
        output.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");

        for (i, obj) in builder.objects.iter().enumerate().skip(1) {
            offsets[i] = output.len();
            let header = format!("{} 0 obj\n", i);
            output.extend_from_slice(header.as_bytes());
            output.extend_from_slice(&obj.data);
            output.extend_from_slice(b"\nendobj\n\n");
        }

        let xref_offset = output.len();
        let _ = write!(output, "xref\n0 {}\n", builder.objects.len());
        let _ = write!(output, "0000000000 65535 f \n");
        for offset in offsets.iter().skip(1) {
            let _ = write!(output, "{:010} 00000 n \n", offset);
        }

        let _ = write!(
            output,
            "trailer\n<< /Size {} /Root 1 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            builder.objects.len(),
            info_obj_id,
            xref_offset
        );

        output
    }
}

fn fmt_color(c: &Color) -> String {
    format!("{:.3} {:.3} {:.3}", c.r, c.g, c.b)
}

/// Sizes and widths: integers without decimals, otherwise up to two places.
fn fmt_num(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{:.0}", v)
    } else {
        let s = format!("{:.2}", v);
        s.trim_end_matches('0').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::TextStyle;

    fn page(elements: Vec<DrawCommand>) -> LayoutPage {
        LayoutPage {
            width: 595.28,
            height: 841.89,
            elements,
        }
    }

    fn text(s: &str, font: StandardFont) -> DrawCommand {
        let style = TextStyle::regular(9.0);
        DrawCommand::Text {
            x: 30.0,
            y: 700.0,
            text: s.to_string(),
            font,
            size: style.size,
            color: style.color,
        }
    }

    fn image(px: u32) -> Arc<LoadedImage> {
        Arc::new(LoadedImage {
            pixel_data: ImagePixelData::Decoded {
                rgb: vec![128; (px * px * 3) as usize],
                alpha: None,
            },
            width_px: px,
            height_px: px,
        })
    }

    fn count(haystack: &[u8], needle: &[u8]) -> usize {
        haystack.windows(needle.len()).filter(|w| *w == needle).count()
    }

    #[test]
    fn test_encode_text_escapes() {
        assert_eq!(PdfWriter::encode_text("Hello (World)"), "Hello \\(World\\)");
        assert_eq!(PdfWriter::encode_text("back\\slash"), "back\\\\slash");
    }

    #[test]
    fn test_encode_text_winansi() {
        assert_eq!(PdfWriter::encode_text("\u{2022}   Item"), "\\225   Item");
        assert_eq!(PdfWriter::encode_text("\u{00A3}5"), "\\2435");
        assert_eq!(PdfWriter::encode_text("\u{4E2D}"), "?");
    }

    #[test]
    fn test_empty_document_produces_valid_pdf() {
        let bytes = PdfWriter::new().write(&[page(vec![])], &Metadata::default());

        assert!(bytes.starts_with(b"%PDF-1.7"));
        assert!(bytes.windows(5).any(|w| w == b"%%EOF"));
        assert!(bytes.windows(4).any(|w| w == b"xref"));
        assert!(bytes.windows(7).any(|w| w == b"trailer"));
    }

    #[test]
    fn test_metadata_in_pdf() {
        let metadata = Metadata {
            title: Some("Invoice 89973".to_string()),
            author: Some("ELI MOTORS LIMITED".to_string()),
            subject: None,
        };
        let bytes = PdfWriter::new().write(&[page(vec![])], &metadata);
        let text = String::from_utf8_lossy(&bytes);

        assert!(text.contains("/Title (Invoice 89973)"));
        assert!(text.contains("/Author (ELI MOTORS LIMITED)"));
        assert!(text.contains("/Producer (motordocs"));
        assert!(!text.contains("/CreationDate"));
    }

    #[test]
    fn test_bold_font_registered_separately() {
        let pages = vec![page(vec![
            text("Labour", StandardFont::HelveticaBold),
            text("Oil", StandardFont::Helvetica),
        ])];
        let bytes = PdfWriter::new().write(&pages, &Metadata::default());
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/BaseFont /Helvetica "));
        assert!(text.contains("/BaseFont /Helvetica-Bold "));
        assert_eq!(text.matches("/Subtype /Type1").count(), 2);
    }

    #[test]
    fn test_shared_image_written_once() {
        let logo = image(2);
        let draw = |y: f64| DrawCommand::Image {
            x: 445.0,
            y,
            width: 120.0,
            height: 60.0,
            image: Arc::clone(&logo),
        };
        let pages = vec![page(vec![draw(760.0)]), page(vec![draw(760.0)])];
        let bytes = PdfWriter::new().write(&pages, &Metadata::default());
        assert_eq!(count(&bytes, b"/Subtype /Image"), 1);
        assert_eq!(count(&bytes, b"/XObject << /Im0"), 2);
    }

    #[test]
    fn test_distinct_images_get_distinct_names() {
        let pages = vec![page(vec![
            DrawCommand::Image {
                x: 0.0,
                y: 0.0,
                width: 10.0,
                height: 10.0,
                image: image(1),
            },
            DrawCommand::Image {
                x: 0.0,
                y: 0.0,
                width: 10.0,
                height: 10.0,
                image: image(1),
            },
        ])];
        let bytes = PdfWriter::new().write(&pages, &Metadata::default());
        assert_eq!(count(&bytes, b"/Subtype /Image"), 2);
        assert!(String::from_utf8_lossy(&bytes).contains("/Im1 "));
    }

    #[test]
    fn test_output_is_deterministic() {
        let pages = vec![page(vec![
            text("Total", StandardFont::HelveticaBold),
            DrawCommand::Rect {
                x: 30.0,
                y: 100.0,
                width: 50.0,
                height: 20.0,
                fill: Some(Color::hex("#e8e8e8")),
                stroke: None,
            },
        ])];
        let a = PdfWriter::new().write(&pages, &Metadata::default());
        let b = PdfWriter::new().write(&pages, &Metadata::default());
        assert_eq!(a, b);
    }

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(9.0), "9");
        assert_eq!(fmt_num(8.5), "8.5");
        assert_eq!(fmt_num(0.5), "0.5");
        assert_eq!(fmt_num(7.25), "7.25");
    }
}
