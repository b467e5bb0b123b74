//! # Image Assets
//!
//! Finds the workshop's logo and car diagram on disk and prepares them for
//! PDF embedding. JPEG images pass through without re-encoding (the PDF
//! spec supports DCTDecode natively). PNG images are decoded to RGB pixels
//! with a separate alpha channel for SMask transparency.
//!
//! Nothing in here is fatal to a render: a missing or broken asset is
//! logged and the element it would have filled is simply left out.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A fully decoded/loaded image ready for PDF embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedImage {
    pub pixel_data: ImagePixelData,
    pub width_px: u32,
    pub height_px: u32,
}

impl LoadedImage {
    /// Height over width, used to size an image from a target width.
    pub fn aspect_ratio(&self) -> f64 {
        if self.width_px == 0 {
            return 1.0;
        }
        self.height_px as f64 / self.width_px as f64
    }
}

/// The pixel data in a format the PDF serializer can consume directly.
#[derive(Debug, Clone, PartialEq)]
pub enum ImagePixelData {
    /// Raw JPEG bytes, embedded directly with DCTDecode.
    Jpeg {
        data: Vec<u8>,
        color_space: JpegColorSpace,
    },
    /// Decoded RGB pixels + optional alpha channel.
    Decoded {
        /// width * height * 3 bytes (RGB)
        rgb: Vec<u8>,
        /// width * height bytes (grayscale alpha). None if fully opaque.
        alpha: Option<Vec<u8>>,
    },
}

/// JPEG color space for the PDF /ColorSpace entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JpegColorSpace {
    DeviceRGB,
    DeviceGray,
}

/// Resolves asset names against a list of search directories.
#[derive(Debug, Clone, Default)]
pub struct AssetLocator {
    search_dirs: Vec<PathBuf>,
}

impl AssetLocator {
    pub fn new(search_dirs: Vec<PathBuf>) -> Self {
        Self { search_dirs }
    }

    /// First existing file for `name`: the name itself when it is an
    /// absolute path, then `name` inside each search directory in order.
    pub fn find(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty() {
            return None;
        }
        let direct = Path::new(name);
        if direct.is_absolute() {
            return direct.is_file().then(|| direct.to_path_buf());
        }
        self.search_dirs
            .iter()
            .map(|dir| dir.join(name))
            .find(|p| p.is_file())
    }

    /// Find and decode an asset. `data:` URIs are decoded inline.
    pub fn load(&self, name: &str) -> Option<Arc<LoadedImage>> {
        let src = if name.starts_with("data:image/") {
            name.to_string()
        } else {
            match self.find(name) {
                Some(path) => path.display().to_string(),
                None => {
                    log::debug!("asset '{}' not found in {:?}", name, self.search_dirs);
                    return None;
                }
            }
        };
        match load_image(&src) {
            Ok(img) => Some(Arc::new(img)),
            Err(e) => {
                log::warn!("skipping asset '{}': {}", name, e);
                None
            }
        }
    }
}

/// Load an image from a source string.
///
/// Supported `src` formats:
/// - `data:image/...;base64,...`: data URI
/// - File path (absolute or relative): reads from disk
/// - Raw base64-encoded image data
pub fn load_image(src: &str) -> Result<LoadedImage, String> {
    let raw_bytes = read_source_bytes(src)?;
    decode_image_bytes(&raw_bytes)
}

/// Resolve the source string to raw image bytes.
fn read_source_bytes(src: &str) -> Result<Vec<u8>, String> {
    // Data URI: data:image/png;base64,iVBOR...
    if src.starts_with("data:image/") {
        let comma_pos = src
            .find(',')
            .ok_or_else(|| "Invalid data URI: missing comma".to_string())?;
        let b64_data = &src[comma_pos + 1..];
        return base64_decode(b64_data);
    }

    let path = Path::new(src);
    if path.is_file() {
        return std::fs::read(path)
            .map_err(|e| format!("Failed to read image file '{}': {}", src, e));
    }

    // Try raw base64
    base64_decode(src)
}

fn base64_decode(input: &str) -> Result<Vec<u8>, String> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD
        .decode(input)
        .map_err(|e| format!("Base64 decode error: {}", e))
}

/// Detect image format from magic bytes and decode accordingly.
fn decode_image_bytes(data: &[u8]) -> Result<LoadedImage, String> {
    if data.len() < 4 {
        return Err("Image data too short".to_string());
    }

    if is_jpeg(data) {
        decode_jpeg(data)
    } else if is_png(data) {
        decode_png(data)
    } else {
        Err("Unsupported image format (expected JPEG or PNG)".to_string())
    }
}

fn is_jpeg(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0xFF && data[1] == 0xD8
}

fn is_png(data: &[u8]) -> bool {
    data.len() >= 4 && data[0] == 0x89 && data[1] == 0x50 && data[2] == 0x4E && data[3] == 0x47
}

/// JPEG: read dimensions and color space without decoding pixels.
fn decode_jpeg(data: &[u8]) -> Result<LoadedImage, String> {
    let reader = image::io::Reader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| format!("JPEG format detection error: {}", e))?;

    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| format!("Failed to read JPEG dimensions: {}", e))?;

    Ok(LoadedImage {
        pixel_data: ImagePixelData::Jpeg {
            data: data.to_vec(),
            color_space: detect_jpeg_color_space(data),
        },
        width_px: width,
        height_px: height,
    })
}

/// Scan JPEG markers for the SOF segment and read its component count.
fn detect_jpeg_color_space(data: &[u8]) -> JpegColorSpace {
    let mut i = 2; // skip SOI marker (FF D8)
    while i + 1 < data.len() {
        if data[i] != 0xFF {
            break;
        }
        let marker = data[i + 1];
        let is_sof = matches!(marker, 0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF);
        if is_sof && i + 9 < data.len() {
            // length(2) + precision(1) + height(2) + width(2) + num_components(1)
            return if data[i + 9] == 1 {
                JpegColorSpace::DeviceGray
            } else {
                JpegColorSpace::DeviceRGB
            };
        }
        if i + 3 < data.len() {
            let seg_len = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
            i += 2 + seg_len;
        } else {
            break;
        }
    }
    JpegColorSpace::DeviceRGB
}

/// PNG: decode to RGBA, split into RGB + alpha.
fn decode_png(data: &[u8]) -> Result<LoadedImage, String> {
    let reader = image::io::Reader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| format!("PNG format detection error: {}", e))?;

    let img = reader
        .decode()
        .map_err(|e| format!("Failed to decode PNG: {}", e))?;

    let rgba = img.to_rgba8();
    let width = rgba.width();
    let height = rgba.height();

    let pixel_count = (width * height) as usize;
    let mut rgb = Vec::with_capacity(pixel_count * 3);
    let mut alpha = Vec::with_capacity(pixel_count);
    let mut has_transparency = false;

    for pixel in rgba.pixels() {
        rgb.extend_from_slice(&pixel.0[..3]);
        alpha.push(pixel[3]);
        if pixel[3] != 255 {
            has_transparency = true;
        }
    }

    Ok(LoadedImage {
        pixel_data: ImagePixelData::Decoded {
            rgb,
            alpha: if has_transparency { Some(alpha) } else { None },
        },
        width_px: width,
        height_px: height,
    })
}

#[cfg(test)]
pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([40, 80, 160, 255]));
    let mut buf = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut buf);
    image::ImageEncoder::write_image(encoder, img.as_raw(), width, height, image::ColorType::Rgba8)
        .unwrap();
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magic_bytes() {
        assert!(is_jpeg(&[0xFF, 0xD8, 0xFF, 0xE0]));
        assert!(!is_jpeg(&[0x89, 0x50, 0x4E, 0x47]));
        assert!(is_png(&[0x89, 0x50, 0x4E, 0x47]));
        assert!(!is_png(&[0x89, 0x50]));
    }

    #[test]
    fn test_unsupported_format() {
        assert!(decode_image_bytes(&[0x00, 0x01, 0x02, 0x03, 0x04]).is_err());
        assert!(decode_image_bytes(&[0x00, 0x01]).is_err());
    }

    #[test]
    fn test_decode_png_keeps_aspect_ratio() {
        let loaded = decode_image_bytes(&png_bytes(355, 274)).unwrap();
        assert_eq!(loaded.width_px, 355);
        assert!((loaded.aspect_ratio() - 274.0 / 355.0).abs() < 1e-9);
        match &loaded.pixel_data {
            ImagePixelData::Decoded { rgb, alpha } => {
                assert_eq!(rgb.len(), 355 * 274 * 3);
                assert!(alpha.is_none(), "Fully opaque should have no alpha");
            }
            _ => panic!("PNG should decode to Decoded variant"),
        }
    }

    #[test]
    fn test_locator_searches_dirs_in_order() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        std::fs::write(second.path().join("logo.png"), png_bytes(4, 2)).unwrap();

        let locator = AssetLocator::new(vec![
            first.path().to_path_buf(),
            second.path().to_path_buf(),
        ]);
        assert_eq!(locator.find("logo.png"), Some(second.path().join("logo.png")));
        let img = locator.load("logo.png").expect("logo should load");
        assert_eq!(img.width_px, 4);
    }

    #[test]
    fn test_missing_asset_is_none() {
        let locator = AssetLocator::new(vec![]);
        assert!(locator.find("car_diagram.png").is_none());
        assert!(locator.load("car_diagram.png").is_none());
    }

    #[test]
    fn test_corrupt_asset_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("car_diagram.png"), b"not an image").unwrap();
        let locator = AssetLocator::new(vec![dir.path().to_path_buf()]);
        assert!(locator.find("car_diagram.png").is_some());
        assert!(locator.load("car_diagram.png").is_none());
    }

    #[test]
    fn test_data_uri_loads() {
        use base64::Engine;
        let b64 = base64::engine::general_purpose::STANDARD.encode(png_bytes(1, 1));
        let locator = AssetLocator::default();
        let img = locator.load(&format!("data:image/png;base64,{}", b64)).unwrap();
        assert_eq!(img.height_px, 1);
    }
}
