//! Raster image recompression using the `image` crate.
//!
//! PNG is re-encoded losslessly with an adaptive filter; JPEG is re-encoded
//! at the configured quality. Callers keep the original when it is smaller.

use std::path::Path;

use anyhow::{Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, ImageFormat};

use crate::config::ImagesConfig;

/// How an image file is optimized, decided by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
    Svg,
    /// Copied unchanged (ico, gif, ...).
    Other,
}

impl ImageKind {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("png") => Self::Png,
            Some("jpg" | "jpeg") => Self::Jpeg,
            Some("svg") => Self::Svg,
            _ => Self::Other,
        }
    }
}

/// Re-encode a PNG.
pub fn optimize_png(data: &[u8], options: &ImagesConfig) -> Result<Vec<u8>> {
    let img = image::load_from_memory_with_format(data, ImageFormat::Png)
        .context("Failed to decode PNG")?;

    let compression = match options.png_level {
        0..=1 => CompressionType::Fast,
        2 => CompressionType::Default,
        _ => CompressionType::Best,
    };

    let mut out = Vec::with_capacity(data.len());
    let encoder = PngEncoder::new_with_quality(&mut out, compression, FilterType::Adaptive);
    img.write_with_encoder(encoder)
        .context("Failed to encode PNG")?;
    Ok(out)
}

/// Re-encode a JPEG at `options.quality`.
pub fn optimize_jpeg(data: &[u8], options: &ImagesConfig) -> Result<Vec<u8>> {
    let img = image::load_from_memory_with_format(data, ImageFormat::Jpeg)
        .context("Failed to decode JPEG")?;
    let img = match img {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => img,
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    };

    let mut out = Vec::with_capacity(data.len());
    let encoder = JpegEncoder::new_with_quality(&mut out, options.quality);
    img.write_with_encoder(encoder)
        .context("Failed to encode JPEG")?;
    Ok(out)
}

/// Pick whichever of `original` and `optimized` is smaller.
pub fn smaller(original: Vec<u8>, optimized: Vec<u8>) -> Vec<u8> {
    if optimized.len() < original.len() {
        optimized
    } else {
        original
    }
}
