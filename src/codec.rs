//! Image decoding and encoding.

use crate::error::{ForgeError, Result};
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::Path;

/// Decode encoded image bytes into RGBA8.
pub fn decode_rgba(bytes: &[u8]) -> Result<RgbaImage> {
    Ok(image::load_from_memory(bytes)?.to_rgba8())
}

/// Encode an RGBA8 image as PNG.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Load an image file into RGBA8.
pub fn load_rgba<P: AsRef<Path>>(path: P) -> Result<RgbaImage> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| {
        ForgeError::ImageError(format!("failed to read image '{}': {}", path.display(), e))
    })?;
    decode_rgba(&bytes).map_err(|e| {
        ForgeError::ImageError(format!("failed to decode image '{}': {}", path.display(), e))
    })
}
