//! Content-type mapping and the read-time contrast transform.

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageFormat};
use imagestore_core::{Error, Result};

/// Lowest contrast level accepted by the `image` crate before its curve
/// folds back on itself.
pub const MIN_CONTRAST: f32 = -100.0;
/// Highest contrast level we pass through.
pub const MAX_CONTRAST: f32 = 100.0;

/// Map an upload's declared content type to the extension it is stored under.
///
/// MIME parameters (`; charset=...`) are ignored and matching is
/// case-insensitive.
pub fn encode_extension(content_type: &str) -> Result<&'static str> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.as_str() {
        "image/jpeg" | "image/jpg" | "image/pjpeg" => Ok("jpeg"),
        "image/png" => Ok("png"),
        "image/tiff" => Ok("tiff"),
        "image/gif" => Ok("gif"),
        "image/bmp" => Ok("bmp"),
        "image/webp" => Ok("webp"),
        _ => Err(Error::UnsupportedMediaType(content_type.to_string())),
    }
}

/// Image format implied by a stored filename's extension.
pub fn format_for_filename(filename: &str) -> Option<ImageFormat> {
    ImageFormat::from_path(Path::new(filename)).ok()
}

/// MIME type to serve a stored file with.
pub fn mime_for_filename(filename: &str) -> &'static str {
    format_for_filename(filename)
        .map(|f| f.to_mime_type())
        .unwrap_or("application/octet-stream")
}

/// Clamp a requested contrast level into the codec's usable range.
///
/// The level is the `image` crate's contrast percentage: 0 leaves the image
/// unchanged, -100 flattens it to mid-grey, 100 quadruples every pixel's
/// distance from mid-grey. Values outside that range are clamped.
pub fn clamp_contrast(level: f32) -> Result<f32> {
    if !level.is_finite() {
        return Err(Error::Validation(format!(
            "contrast must be a finite number, got {level}"
        )));
    }
    Ok(level.clamp(MIN_CONTRAST, MAX_CONTRAST))
}

/// Decode `data`, apply a contrast adjustment and re-encode as `format`.
///
/// Deterministic: identical input bytes and level give identical output.
pub fn adjust_contrast(data: &[u8], level: f32, format: ImageFormat) -> Result<Vec<u8>> {
    let level = clamp_contrast(level)?;

    let img = image::load_from_memory(data)
        .map_err(|e| Error::Image(format!("Failed to decode image: {e}")))?;

    let adjusted = img.adjust_contrast(level);
    encode(&adjusted, format)
}

fn encode(img: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());

    // The JPEG encoder has no alpha channel.
    let result = if format == ImageFormat::Jpeg {
        DynamicImage::ImageRgb8(img.to_rgb8()).write_to(&mut buf, format)
    } else {
        img.write_to(&mut buf, format)
    };

    result.map_err(|e| Error::Image(format!("Failed to encode image as {format:?}: {e}")))?;
    Ok(buf.into_inner())
}
