//! Thumbnail rendering.
//!
//! A preview is the source image scaled to cover a square box, centre
//! cropped, and re-encoded as JPEG. Rendering is CPU bound and synchronous;
//! [`crate::cache::PreviewCache`] moves it onto the blocking pool.

use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::ExtendedColorType;

use crate::error::{CoreError, CoreResult};
use crate::fs::image_info::open_image;

/// Decodes the image at `source` and renders a `size`×`size` JPEG preview.
///
/// The image is scaled so that it fills the box on both axes with its
/// aspect ratio preserved; the overflow on the longer axis is cropped
/// evenly from both sides.
///
/// # Errors
///
/// - [`CoreError::NotFound`] if `source` does not exist.
/// - [`CoreError::UnknownFormat`] if the content matches no known format.
/// - [`CoreError::Decode`] if the image data is corrupt.
/// - [`CoreError::Encode`] if JPEG encoding fails.
pub fn render_preview(source: &Path, size: u32, quality: u8) -> CoreResult<Vec<u8>> {
    let (reader, _) = open_image(source)?;
    let img = reader.decode().map_err(|e| CoreError::Decode {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;

    let thumb = img.resize_to_fill(size, size, FilterType::Lanczos3).to_rgb8();

    let mut out = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut out, quality)
        .encode(
            thumb.as_raw(),
            thumb.width(),
            thumb.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| CoreError::Encode(e.to_string()))?;

    Ok(out.into_inner())
}
