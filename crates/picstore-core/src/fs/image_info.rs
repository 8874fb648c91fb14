//! Image format detection and resolution reading.
//!
//! Formats are always sniffed from file content; the extension of a stored
//! file is never trusted.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::{ImageFormat, ImageReader};

use crate::error::{CoreError, CoreResult};
use crate::fs::entry::Resolution;

/// Opens the image at `path` with its format guessed from the content.
///
/// The reader starts without a format, so a misleading extension never
/// leaks through when the content matches nothing.
pub(crate) fn open_image(path: &Path) -> CoreResult<(ImageReader<BufReader<File>>, ImageFormat)> {
    let file = File::open(path).map_err(|e| CoreError::from_io(path, e))?;
    let reader = ImageReader::new(BufReader::new(file))
        .with_guessed_format()
        .map_err(|e| CoreError::from_io(path, e))?;
    let format = reader
        .format()
        .ok_or_else(|| CoreError::UnknownFormat(path.to_path_buf()))?;

    Ok((reader, format))
}

/// Detects the image format of the file at `path` from its leading bytes.
///
/// # Errors
///
/// - [`CoreError::NotFound`] if the file does not exist.
/// - [`CoreError::UnknownFormat`] if the content matches no known format.
pub fn detect_format(path: &Path) -> CoreResult<ImageFormat> {
    open_image(path).map(|(_, format)| format)
}

/// Returns the short lowercase name of a format (`png`, `jpg`, `webp`, ...).
pub fn format_name(format: ImageFormat) -> &'static str {
    format.extensions_str().first().copied().unwrap_or("unknown")
}

/// Reads width, height and format of the image at `path`.
///
/// Only the image header is parsed; pixel data is not decoded.
///
/// # Errors
///
/// - [`CoreError::NotFound`] if the file does not exist.
/// - [`CoreError::UnknownFormat`] if the content matches no known format.
/// - [`CoreError::Decode`] if the header is malformed.
pub fn read_resolution(path: &Path) -> CoreResult<Resolution> {
    let (reader, format) = open_image(path)?;
    let (width, height) = reader.into_dimensions().map_err(|e| CoreError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    Ok(Resolution {
        width,
        height,
        kind: format_name(format).to_string(),
    })
}
