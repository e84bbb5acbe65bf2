//! PNG encoding and decoding for RGBA rasters.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{ImageFormat, RgbaImage};

use crate::error::{Result, SnapshotError};

/// Reads and decodes an image file into an RGBA8 raster.
///
/// A file that cannot be read reports [`SnapshotError::Io`]; a file that is
/// read but not a valid image reports [`SnapshotError::Decode`].
pub fn load_png(path: &Path) -> Result<RgbaImage> {
    let bytes = std::fs::read(path).map_err(|e| SnapshotError::io(path, e))?;
    decode_png(&bytes, path)
}

pub(crate) fn decode_png(bytes: &[u8], path: &Path) -> Result<RgbaImage> {
    let img = image::load_from_memory(bytes).map_err(|source| SnapshotError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.to_rgba8())
}

/// Encodes `img` as PNG at `path`, creating parent directories as needed.
pub fn save_png(path: &Path, img: &RgbaImage) -> Result<()> {
    ensure_parent(path)?;
    img.save_with_format(path, ImageFormat::Png)
        .map_err(|source| SnapshotError::Encode {
            path: path.to_path_buf(),
            source,
        })
}

/// Decodes the base64 text a screenshot capture returns into raw PNG bytes.
///
/// Surrounding whitespace and line breaks are ignored.
pub fn decode_base64_png(encoded: &str) -> Result<Vec<u8>> {
    let compact: String = encoded.split_whitespace().collect();
    Ok(STANDARD.decode(compact)?)
}

pub(crate) fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| SnapshotError::io(parent, e))?;
    }
    Ok(())
}
