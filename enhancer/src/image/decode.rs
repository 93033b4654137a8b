//! Image decoding

use imageproc::image::{load_from_memory, DynamicImage};

use crate::error::{EnhanceError, Result};

/// Decode image from memory, guessing the format from its content.
pub fn decode(data: &[u8]) -> Result<DynamicImage> {
    let img = load_from_memory(data).map_err(EnhanceError::InvalidImage)?;

    let (width, height) = (img.width(), img.height());
    if width == 0 || height == 0 {
        return Err(EnhanceError::EmptyImage { width, height });
    }

    log::debug!("Decoded {width}x{height} {:?} image", img.color());
    Ok(img)
}
