use imageproc::image::ImageError;

use crate::image::OutputFormat;

#[derive(Debug, thiserror::Error)]
pub enum EnhanceError {
    #[error("Failed to decode image: {0}")]
    InvalidImage(#[source] ImageError),

    #[error("Decoded image is empty ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("Failed to compress image to {format:?}")]
    Encode {
        format: OutputFormat,
        #[source]
        source: ImageError,
    },
}

impl EnhanceError {
    /// True when the caller sent bytes we can't read as an image,
    /// as opposed to a failure on our side.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            EnhanceError::InvalidImage(_) | EnhanceError::EmptyImage { .. }
        )
    }
}

pub type Result<T, E = EnhanceError> = std::result::Result<T, E>;
