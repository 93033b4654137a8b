//! Image encoding: JPEG, PNG

use imageproc::image::codecs::jpeg::JpegEncoder;
use imageproc::image::codecs::png::{CompressionType, FilterType, PngEncoder};
use imageproc::image::{ExtendedColorType, ImageEncoder, ImageResult, RgbImage};

use crate::error::{EnhanceError, Result};

use super::OutputFormat;

/// Quality used when re-encoding JPEGs
pub const JPEG_QUALITY: u8 = 75;

/// Compress an image to JPEG format with the specified quality
pub fn compress_to_jpeg<W>(img: &RgbImage, writer: &mut W, quality: u8) -> ImageResult<()>
where
    W: std::io::Write,
{
    let mut encoder = JpegEncoder::new_with_quality(writer, quality);
    encoder.encode_image(img)
}

/// Compress an image to PNG format with default compression
pub fn compress_to_png<W>(img: &RgbImage, writer: &mut W) -> ImageResult<()>
where
    W: std::io::Write,
{
    let encoder =
        PngEncoder::new_with_quality(writer, CompressionType::Default, FilterType::Adaptive);

    encoder.write_image(
        img.as_raw(),
        img.width(),
        img.height(),
        ExtendedColorType::Rgb8,
    )
}

pub fn encode(img: &RgbImage, format: OutputFormat) -> Result<Vec<u8>> {
    let (width, height) = img.dimensions();
    let mut buffer = Vec::with_capacity(width as usize * height as usize);

    match format {
        OutputFormat::Jpeg => compress_to_jpeg(img, &mut buffer, JPEG_QUALITY),
        OutputFormat::Png => compress_to_png(img, &mut buffer),
    }
    .map_err(|source| EnhanceError::Encode { format, source })?;

    log::trace!("Encoded {width}x{height} image as {format:?}: {} bytes", buffer.len());
    Ok(buffer)
}
