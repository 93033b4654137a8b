//! Image enhancement pipeline: decode, flatten, sharpen, encode

mod decode;
mod encode;
mod transform;

// Re-export public API
pub use decode::decode;
pub use encode::{compress_to_jpeg, compress_to_png, encode, JPEG_QUALITY};
pub use transform::{flatten, sharpen, SHARPEN_KERNEL};

use imageproc::image::{DynamicImage, RgbImage};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
}

impl OutputFormat {
    /// PNG if the name ends in `.png` (any case), JPEG for everything else.
    pub fn from_filename(filename: &str) -> Self {
        if filename.to_ascii_lowercase().ends_with(".png") {
            OutputFormat::Png
        } else {
            OutputFormat::Jpeg
        }
    }

    pub fn media_type(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
        }
    }
}

/// Encoded result of a single [`enhance`] call
#[derive(Debug, Clone)]
pub struct Enhanced {
    pub data: Vec<u8>,
    pub format: OutputFormat,
    pub dimensions: (u32, u32),
}

impl Enhanced {
    pub fn media_type(&self) -> &'static str {
        self.format.media_type()
    }
}

/// Decode `data`, flatten and sharpen it, and re-encode it in the format
/// picked from `filename`.
pub fn enhance(data: &[u8], filename: &str) -> Result<Enhanced> {
    let img = decode(data)?;

    log::info!("Enhancing image: {filename}");
    let img = process(&img);

    let format = OutputFormat::from_filename(filename);
    let data = encode(&img, format)?;

    Ok(Enhanced {
        data,
        format,
        dimensions: img.dimensions(),
    })
}

/// Flatten onto an opaque RGB canvas, then apply the sharpen kernel
pub fn process(img: &DynamicImage) -> RgbImage {
    log::debug!("Applying sharpen kernel {SHARPEN_KERNEL:?}");
    sharpen(&flatten(img))
}

#[cfg(test)]
mod tests {
    use super::*;
    use imageproc::image::{
        load_from_memory, load_from_memory_with_format, ImageFormat, Rgb, Rgba, RgbaImage,
    };

    fn png_bytes(img: &DynamicImage) -> Vec<u8> {
        let mut buffer = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buffer, ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 13) as u8, (y * 29) as u8, ((x + y) * 7) as u8])
        }))
    }

    #[test]
    fn format_follows_extension() {
        for name in ["test.png", "TEST.PNG", "photo.Png", "a.b.png"] {
            assert_eq!(OutputFormat::from_filename(name), OutputFormat::Png, "{name}");
        }
        for name in ["", "png", "bad.jpg", "x.jpeg", "anim.gif", "y.png.jpg", "z.pngx"] {
            assert_eq!(OutputFormat::from_filename(name), OutputFormat::Jpeg, "{name}");
        }
    }

    #[test]
    fn media_types() {
        assert_eq!(OutputFormat::Png.media_type(), "image/png");
        assert_eq!(OutputFormat::Jpeg.media_type(), "image/jpeg");
    }

    #[test]
    fn solid_png_round_trips_unchanged() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, Rgb([30, 144, 255])));

        let out = enhance(&png_bytes(&img), "test.png").unwrap();

        assert_eq!(out.format, OutputFormat::Png);
        assert_eq!(out.media_type(), "image/png");
        assert_eq!(out.dimensions, (2, 2));
        let decoded = load_from_memory_with_format(&out.data, ImageFormat::Png).unwrap();
        assert_eq!(decoded.to_rgb8(), RgbImage::from_pixel(2, 2, Rgb([30, 144, 255])));
    }

    #[test]
    fn png_input_can_be_served_as_jpeg() {
        let out = enhance(&png_bytes(&gradient(20, 11)), "upload.jpg").unwrap();

        assert_eq!(out.media_type(), "image/jpeg");
        let decoded = load_from_memory_with_format(&out.data, ImageFormat::Jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (20, 11));
    }

    #[test]
    fn jpeg_input_keeps_dimensions() {
        let mut jpeg = Vec::new();
        compress_to_jpeg(&gradient(33, 18).to_rgb8(), &mut jpeg, 90).unwrap();

        let out = enhance(&jpeg, "photo.jpeg").unwrap();

        assert_eq!(out.dimensions, (33, 18));
        let decoded = load_from_memory(&out.data).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (33, 18));
    }

    #[test]
    fn png_output_is_deterministic() {
        let input = png_bytes(&gradient(12, 12));

        let first = enhance(&input, "a.png").unwrap();
        let second = enhance(&input, "a.png").unwrap();

        assert_eq!(first.data, second.data);
    }

    #[test]
    fn jpeg_output_dimensions_are_stable() {
        let input = png_bytes(&gradient(12, 7));

        let first = enhance(&input, "a.jpg").unwrap();
        let second = enhance(&input, "a.jpg").unwrap();

        assert_eq!(first.dimensions, second.dimensions);
        let a = load_from_memory(&first.data).unwrap();
        let b = load_from_memory(&second.data).unwrap();
        assert_eq!((a.width(), a.height()), (b.width(), b.height()));
    }

    #[test]
    fn output_edges_match_flattened_input() {
        let img = gradient(10, 8);
        let out = enhance(&png_bytes(&img), "edges.png").unwrap();
        let decoded = load_from_memory(&out.data).unwrap().to_rgb8();
        let flat = flatten(&img);

        for x in 0..10 {
            assert_eq!(decoded.get_pixel(x, 0), flat.get_pixel(x, 0));
            assert_eq!(decoded.get_pixel(x, 7), flat.get_pixel(x, 7));
        }
        for y in 0..8 {
            assert_eq!(decoded.get_pixel(0, y), flat.get_pixel(0, y));
            assert_eq!(decoded.get_pixel(9, y), flat.get_pixel(9, y));
        }
        assert_eq!(decoded, sharpen(&flat));
    }

    #[test]
    fn transparent_png_is_flattened() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([200, 10, 10, 0])));

        let out = enhance(&png_bytes(&img), "clear.png").unwrap();

        let decoded = load_from_memory(&out.data).unwrap();
        assert!(!decoded.color().has_alpha());
        assert!(decoded.to_rgb8().pixels().all(|p| *p == Rgb([0, 0, 0])));
    }

    #[test]
    fn garbage_is_rejected() {
        let err = enhance(&[7, 1, 3, 255, 0, 42, 9, 9, 100, 12], "bad.jpg").unwrap_err();
        assert!(err.is_invalid_input());
    }
}
