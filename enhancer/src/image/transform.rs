//! Image transformations: alpha flattening and sharpening

use imageproc::image::{DynamicImage, Rgb, RgbImage};
use rayon::iter::{IndexedParallelIterator, ParallelIterator};
use rayon::slice::ParallelSliceMut;

/// 3x3 sharpen kernel, row-major. Weights sum to 1 so flat areas are untouched.
pub const SHARPEN_KERNEL: [i32; 9] = [
    0, -1, 0, //
    -1, 5, -1, //
    0, -1, 0,
];

const CHANNELS: usize = 3;

/// Draw the image onto a fresh opaque RGB canvas.
///
/// The canvas starts out black, so transparent pixels are composited
/// source-over onto black. Images without alpha are only converted to 8-bit RGB.
pub fn flatten(img: &DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.to_rgb8();
    }

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut canvas = RgbImage::new(width, height);

    for (dst, src) in canvas.pixels_mut().zip(rgba.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = Rgb([over_black(r, a), over_black(g, a), over_black(b, a)]);
    }

    canvas
}

#[inline]
fn over_black(channel: u8, alpha: u8) -> u8 {
    ((channel as u32 * alpha as u32 + 127) / 255) as u8
}

/// Convolve every channel with [`SHARPEN_KERNEL`].
///
/// Border pixels have no full 3x3 neighbourhood and are copied through
/// unchanged, so rasters under 3 pixels in either direction come back as-is.
pub fn sharpen(src: &RgbImage) -> RgbImage {
    let (width, height) = src.dimensions();
    let mut dst = src.clone();

    if width < 3 || height < 3 {
        log::debug!("Image is {width}x{height}, no interior pixels to sharpen");
        return dst;
    }

    let stride = width as usize * CHANNELS;
    let src_raw = src.as_raw().as_slice();
    let dst_raw: &mut [u8] = &mut dst;

    dst_raw
        .par_chunks_mut(stride)
        .enumerate()
        .skip(1)
        .take(height as usize - 2)
        .for_each(|(y, row)| convolve_row(src_raw, stride, y, row));

    dst
}

fn convolve_row(src: &[u8], stride: usize, y: usize, row: &mut [u8]) {
    let width = stride / CHANNELS;

    for x in 1..width - 1 {
        for c in 0..CHANNELS {
            let mut acc = 0i32;
            for (k, &weight) in SHARPEN_KERNEL.iter().enumerate() {
                if weight == 0 {
                    continue;
                }
                let sy = y + k / 3 - 1;
                let sx = x + k % 3 - 1;
                acc += weight * src[sy * stride + sx * CHANNELS + c] as i32;
            }
            row[x * CHANNELS + c] = acc.clamp(0, 255) as u8;
        }
    }
}
