//! Whole-buffer color conversions.
//!
//! Sources with fewer than three channels are read as gray: the first
//! channel is used for red, green and blue alike. Derived buffers keep the
//! orientation flag of their source.

use super::{PixelBuffer, Sample};
use crate::color::{rgb_to_ycbcr, rgb_u8_to_gray, to_u8_clamped, ycbcr_to_rgb};

const YCBCR_COMPONENTS: usize = 3;

fn rgb_of(pixel: &[u8]) -> (f64, f64, f64) {
    let red = pixel[0] as f64;
    if pixel.len() > 2 {
        (red, pixel[1] as f64, pixel[2] as f64)
    } else {
        (red, red, red)
    }
}

fn map_pixels<S, T, F>(
    source: &PixelBuffer<S>,
    components: usize,
    mut transform: F,
) -> PixelBuffer<T>
where
    S: Sample,
    T: Sample,
    F: FnMut(&[S], &mut [T]),
{
    let mut samples = vec![T::ZERO; source.pixel_count() * components];
    for (source_pixel, target_pixel) in source.pixels().zip(samples.chunks_exact_mut(components)) {
        transform(source_pixel, target_pixel);
    }
    PixelBuffer {
        width: source.width(),
        height: source.height(),
        components,
        flipped: source.is_flipped(),
        samples,
    }
}

/// Y, Cb and Cr as unquantized `f64` channels.
pub fn convert_rgb_to_ycbcr(source: &PixelBuffer<u8>) -> PixelBuffer<f64> {
    map_pixels(source, YCBCR_COMPONENTS, |pixel, target| {
        let (red, green, blue) = rgb_of(pixel);
        let (luma, chroma_blue, chroma_red) = rgb_to_ycbcr(red, green, blue);
        target.copy_from_slice(&[luma, chroma_blue, chroma_red]);
    })
}

/// Y, Cb and Cr clamped to `[0, 255]` and rounded.
pub fn convert_rgb_to_ycbcr_u8(source: &PixelBuffer<u8>) -> PixelBuffer<u8> {
    map_pixels(source, YCBCR_COMPONENTS, |pixel, target| {
        let (red, green, blue) = rgb_of(pixel);
        let (luma, chroma_blue, chroma_red) = rgb_to_ycbcr(red, green, blue);
        target.copy_from_slice(&[
            to_u8_clamped(luma),
            to_u8_clamped(chroma_blue),
            to_u8_clamped(chroma_red),
        ]);
    })
}

/// Back to RGB bytes. `None` unless the source has exactly three channels.
pub fn convert_ycbcr_to_rgb_u8(source: &PixelBuffer<u8>) -> Option<PixelBuffer<u8>> {
    if source.components() != YCBCR_COMPONENTS {
        return None;
    }
    Some(map_pixels(source, YCBCR_COMPONENTS, |pixel, target| {
        let (red, green, blue) = ycbcr_to_rgb(pixel[0] as f64, pixel[1] as f64, pixel[2] as f64);
        target.copy_from_slice(&[
            to_u8_clamped(red),
            to_u8_clamped(green),
            to_u8_clamped(blue),
        ]);
    }))
}

/// Single channel luma normalized to `[0, 1]`.
pub fn convert_rgb_to_gray<T: Sample>(source: &PixelBuffer<u8>) -> PixelBuffer<T> {
    map_pixels(source, 1, |pixel, target| {
        let (red, green, blue) = match pixel {
            [red, green, blue, ..] => (*red, *green, *blue),
            [gray, ..] => (*gray, *gray, *gray),
            [] => (0, 0, 0),
        };
        target[0] = rgb_u8_to_gray(red, green, blue);
    })
}

/// Copy one channel into a new single channel buffer.
pub fn extract_component<T: Sample>(
    channel: usize,
    source: &PixelBuffer<T>,
) -> Option<PixelBuffer<T>> {
    if channel >= source.components() {
        log::debug!(
            "Channel {} not present in image with {} channels",
            channel,
            source.components()
        );
        return None;
    }
    Some(map_pixels(source, 1, |pixel, target| {
        target[0] = pixel[channel];
    }))
}
