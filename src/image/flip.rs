use super::{PixelBuffer, Sample};

/// Mirror the rows of `buffer` in place and toggle its orientation flag.
///
/// Applying it twice restores the original buffer.
pub fn flip_vertically<T: Sample>(buffer: &mut PixelBuffer<T>) {
    let (width, height, components) = (buffer.width(), buffer.height(), buffer.components());
    flip_rows(width, height, components, buffer.samples_mut());
    let flipped = buffer.is_flipped();
    buffer.set_flipped(!flipped);
}

/// Swap row `j` with row `height - 1 - j` for the upper half of the rows.
///
/// Samples past `width * height * components` are left alone. A slice too
/// short for the shape is not touched at all.
pub fn flip_rows<T>(width: usize, height: usize, components: usize, samples: &mut [T]) {
    let Some(row_length) = width.checked_mul(components) else {
        return;
    };
    if row_length == 0 || height < 2 {
        return;
    }
    let image_length = match row_length.checked_mul(height) {
        Some(length) if length <= samples.len() => length,
        _ => {
            log::debug!(
                "Not flipping {} samples as {} rows of {}",
                samples.len(),
                height,
                row_length
            );
            return;
        }
    };
    let (upper, lower) = samples[..image_length].split_at_mut(row_length * (height / 2));
    // the middle row of an odd height stays where it is
    let lower_start = lower.len() - upper.len();
    let lower = &mut lower[lower_start..];
    for (top, bottom) in upper
        .chunks_exact_mut(row_length)
        .zip(lower.chunks_exact_mut(row_length).rev())
    {
        top.swap_with_slice(bottom);
    }
    log::trace!("Flipped {} rows of {} samples", height, row_length);
}
