use std::fmt::Debug;
use std::mem;

use crate::error::Error;
use crate::Result;

pub mod conversion;
pub mod flip;
pub mod io;
pub mod saturating_add;

/// A numeric sample type a [`PixelBuffer`] can hold.
///
/// Conversions through `f64` are lossy for integral types: values are
/// truncated towards zero and saturate at the type's bounds.
pub trait Sample: Copy + Debug + PartialEq + Default + 'static {
    const ZERO: Self;
    const ONE: Self;

    fn to_f64(self) -> f64;
    fn from_f64(value: f64) -> Self;
}

macro_rules! impl_sample {
    ($type:ty, $zero:expr, $one:expr) => {
        impl Sample for $type {
            const ZERO: Self = $zero;
            const ONE: Self = $one;

            fn to_f64(self) -> f64 {
                self as f64
            }

            fn from_f64(value: f64) -> Self {
                value as $type
            }
        }
    };
}

impl_sample!(u8, 0, 1);
impl_sample!(u16, 0, 1);
impl_sample!(f32, 0.0, 1.0);
impl_sample!(f64, 0.0, 1.0);

/// Owned image of `height` rows, each `width` pixels of `components` samples.
///
/// Samples are stored row-major with the channels of a pixel next to each
/// other. The shape never changes after construction.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer<T> {
    width: usize,
    height: usize,
    components: usize,
    flipped: bool,
    samples: Vec<T>,
}

impl<T: Sample> PixelBuffer<T> {
    pub fn new(width: usize, height: usize, components: usize) -> Result<Self> {
        Self::filled(width, height, components, T::ZERO)
    }

    pub fn filled(width: usize, height: usize, components: usize, value: T) -> Result<Self> {
        let sample_count = check_dimensions::<T>(width, height, components)?;
        Ok(Self {
            width,
            height,
            components,
            flipped: false,
            samples: vec![value; sample_count],
        })
    }

    /// Wrap an already decoded sample vector.
    pub fn from_samples(
        width: usize,
        height: usize,
        components: usize,
        samples: Vec<T>,
    ) -> Result<Self> {
        let expected = check_dimensions::<T>(width, height, components)?;
        if samples.len() != expected {
            return Err(Error::SampleCountMismatch {
                expected,
                actual: samples.len(),
            });
        }
        Ok(Self {
            width,
            height,
            components,
            flipped: false,
            samples,
        })
    }

    /// Same dimensions as `self`, filled with `value` and not flipped.
    pub fn filled_like(&self, value: T) -> Self {
        Self {
            width: self.width,
            height: self.height,
            components: self.components,
            flipped: false,
            samples: vec![value; self.sample_count()],
        }
    }

    pub fn zeros_like(&self) -> Self {
        self.filled_like(T::ZERO)
    }

    pub fn ones_like(&self) -> Self {
        self.filled_like(T::ONE)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn components(&self) -> usize {
        self.components
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    pub fn sample_count(&self) -> usize {
        self.pixel_count() * self.components
    }

    pub fn byte_size(&self) -> usize {
        self.sample_count() * mem::size_of::<T>()
    }

    /// number of bytes in one row
    pub fn row_stride(&self) -> usize {
        self.width * self.components * mem::size_of::<T>()
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn set_flipped(&mut self, flipped: bool) {
        self.flipped = flipped;
    }

    pub fn is_same_shape(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.components == other.components
            && self.flipped == other.flipped
    }

    /// Read a sample; anything outside the image reads as zero.
    pub fn get(&self, x: usize, y: usize, c: usize) -> T {
        match self.index_of(x, y, c) {
            Some(index) => self.samples[index],
            None => T::ZERO,
        }
    }

    /// Write a sample; writes outside the image are ignored.
    pub fn set(&mut self, x: usize, y: usize, c: usize, value: T) {
        if let Some(index) = self.index_of(x, y, c) {
            self.samples[index] = value;
        }
    }

    /// Overwrite all samples with the ones of `source`.
    ///
    /// Returns `false` and leaves `self` untouched unless both buffers have
    /// the same shape.
    pub fn copy_from(&mut self, source: &Self) -> bool {
        if !self.is_same_shape(source) {
            log::debug!(
                "Refusing copy from {}x{}x{} into {}x{}x{}",
                source.width,
                source.height,
                source.components,
                self.width,
                self.height,
                self.components
            );
            return false;
        }
        self.samples.copy_from_slice(&source.samples);
        true
    }

    pub fn row(&self, y: usize) -> Option<&[T]> {
        if y >= self.height {
            return None;
        }
        let row_length = self.width * self.components;
        let start = y * row_length;
        Some(&self.samples[start..start + row_length])
    }

    /// Iterate over the samples of each pixel.
    pub fn pixels(&self) -> std::slice::ChunksExact<'_, T> {
        self.samples.chunks_exact(self.components)
    }

    pub fn samples(&self) -> &[T] {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut [T] {
        &mut self.samples
    }

    pub fn into_samples(self) -> Vec<T> {
        self.samples
    }

    fn index_of(&self, x: usize, y: usize, c: usize) -> Option<usize> {
        if x >= self.width || y >= self.height || c >= self.components {
            return None;
        }
        Some((y * self.width + x) * self.components + c)
    }
}

pub fn copy_into<T: Sample>(destination: &mut PixelBuffer<T>, source: &PixelBuffer<T>) -> bool {
    destination.copy_from(source)
}

/// Number of samples of a valid shape.
///
/// Every dimension must be positive and the samples must fit into a single
/// allocation.
fn check_dimensions<T>(width: usize, height: usize, components: usize) -> Result<usize> {
    let invalid = || Error::InvalidDimensions {
        width,
        height,
        components,
    };
    if width == 0 || height == 0 || components == 0 {
        return Err(invalid());
    }
    let sample_count = width
        .checked_mul(height)
        .and_then(|pixels| pixels.checked_mul(components))
        .ok_or_else(invalid)?;
    match sample_count.checked_mul(mem::size_of::<T>()) {
        Some(bytes) if bytes <= isize::MAX as usize => Ok(sample_count),
        _ => Err(invalid()),
    }
}
