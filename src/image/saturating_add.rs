//! Per-channel saturating addition over a whole byte image.
//!
//! The vectorized adders process 16 bytes per step. The per-channel increments
//! are replicated into one 16 byte lane per phase, so chunk `n` always uses
//! lane `n % components` and lines up with the scalar result exactly. Bytes
//! left over after the last full chunk go through the scalar loop.

use clap::builder::PossibleValue;
use clap::ValueEnum;

use super::PixelBuffer;
use crate::error::Error;
use crate::Result;

pub const VECTOR_WIDTH: usize = 16;

/// Increments for each channel, replicated to vector width.
pub struct IncrementPattern {
    increments: Vec<u8>,
    lanes: Vec<[u8; VECTOR_WIDTH]>,
}

impl IncrementPattern {
    /// `None` for an empty increment list.
    pub fn new(increments: &[u8]) -> Option<Self> {
        if increments.is_empty() {
            return None;
        }
        let components = increments.len();
        let lanes = (0..components)
            .map(|phase| {
                let mut lane = [0_u8; VECTOR_WIDTH];
                for (offset, value) in lane.iter_mut().enumerate() {
                    *value = increments[(phase * VECTOR_WIDTH + offset) % components];
                }
                lane
            })
            .collect();
        Some(Self {
            increments: increments.to_vec(),
            lanes,
        })
    }

    pub fn increments(&self) -> &[u8] {
        &self.increments
    }

    /// lane to add to the chunk starting at byte `chunk_index * VECTOR_WIDTH`
    pub fn lane(&self, chunk_index: usize) -> &[u8; VECTOR_WIDTH] {
        &self.lanes[chunk_index % self.lanes.len()]
    }
}

pub trait SaturatingAdder {
    fn name(&self) -> &'static str;

    /// Add the pattern to `samples`, which start at channel 0 of a pixel.
    fn add(&self, samples: &mut [u8], pattern: &IncrementPattern);
}

/// Add the pattern to `samples`, which start `offset` bytes into the image.
fn add_scalar(samples: &mut [u8], pattern: &IncrementPattern, offset: usize) {
    let increments = pattern.increments();
    let phase = offset % increments.len();
    for (sample, &increment) in samples
        .iter_mut()
        .zip(increments.iter().cycle().skip(phase))
    {
        *sample = sample.saturating_add(increment);
    }
}

pub struct ScalarAdder;

impl SaturatingAdder for ScalarAdder {
    fn name(&self) -> &'static str {
        "scalar"
    }

    fn add(&self, samples: &mut [u8], pattern: &IncrementPattern) {
        add_scalar(samples, pattern, 0);
    }
}

#[cfg(target_arch = "x86_64")]
pub struct Sse2Adder {
    _detected: (),
}

#[cfg(target_arch = "x86_64")]
impl Sse2Adder {
    pub fn detect() -> Option<Self> {
        if is_x86_feature_detected!("sse2") {
            Some(Self { _detected: () })
        } else {
            None
        }
    }
}

#[cfg(target_arch = "x86_64")]
impl SaturatingAdder for Sse2Adder {
    fn name(&self) -> &'static str {
        "sse2"
    }

    fn add(&self, samples: &mut [u8], pattern: &IncrementPattern) {
        // Safety: an Sse2Adder only exists after sse2 was detected
        unsafe { add_sse2(samples, pattern) }
    }
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse2")]
unsafe fn add_sse2(samples: &mut [u8], pattern: &IncrementPattern) {
    use std::arch::x86_64::*;

    let vector_bytes = samples.len() / VECTOR_WIDTH * VECTOR_WIDTH;
    let (body, tail) = samples.split_at_mut(vector_bytes);
    for (chunk_index, chunk) in body.chunks_exact_mut(VECTOR_WIDTH).enumerate() {
        let increment = _mm_loadu_si128(pattern.lane(chunk_index).as_ptr() as *const __m128i);
        let values = _mm_loadu_si128(chunk.as_ptr() as *const __m128i);
        let sum = _mm_adds_epu8(values, increment);
        _mm_storeu_si128(chunk.as_mut_ptr() as *mut __m128i, sum);
    }
    add_scalar(tail, pattern, vector_bytes);
}

#[cfg(target_arch = "aarch64")]
pub struct NeonAdder {
    _detected: (),
}

#[cfg(target_arch = "aarch64")]
impl NeonAdder {
    pub fn detect() -> Option<Self> {
        if std::arch::is_aarch64_feature_detected!("neon") {
            Some(Self { _detected: () })
        } else {
            None
        }
    }
}

#[cfg(target_arch = "aarch64")]
impl SaturatingAdder for NeonAdder {
    fn name(&self) -> &'static str {
        "neon"
    }

    fn add(&self, samples: &mut [u8], pattern: &IncrementPattern) {
        // Safety: a NeonAdder only exists after neon was detected
        unsafe { add_neon(samples, pattern) }
    }
}

#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
unsafe fn add_neon(samples: &mut [u8], pattern: &IncrementPattern) {
    use std::arch::aarch64::*;

    let vector_bytes = samples.len() / VECTOR_WIDTH * VECTOR_WIDTH;
    let (body, tail) = samples.split_at_mut(vector_bytes);
    for (chunk_index, chunk) in body.chunks_exact_mut(VECTOR_WIDTH).enumerate() {
        let increment = vld1q_u8(pattern.lane(chunk_index).as_ptr());
        let values = vld1q_u8(chunk.as_ptr());
        vst1q_u8(chunk.as_mut_ptr(), vqaddq_u8(values, increment));
    }
    add_scalar(tail, pattern, vector_bytes);
}

/// The vectorized adder for this CPU, if there is one.
pub fn vector_adder() -> Option<Box<dyn SaturatingAdder>> {
    #[cfg(target_arch = "x86_64")]
    if let Some(adder) = Sse2Adder::detect() {
        return Some(Box::new(adder));
    }
    #[cfg(target_arch = "aarch64")]
    if let Some(adder) = NeonAdder::detect() {
        return Some(Box::new(adder));
    }
    None
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AddMethod {
    /// vectorized when available, scalar otherwise
    Auto,
    Scalar,
    Vectorized,
}

impl ValueEnum for AddMethod {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Auto, Self::Scalar, Self::Vectorized]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        match self {
            Self::Auto => Some(PossibleValue::new("Auto")),
            Self::Scalar => Some(PossibleValue::new("Scalar")),
            Self::Vectorized => Some(PossibleValue::new("Vectorized")),
        }
    }
}

pub fn select_adder(method: AddMethod) -> Box<dyn SaturatingAdder> {
    match method {
        AddMethod::Scalar => Box::new(ScalarAdder),
        AddMethod::Auto => vector_adder().unwrap_or_else(|| Box::new(ScalarAdder)),
        AddMethod::Vectorized => vector_adder().unwrap_or_else(|| {
            log::warn!("No vector instructions available, falling back to scalar addition");
            Box::new(ScalarAdder)
        }),
    }
}

/// Add `increments[c]` to every sample of channel `c`, saturating at 255.
pub fn add_channels_saturating(buffer: &mut PixelBuffer<u8>, increments: &[u8]) -> Result<()> {
    add_channels_saturating_with(AddMethod::Auto, buffer, increments)
}

pub fn add_channels_saturating_with(
    method: AddMethod,
    buffer: &mut PixelBuffer<u8>,
    increments: &[u8],
) -> Result<()> {
    if increments.len() != buffer.components() {
        return Err(Error::IncrementCountMismatch {
            components: buffer.components(),
            increments: increments.len(),
        });
    }
    let pattern = IncrementPattern::new(increments).ok_or(Error::IncrementCountMismatch {
        components: buffer.components(),
        increments: 0,
    })?;
    let adder = select_adder(method);
    log::debug!(
        "Adding {:?} to {} samples using the {} adder",
        increments,
        buffer.sample_count(),
        adder.name()
    );
    adder.add(buffer.samples_mut(), &pattern);
    Ok(())
}
