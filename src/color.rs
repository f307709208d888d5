use crate::image::Sample;

const LUMA_RED_WEIGHT: f64 = 0.2126;
const LUMA_GREEN_WEIGHT: f64 = 0.7152;
const LUMA_BLUE_WEIGHT: f64 = 0.0722;

const CHROMA_OFFSET: f64 = 128.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RGBColorFormat<T> {
    pub red: T,
    pub green: T,
    pub blue: T,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct YCbCrColorFormat<T> {
    pub luma: T,
    pub chroma_blue: T,
    pub chroma_red: T,
}

impl<T> RGBColorFormat<T> {
    pub fn new(red: T, green: T, blue: T) -> Self {
        RGBColorFormat { red, green, blue }
    }
}

impl<T> YCbCrColorFormat<T> {
    pub fn new(luma: T, chroma_blue: T, chroma_red: T) -> Self {
        YCbCrColorFormat {
            luma,
            chroma_blue,
            chroma_red,
        }
    }
}

impl<T: Copy> From<[T; 3]> for RGBColorFormat<T> {
    fn from(value: [T; 3]) -> Self {
        RGBColorFormat::new(value[0], value[1], value[2])
    }
}

impl<T> From<RGBColorFormat<T>> for [T; 3] {
    fn from(value: RGBColorFormat<T>) -> Self {
        [value.red, value.green, value.blue]
    }
}

impl<T: Copy> From<[T; 3]> for YCbCrColorFormat<T> {
    fn from(value: [T; 3]) -> Self {
        YCbCrColorFormat::new(value[0], value[1], value[2])
    }
}

impl<T> From<YCbCrColorFormat<T>> for [T; 3] {
    fn from(value: YCbCrColorFormat<T>) -> Self {
        [value.luma, value.chroma_blue, value.chroma_red]
    }
}

impl<T: Sample> From<&RGBColorFormat<T>> for YCbCrColorFormat<T> {
    fn from(value: &RGBColorFormat<T>) -> Self {
        let (luma, chroma_blue, chroma_red) = rgb_to_ycbcr(value.red, value.green, value.blue);
        YCbCrColorFormat {
            luma,
            chroma_blue,
            chroma_red,
        }
    }
}

impl<T: Sample> From<RGBColorFormat<T>> for YCbCrColorFormat<T> {
    fn from(value: RGBColorFormat<T>) -> Self {
        YCbCrColorFormat::from(&value)
    }
}

impl<T: Sample> From<&YCbCrColorFormat<T>> for RGBColorFormat<T> {
    fn from(value: &YCbCrColorFormat<T>) -> Self {
        let (red, green, blue) = ycbcr_to_rgb(value.luma, value.chroma_blue, value.chroma_red);
        RGBColorFormat { red, green, blue }
    }
}

impl<T: Sample> From<YCbCrColorFormat<T>> for RGBColorFormat<T> {
    fn from(value: YCbCrColorFormat<T>) -> Self {
        RGBColorFormat::from(&value)
    }
}

/// BT.709 luma of an RGB triple, in the range of the inputs.
pub fn rgb_to_gray<T: Sample>(red: T, green: T, blue: T) -> T {
    T::from_f64(
        LUMA_RED_WEIGHT * red.to_f64()
            + LUMA_GREEN_WEIGHT * green.to_f64()
            + LUMA_BLUE_WEIGHT * blue.to_f64(),
    )
}

/// BT.709 luma of a byte triple, normalized to `[0, 1]`.
///
/// Only meaningful for floating point `T`.
pub fn rgb_u8_to_gray<T: Sample>(red: u8, green: u8, blue: u8) -> T {
    rgb_to_gray(
        T::from_f64(red as f64 / 255.0),
        T::from_f64(green as f64 / 255.0),
        T::from_f64(blue as f64 / 255.0),
    )
}

/// Full range BT.601 transform, chroma centered at 128.
pub fn rgb_to_ycbcr<T: Sample>(red: T, green: T, blue: T) -> (T, T, T) {
    let (r, g, b) = (red.to_f64(), green.to_f64(), blue.to_f64());
    let luma = 0.299 * r + 0.587 * g + 0.114 * b;
    let chroma_blue = CHROMA_OFFSET - 0.168736 * r - 0.331264 * g + 0.5 * b;
    let chroma_red = CHROMA_OFFSET + 0.5 * r - 0.418688 * g - 0.081312 * b;
    (
        T::from_f64(luma),
        T::from_f64(chroma_blue),
        T::from_f64(chroma_red),
    )
}

/// Inverse of [`rgb_to_ycbcr`]. The result is not clamped.
pub fn ycbcr_to_rgb<T: Sample>(luma: T, chroma_blue: T, chroma_red: T) -> (T, T, T) {
    let y = luma.to_f64();
    let cb = chroma_blue.to_f64() - CHROMA_OFFSET;
    let cr = chroma_red.to_f64() - CHROMA_OFFSET;
    let red = y + 1.402 * cr;
    let green = y - 0.344136 * cb - 0.714136 * cr;
    let blue = y + 1.772 * cb;
    (
        T::from_f64(red),
        T::from_f64(green),
        T::from_f64(blue),
    )
}

/// Clamp to `[0, 255]` and round half up.
pub fn to_u8_clamped(value: f64) -> u8 {
    if value < 0.0 {
        return 0;
    }
    if value > 255.0 {
        return 255;
    }
    (value + 0.5) as u8
}

#[cfg(test)]
mod test {
    use super::{
        rgb_to_gray, rgb_to_ycbcr, rgb_u8_to_gray, to_u8_clamped, ycbcr_to_rgb, RGBColorFormat,
        YCbCrColorFormat,
    };

    fn assert_close(actual: f64, expected: f64, what: &str) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "{} is wrong, was {}, expected {}",
            what,
            actual,
            expected
        );
    }

    #[test]
    fn gray_uses_bt709_weights() {
        assert_close(rgb_to_gray(1.0_f64, 0.5, 0.0), 0.5702, "gray");
        assert_close(rgb_to_gray(1.0_f64, 1.0, 1.0), 1.0, "white");
    }

    #[test]
    fn gray_from_bytes_is_normalized() {
        let gray: f64 = rgb_u8_to_gray(10, 20, 30);
        assert_close(gray, 0.072925490196, "gray");
        let white: f32 = rgb_u8_to_gray(255, 255, 255);
        assert!((white - 1.0).abs() < 1e-6, "white was {}", white);
    }

    #[test]
    fn convert_rgb_to_ycbcr() {
        let (luma, chroma_blue, chroma_red) = rgb_to_ycbcr(200.0_f64, 150.0, 100.0);
        assert_close(luma, 159.25, "luma");
        assert_close(chroma_blue, 94.5632, "chroma blue");
        assert_close(chroma_red, 157.0656, "chroma red");
    }

    #[test]
    fn convert_rgb_white_and_black_to_ycbcr() {
        let (luma, chroma_blue, chroma_red) = rgb_to_ycbcr(255.0_f64, 255.0, 255.0);
        assert_close(luma, 255.0, "luma");
        assert_close(chroma_blue, 128.0, "chroma blue");
        assert_close(chroma_red, 128.0, "chroma red");
        let (luma, chroma_blue, chroma_red) = rgb_to_ycbcr(0.0_f64, 0.0, 0.0);
        assert_eq!(luma, 0.0, "luma is wrong");
        assert_eq!(chroma_blue, 128.0, "chroma blue is wrong");
        assert_eq!(chroma_red, 128.0, "chroma red is wrong");
    }

    #[test]
    fn float_round_trip_is_exact() {
        for &(r, g, b) in &[(12.0_f64, 200.0, 77.0), (255.0, 0.0, 0.0), (0.0, 0.0, 255.0)] {
            let (y, cb, cr) = rgb_to_ycbcr(r, g, b);
            let (red, green, blue) = ycbcr_to_rgb(y, cb, cr);
            assert!((red - r).abs() < 1e-3, "red was {}", red);
            assert!((green - g).abs() < 1e-3, "green was {}", green);
            assert!((blue - b).abs() < 1e-3, "blue was {}", blue);
        }
    }

    #[test]
    fn quantized_round_trip_within_one() {
        let triples: [(u8, u8, u8); 6] = [
            (12, 200, 77),
            (128, 128, 128),
            (250, 10, 100),
            (64, 32, 16),
            (255, 255, 255),
            (0, 0, 0),
        ];
        for &(r, g, b) in &triples {
            let (y, cb, cr) = rgb_to_ycbcr(r as f64, g as f64, b as f64);
            let (y, cb, cr) = (to_u8_clamped(y), to_u8_clamped(cb), to_u8_clamped(cr));
            let (red, green, blue) = ycbcr_to_rgb(y as f64, cb as f64, cr as f64);
            let restored = [
                to_u8_clamped(red),
                to_u8_clamped(green),
                to_u8_clamped(blue),
            ];
            for (&actual, expected) in restored.iter().zip([r, g, b]) {
                assert!(
                    actual.abs_diff(expected) <= 1,
                    "({}, {}, {}) restored as {:?}",
                    r,
                    g,
                    b,
                    restored
                );
            }
        }
    }

    #[test]
    fn packed_inverse_reads_all_components() {
        let ycbcr = YCbCrColorFormat::from([130.0_f64, 98.0, 44.0]);
        let rgb: [f64; 3] = RGBColorFormat::from(ycbcr).into();
        let (red, green, blue) = ycbcr_to_rgb(130.0, 98.0, 44.0);
        assert_eq!(rgb, [red, green, blue]);
        assert_ne!(rgb[0], rgb[2]);
    }

    #[test]
    fn packed_forward_matches_scalar_form() {
        let rgb = RGBColorFormat::new(64.0_f32, 32.0, 16.0);
        let ycbcr = YCbCrColorFormat::from(&rgb);
        let (luma, chroma_blue, chroma_red) = rgb_to_ycbcr(64.0_f32, 32.0, 16.0);
        assert_eq!(ycbcr, YCbCrColorFormat::new(luma, chroma_blue, chroma_red));
    }

    #[test]
    fn clamp_rounds_half_up() {
        assert_eq!(to_u8_clamped(-0.1), 0);
        assert_eq!(to_u8_clamped(255.5), 255);
        assert_eq!(to_u8_clamped(84.5), 85);
        assert_eq!(to_u8_clamped(84.49), 84);
        assert_eq!(to_u8_clamped(254.7), 255);
    }
}
