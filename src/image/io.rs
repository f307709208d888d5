//! Loading and saving byte images through the `image` crate.
//!
//! - `load`: decode any supported file into a `PixelBuffer<u8>`, keeping the
//!   channel count of the file.
//! - `save`: encode a buffer as PNG, BMP, TGA or JPEG, chosen by extension.
use std::borrow::Cow;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, ImageFormat};

use super::flip::{flip_rows, flip_vertically};
use super::PixelBuffer;
use crate::error::Error;
use crate::Result;

const JPEG_QUALITY: u8 = 100;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ImageFileFormat {
    Png,
    Bmp,
    Tga,
    Jpeg,
}

impl ImageFileFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .ok_or_else(|| Error::MissingFileExtension(path.display().to_string()))?
            .to_string_lossy()
            .to_lowercase();
        match extension.as_str() {
            "png" => Ok(Self::Png),
            "bmp" => Ok(Self::Bmp),
            "tga" => Ok(Self::Tga),
            "jpg" => Ok(Self::Jpeg),
            _ => Err(Error::UnsupportedFileType(format!(".{}", extension))),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Bmp => "bmp",
            Self::Tga => "tga",
            Self::Jpeg => "jpg",
        }
    }

    fn image_format(&self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Bmp => ImageFormat::Bmp,
            Self::Tga => ImageFormat::Tga,
            Self::Jpeg => ImageFormat::Jpeg,
        }
    }
}

fn color_type_of(components: usize) -> Option<ExtendedColorType> {
    match components {
        1 => Some(ExtendedColorType::L8),
        2 => Some(ExtendedColorType::La8),
        3 => Some(ExtendedColorType::Rgb8),
        4 => Some(ExtendedColorType::Rgba8),
        _ => None,
    }
}

fn into_raw_bytes(image: DynamicImage) -> (u32, u32, usize, Vec<u8>) {
    match image.color().channel_count() {
        1 => {
            let gray = image.into_luma8();
            (gray.width(), gray.height(), 1, gray.into_raw())
        }
        2 => {
            let gray_alpha = image.into_luma_alpha8();
            (gray_alpha.width(), gray_alpha.height(), 2, gray_alpha.into_raw())
        }
        3 => {
            let rgb = image.into_rgb8();
            (rgb.width(), rgb.height(), 3, rgb.into_raw())
        }
        _ => {
            let rgba = image.into_rgba8();
            (rgba.width(), rgba.height(), 4, rgba.into_raw())
        }
    }
}

/// Decode `path`. With `flip_vertical` the rows are mirrored and the buffer
/// remembers it, so that [`save`] writes them back in file order.
pub fn load(path: &Path, flip_vertical: bool) -> Result<PixelBuffer<u8>> {
    let image = image::open(path)
        .map_err(|e| Error::UnableToLoadImage(path.display().to_string(), e.to_string()))?;
    let (width, height, components, mut samples) = into_raw_bytes(image);
    let (width, height) = (width as usize, height as usize);
    if flip_vertical {
        flip_rows(width, height, components, &mut samples);
    }
    let mut buffer = PixelBuffer::from_samples(width, height, components, samples)
        .map_err(|e| Error::UnableToLoadImage(path.display().to_string(), e.to_string()))?;
    buffer.set_flipped(flip_vertical);
    log::info!(
        "Loaded {} ({}x{}, {} channels)",
        path.display(),
        width,
        height,
        components
    );
    Ok(buffer)
}

/// Encode `image` to `path`, the format follows the file extension.
pub fn save(image: Option<&PixelBuffer<u8>>, path: &Path) -> Result<()> {
    let image = image.ok_or(Error::MissingImage)?;
    let format = ImageFileFormat::from_path(path)?;
    let image = if image.is_flipped() {
        let mut unflipped = image.clone();
        flip_vertically(&mut unflipped);
        Cow::Owned(unflipped)
    } else {
        Cow::Borrowed(image)
    };
    match format {
        ImageFileFormat::Jpeg => write_jpeg(&image, path)?,
        _ => write_with_format(&image, path, format)?,
    }
    log::info!("Saved {} as {}", path.display(), format.name());
    Ok(())
}

fn write_with_format(image: &PixelBuffer<u8>, path: &Path, format: ImageFileFormat) -> Result<()> {
    let color_type = color_type_of(image.components()).ok_or_else(|| {
        Error::FailedToSaveImage(
            format.name(),
            format!("{} channels are not supported", image.components()),
        )
    })?;
    image::save_buffer_with_format(
        path,
        image.samples(),
        image.width() as u32,
        image.height() as u32,
        color_type,
        format.image_format(),
    )
    .map_err(|e| Error::FailedToSaveImage(format.name(), e.to_string()))
}

/// JPEG has no alpha, it is dropped before encoding.
fn write_jpeg(image: &PixelBuffer<u8>, path: &Path) -> Result<()> {
    let format = ImageFileFormat::Jpeg;
    let (color_type, kept_components) = match image.components() {
        1 | 2 => (ExtendedColorType::L8, 1),
        3 | 4 => (ExtendedColorType::Rgb8, 3),
        components => {
            return Err(Error::FailedToSaveImage(
                format.name(),
                format!("{} channels are not supported", components),
            ))
        }
    };
    let samples: Cow<[u8]> = if kept_components == image.components() {
        Cow::Borrowed(image.samples())
    } else {
        Cow::Owned(
            image
                .pixels()
                .flat_map(|pixel| pixel[..kept_components].iter().copied())
                .collect(),
        )
    };
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|e| Error::UnableToOpenOutputFileForWriting(path.display().to_string(), e))?;
    let mut writer = BufWriter::new(file);
    JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY)
        .encode(
            &samples,
            image.width() as u32,
            image.height() as u32,
            color_type,
        )
        .map_err(|e| Error::FailedToSaveImage(format.name(), e.to_string()))?;
    writer
        .flush()
        .map_err(|e| Error::FailedToSaveImage(format.name(), e.to_string()))
}

#[cfg(test)]
mod test {
    use std::path::Path;

    use super::{load, save, ImageFileFormat};
    use crate::error::Error;
    use crate::image::PixelBuffer;

    fn gradient_image(components: usize) -> PixelBuffer<u8> {
        let (width, height) = (6, 4);
        let samples = (0..width * height * components)
            .map(|i| (i * 11 % 256) as u8)
            .collect();
        PixelBuffer::from_samples(width, height, components, samples).unwrap()
    }

    #[test]
    fn format_follows_extension_case_insensitive() {
        let cases = [
            ("a.png", ImageFileFormat::Png),
            ("b.BMP", ImageFileFormat::Bmp),
            ("dir/c.Tga", ImageFileFormat::Tga),
            ("d.JPG", ImageFileFormat::Jpeg),
        ];
        for (path, expected) in cases {
            assert_eq!(ImageFileFormat::from_path(Path::new(path)).unwrap(), expected);
        }
    }

    #[test]
    fn unsupported_extension_is_reported() {
        match ImageFileFormat::from_path(Path::new("out.gif")) {
            Err(Error::UnsupportedFileType(extension)) => assert_eq!(extension, ".gif"),
            _ => panic!("gif must not be accepted"),
        }
        match ImageFileFormat::from_path(Path::new("output")) {
            Err(Error::MissingFileExtension(_)) => {}
            _ => panic!("missing extension must be reported"),
        }
    }

    #[test]
    fn missing_image_is_reported_first() {
        match save(None, Path::new("out.gif")) {
            Err(Error::MissingImage) => {}
            _ => panic!("missing image must be reported before the file type"),
        }
    }

    #[test]
    fn png_round_trip_keeps_samples() {
        let directory = tempfile::tempdir().unwrap();
        for components in 1..=4 {
            let path = directory.path().join(format!("image_{}.png", components));
            let image = gradient_image(components);
            save(Some(&image), &path).unwrap();
            let loaded = load(&path, false).unwrap();
            assert_eq!(loaded, image, "{} channel image differs", components);
        }
    }

    #[test]
    fn flipped_image_is_written_in_file_order() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("flipped.png");
        let image = gradient_image(3);
        save(Some(&image), &path).unwrap();

        let flipped = load(&path, true).unwrap();
        assert!(flipped.is_flipped());
        assert_eq!(flipped.row(0), image.row(3));

        let copy_path = directory.path().join("copy.png");
        save(Some(&flipped), &copy_path).unwrap();
        assert_eq!(load(&copy_path, false).unwrap(), image);
    }

    #[test]
    fn other_formats_are_written() {
        let directory = tempfile::tempdir().unwrap();
        let image = gradient_image(4);
        for name in ["out.bmp", "out.tga", "out.jpg"] {
            let path = directory.path().join(name);
            save(Some(&image), &path).unwrap();
            let loaded = load(&path, false).unwrap();
            assert_eq!(loaded.width(), image.width(), "{} width differs", name);
            assert_eq!(loaded.height(), image.height(), "{} height differs", name);
        }
    }

    #[test]
    fn unreadable_file_is_reported() {
        match load(Path::new("does/not/exist.png"), false) {
            Err(Error::UnableToLoadImage(path, _)) => assert!(path.ends_with("exist.png")),
            _ => panic!("missing input file must be reported"),
        }
    }
}
