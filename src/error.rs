use std::fmt::Display;

#[derive(Debug)]
pub enum Error {
    InvalidDimensions {
        width: usize,
        height: usize,
        components: usize,
    },
    SampleCountMismatch {
        expected: usize,
        actual: usize,
    },
    IncrementCountMismatch {
        components: usize,
        increments: usize,
    },
    UnableToLoadImage(String, String),
    RgbaRequired(usize),
    MissingImage,
    MissingFileExtension(String),
    UnsupportedFileType(String),
    UnableToOpenOutputFileForWriting(String, std::io::Error),
    FailedToSaveImage(&'static str, String),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDimensions {
                width,
                height,
                components,
            } => {
                write!(
                    f,
                    "Invalid image shape {}x{}x{}. All dimensions must be positive.",
                    width, height, components
                )
            }
            Self::SampleCountMismatch { expected, actual } => {
                write!(
                    f,
                    "Number of samples does not match the shape. Expected {}, but got {}.",
                    expected, actual
                )
            }
            Self::IncrementCountMismatch {
                components,
                increments,
            } => {
                write!(
                    f,
                    "Expected one increment per channel ({}), but got {}",
                    components, increments
                )
            }
            Self::UnableToLoadImage(path, reason) => {
                write!(f, "Unable to load file '{}': {}", path, reason)
            }
            Self::RgbaRequired(components) => {
                write!(
                    f,
                    "This program only supports rgba mode, but the image has {} channels",
                    components
                )
            }
            Self::MissingImage => write!(f, "No image given to save"),
            Self::MissingFileExtension(path) => {
                write!(f, "Output file '{}' has no file extension", path)
            }
            Self::UnsupportedFileType(extension) => {
                write!(f, "Unsupported file type \"{}\"", extension)
            }
            Self::UnableToOpenOutputFileForWriting(path, error) => {
                write!(
                    f,
                    "Unable to open output file '{}' for writing: {}",
                    path, error
                )
            }
            Self::FailedToSaveImage(format, reason) => {
                write!(f, "Unable to save as {}: {}", format, reason)
            }
        }
    }
}

impl std::error::Error for Error {}
