use std::{fmt, path::PathBuf};

/// The main error type for the exportkit crate
#[derive(Debug)]
pub enum ExportError {
    /// Error occurred while reading or decoding an image
    ImageDecode(image::ImageError),

    /// Error occurred while writing or encoding an image
    ImageEncode(image::ImageError),

    /// Error occurred during I/O operations (file read/write)
    Io(std::io::Error),

    /// Two images that must be compared pixel by pixel differ in size
    ShapeMismatch {
        expected: (u32, u32),
        found: (u32, u32),
    },

    /// No encoder is known for the extension of an output path
    UnsupportedFormat(PathBuf),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::ImageDecode(e) => write!(f, "Image decode error: {}", e),
            ExportError::ImageEncode(e) => write!(f, "Image encode error: {}", e),
            ExportError::Io(e) => write!(f, "I/O error: {}", e),
            ExportError::ShapeMismatch { expected, found } => write!(
                f,
                "Image shape mismatch: expected {}x{}, found {}x{}",
                expected.0, expected.1, found.0, found.1
            ),
            ExportError::UnsupportedFormat(path) => {
                write!(f, "Unsupported image format for {}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::ImageDecode(e) | ExportError::ImageEncode(e) => Some(e),
            ExportError::Io(e) => Some(e),
            ExportError::ShapeMismatch { .. } | ExportError::UnsupportedFormat(_) => None,
        }
    }
}

// From implementations for automatic conversion from common error types

impl From<image::ImageError> for ExportError {
    fn from(err: image::ImageError) -> Self {
        match &err {
            image::ImageError::Encoding(_) => ExportError::ImageEncode(err),
            _ => ExportError::ImageDecode(err),
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Io(err)
    }
}

pub type Result<T = ()> = std::result::Result<T, ExportError>;
