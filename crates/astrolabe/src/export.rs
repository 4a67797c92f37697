//! Output targets and raster export.
//!
//! An [`OutputTarget`] names a file, its [`OutputFormat`] and the resolution
//! to rasterize at. The rendered document is parsed once and every target
//! is then rasterized and encoded on its own, so one failing path does not
//! stop the others.

pub mod raster;

use std::{
    fmt, io,
    path::{Path, PathBuf},
    str::FromStr,
};

use thiserror::Error;

use crate::error::AstrolabeError;

/// Failure of a single export.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Encoding error: {0}")]
    Encode(#[from] image::ImageError),

    #[error("cannot allocate a {width}x{height} pixel image")]
    Pixmap { width: u32, height: u32 },
}

/// Raster image format of an output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Lossless PNG.
    Png,
    /// Lossless WebP.
    WebP,
}

impl OutputFormat {
    /// Infers the format from the extension of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`AstrolabeError::UnsupportedFormat`] naming the extension, or
    /// the whole path when it has none.
    pub fn from_path(path: &Path) -> Result<Self, AstrolabeError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) => ext.parse(),
            None => Err(AstrolabeError::UnsupportedFormat(
                path.display().to_string(),
            )),
        }
    }

    /// Conventional file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::WebP => "webp",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = AstrolabeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "webp" => Ok(Self::WebP),
            _ => Err(AstrolabeError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A file to write, in a given format, at a given resolution.
///
/// `dpi` is dots per canvas unit, so a canvas of width `w` with padding `p`
/// becomes `round((w + 2p) * dpi)` pixels wide.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputTarget {
    path: PathBuf,
    format: OutputFormat,
    dpi: f32,
}

impl OutputTarget {
    pub fn new(path: impl Into<PathBuf>, format: OutputFormat, dpi: f32) -> Self {
        Self {
            path: path.into(),
            format,
            dpi,
        }
    }

    /// Creates a target whose format is inferred from the path extension.
    ///
    /// # Errors
    ///
    /// Returns [`AstrolabeError::UnsupportedFormat`] if the extension is not
    /// a supported format.
    ///
    /// # Examples
    ///
    /// ```
    /// # use astrolabe::export::{OutputFormat, OutputTarget};
    /// let target = OutputTarget::from_path("diagram.WEBP", 300.0).unwrap();
    /// assert_eq!(target.format(), OutputFormat::WebP);
    ///
    /// assert!(OutputTarget::from_path("diagram.gif", 300.0).is_err());
    /// ```
    pub fn from_path(path: impl Into<PathBuf>, dpi: f32) -> Result<Self, AstrolabeError> {
        let path = path.into();
        let format = OutputFormat::from_path(&path)?;
        Ok(Self { path, format, dpi })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn dpi(&self) -> f32 {
        self.dpi
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_case_insensitive() {
        assert_eq!("png".parse::<OutputFormat>().unwrap(), OutputFormat::Png);
        assert_eq!("PNG".parse::<OutputFormat>().unwrap(), OutputFormat::Png);
        assert_eq!("WebP".parse::<OutputFormat>().unwrap(), OutputFormat::WebP);
    }

    #[test]
    fn test_output_format_unsupported_names_token() {
        let err = "jpeg".parse::<OutputFormat>().unwrap_err();
        match err {
            AstrolabeError::UnsupportedFormat(token) => assert_eq!(token, "jpeg"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_output_format_from_path() {
        assert_eq!(
            OutputFormat::from_path(Path::new("out/diagram.png")).unwrap(),
            OutputFormat::Png
        );
        assert!(OutputFormat::from_path(Path::new("diagram")).is_err());
        assert!(OutputFormat::from_path(Path::new("diagram.svg")).is_err());
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Png.to_string(), "png");
        assert_eq!(OutputFormat::WebP.to_string(), "webp");
    }
}
