//! Configuration types for Astrolabe diagram rendering.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! TOML file; every field is optional and falls back to its default.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining style and export settings.
//! - [`StyleConfig`] - Background color, font family and transparency.
//! - [`ExportConfig`] - Default resolution and padding of raster exports.
//!
//! # Example
//!
//! ```
//! # use astrolabe::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.style().background_color().is_ok());
//! assert_eq!(config.export().dpi(), 300.0);
//! ```

use serde::Deserialize;

use astrolabe_core::color::Color;

/// Top-level application configuration combining style and export settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,

    /// Export configuration section.
    #[serde(default)]
    export: ExportConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified style and export configurations.
    pub fn new(style: StyleConfig, export: ExportConfig) -> Self {
        Self { style, export }
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Returns the export configuration.
    pub fn export(&self) -> &ExportConfig {
        &self.export
    }
}

/// Visual styling configuration for rendered diagrams.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StyleConfig {
    /// Background color as a color string. White when unset.
    #[serde(default)]
    background_color: Option<String>,

    /// Font family used for every text element. `sans-serif` when unset.
    #[serde(default)]
    font_family: Option<String>,

    /// Leave the raster background transparent instead of filling it.
    #[serde(default)]
    transparent_background: bool,
}

impl StyleConfig {
    /// Sets the background color string.
    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }

    /// Sets the font family.
    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    /// Enables or disables the transparent background.
    pub fn with_transparent_background(mut self, transparent: bool) -> Self {
        self.transparent_background = transparent;
        self
    }

    /// Returns the parsed background [`Color`], white if none is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed
    /// into a valid [`Color`].
    pub fn background_color(&self) -> Result<Color, String> {
        match &self.background_color {
            Some(color) => Color::new(color)
                .map_err(|err| format!("Invalid background color in config: {err}")),
            None => Ok(Color::white()),
        }
    }

    /// Returns the configured font family.
    pub fn font_family(&self) -> &str {
        self.font_family.as_deref().unwrap_or("sans-serif")
    }

    /// Returns `true` if the raster background is left transparent.
    pub fn transparent_background(&self) -> bool {
        self.transparent_background
    }
}

/// Raster export configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Dots per canvas unit used when an output does not specify one.
    #[serde(default = "ExportConfig::default_dpi")]
    dpi: f32,

    /// Margin around the canvas, in canvas units.
    #[serde(default = "ExportConfig::default_padding")]
    padding: f32,
}

impl ExportConfig {
    /// Creates a new [`ExportConfig`].
    pub fn new(dpi: f32, padding: f32) -> Self {
        Self { dpi, padding }
    }

    /// Returns the default dots per canvas unit.
    pub fn dpi(&self) -> f32 {
        self.dpi
    }

    /// Returns the padding around the canvas, in canvas units.
    pub fn padding(&self) -> f32 {
        self.padding
    }

    fn default_dpi() -> f32 {
        300.0
    }

    fn default_padding() -> f32 {
        0.2
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dpi: Self::default_dpi(),
            padding: Self::default_padding(),
        }
    }
}
