//! Astrolabe - Declarative box-and-arrow architecture diagrams.
//!
//! A [`Scene`] describes positioned boxes with titles and bullet details,
//! labeled arrows between them, and free text. [`DiagramRenderer`] draws the
//! scene once into an SVG document and rasterizes it to any number of PNG
//! or WebP files.
//!
//! # Example
//!
//! ```rust,no_run
//! use astrolabe::{
//!     ArrowElement, BoxElement, CanvasSpec, DiagramRenderer, Paint, Palette, Scene,
//!     color::Color, config::AppConfig, export::OutputTarget, geometry::Point,
//! };
//!
//! let mut palette = Palette::new();
//! palette.insert("box", Color::new("#E3F2FD").unwrap());
//! palette.insert("ink", Color::new("#424242").unwrap());
//!
//! let mut scene = Scene::new(CanvasSpec::new(10.0, 4.0), palette);
//! scene
//!     .add_box(BoxElement::new(1.0, 1.0, 3.0, 2.0, Paint::role("box"), Paint::role("ink"), "Client"))
//!     .add_box(BoxElement::new(6.0, 1.0, 3.0, 2.0, Paint::role("box"), Paint::role("ink"), "Server"))
//!     .add_arrow(ArrowElement::new(Point::new(4.0, 2.0), Point::new(6.0, 2.0), "request", Paint::role("ink")));
//!
//! let renderer = DiagramRenderer::new(AppConfig::default());
//! let outputs = [OutputTarget::from_path("diagram.png", 300.0).unwrap()];
//! let written = renderer.render(&scene, &outputs).expect("Failed to render");
//! ```

pub mod canvas;
pub mod config;
pub mod export;
pub mod layout;

mod error;
mod palette;
mod renderer;
mod scene;

pub use astrolabe_core::{color, draw, geometry};

pub use error::{AstrolabeError, ExportFailure};
pub use palette::Palette;
pub use scene::{
    ArrowElement, BoxElement, CanvasSpec, FontSpec, Paint, Scene, TextElement, TitleAlign,
};

use std::path::PathBuf;

use log::{debug, error, info, trace};

use canvas::Canvas;
use color::Color;
use config::AppConfig;
use export::{OutputTarget, raster};
use renderer::SceneRenderer;

/// Renders scenes to SVG and raster images.
///
/// # Examples
///
/// ```
/// use astrolabe::{CanvasSpec, DiagramRenderer, Palette, Scene, config::AppConfig};
///
/// let renderer = DiagramRenderer::new(AppConfig::default());
/// let scene = Scene::new(CanvasSpec::new(16.0, 8.0), Palette::new());
///
/// let svg = renderer.render_svg(&scene).expect("Failed to render");
/// assert!(svg.starts_with("<svg"));
/// ```
#[derive(Debug, Default)]
pub struct DiagramRenderer {
    config: AppConfig,
}

impl DiagramRenderer {
    /// Create a new renderer with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the renderer configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Render a scene to an SVG string.
    ///
    /// The document is sized in points (72 per canvas unit) and includes
    /// the configured padding.
    ///
    /// # Errors
    ///
    /// Returns [`AstrolabeError::UnknownRole`] if any element refers to a
    /// palette role that does not exist, and [`AstrolabeError::Config`] if
    /// the configured background color is invalid.
    pub fn render_svg(&self, scene: &Scene) -> Result<String, AstrolabeError> {
        info!(
            width = scene.canvas.width,
            height = scene.canvas.height;
            "Rendering scene"
        );

        let doc = SceneRenderer::new(self.canvas(scene), self.config.style().font_family())
            .render(scene, self.background()?)?;
        let svg = doc.to_string();

        debug!(bytes = svg.len(); "SVG rendered");
        trace!(svg = svg.as_str(); "Rendered SVG document");
        Ok(svg)
    }

    /// Render a scene and write it to every output.
    ///
    /// The scene is drawn once; each output is then rasterized at its own
    /// resolution and written independently. Returns the written paths in
    /// output order.
    ///
    /// # Errors
    ///
    /// Fails before writing anything if the scene cannot be rendered (see
    /// [`render_svg`](Self::render_svg)). If some outputs fail, the others
    /// are still written and [`AstrolabeError::Export`] lists both.
    pub fn render(
        &self,
        scene: &Scene,
        outputs: &[OutputTarget],
    ) -> Result<Vec<PathBuf>, AstrolabeError> {
        let svg = self.render_svg(scene)?;
        let tree = raster::parse_svg(&svg, self.config.style().font_family())?;

        let canvas = self.canvas(scene);
        let background = self.background()?;

        let mut written = Vec::with_capacity(outputs.len());
        let mut failures = Vec::new();

        for target in outputs {
            let (width, height) = canvas.pixel_size(target.dpi());
            let path = target.path();

            let result = raster::rasterize(&tree, width, height, background)
                .and_then(|pixmap| raster::write_image(&pixmap, target.format(), path));

            match result {
                Ok(()) => {
                    info!(
                        path:? = path,
                        format:% = target.format(),
                        width = width,
                        height = height;
                        "Output written"
                    );
                    written.push(path.to_path_buf());
                }
                Err(err) => {
                    error!(path:? = path, err:% = err; "Failed to write output");
                    failures.push(ExportFailure::new(path.to_path_buf(), err));
                }
            }
        }

        if failures.is_empty() {
            Ok(written)
        } else {
            Err(AstrolabeError::Export { written, failures })
        }
    }

    fn canvas(&self, scene: &Scene) -> Canvas {
        Canvas::new(scene.canvas, self.config.export().padding())
    }

    /// Opaque background color, or `None` when transparency is enabled.
    fn background(&self) -> Result<Option<Color>, AstrolabeError> {
        let style = self.config.style();
        if style.transparent_background() {
            return Ok(None);
        }
        style
            .background_color()
            .map(|color| Some(color.with_alpha(1.0)))
            .map_err(AstrolabeError::Config)
    }
}
