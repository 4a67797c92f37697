//! The drawing surface of a single render call.
//!
//! A [`Canvas`] converts scene coordinates (canvas units, origin bottom-left,
//! Y up) into drawing space (points, origin top-left, Y down) and produces
//! the SVG document every element is drawn into. Padding surrounds the
//! canvas on all sides; content outside the canvas is not clipped until the
//! padding runs out.

use svg::{Document, node::element as svg_element};

use astrolabe_core::{
    color::Color,
    geometry::{Point, Size},
};

use crate::scene::CanvasSpec;

/// Drawing-space points per canvas unit.
pub const POINTS_PER_UNIT: f32 = 72.0;

/// Fixed logical extent plus padding, immutable for one render call.
#[derive(Debug, Clone, Copy)]
pub struct Canvas {
    width: f32,
    height: f32,
    padding: f32,
}

impl Canvas {
    pub fn new(spec: CanvasSpec, padding: f32) -> Self {
        Self {
            width: spec.width,
            height: spec.height,
            padding,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn padding(&self) -> f32 {
        self.padding
    }

    /// Converts a scene point to drawing space.
    pub fn to_drawing(&self, point: Point) -> Point {
        Point::new(
            point.x() * POINTS_PER_UNIT,
            (self.height - point.y()) * POINTS_PER_UNIT,
        )
    }

    /// Converts a length in canvas units to points.
    pub fn length(&self, units: f32) -> f32 {
        units * POINTS_PER_UNIT
    }

    /// Size of the padded document in points.
    pub fn document_size(&self) -> Size {
        let pad = 2.0 * self.padding;
        Size::new(self.width + pad, self.height + pad).scale(POINTS_PER_UNIT)
    }

    /// Raster dimensions of the padded canvas at `dpi` dots per canvas unit.
    ///
    /// Each side is `round((extent + 2 * padding) * dpi)` pixels.
    pub fn pixel_size(&self, dpi: f32) -> (u32, u32) {
        let pad = 2.0 * self.padding;
        let width = ((self.width + pad) * dpi).round().max(0.0) as u32;
        let height = ((self.height + pad) * dpi).round().max(0.0) as u32;
        (width, height)
    }

    /// Creates an empty document covering the padded canvas.
    ///
    /// When `background` is set the whole document, padding included, is
    /// filled with it.
    pub fn new_document(&self, background: Option<Color>) -> Document {
        let size = self.document_size();
        let offset = -self.length(self.padding);

        let mut doc = Document::new()
            .set("viewBox", (offset, offset, size.width(), size.height()))
            .set("width", size.width())
            .set("height", size.height());

        if let Some(color) = background {
            doc = doc.add(
                svg_element::Rectangle::new()
                    .set("x", offset)
                    .set("y", offset)
                    .set("width", size.width())
                    .set("height", size.height())
                    .set("fill", color.to_svg_value())
                    .set("fill-opacity", color.alpha()),
            );
        }

        doc
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn canvas() -> Canvas {
        Canvas::new(CanvasSpec::new(16.0, 8.0), 0.2)
    }

    #[test]
    fn test_to_drawing_flips_y() {
        let canvas = canvas();

        let bottom_left = canvas.to_drawing(Point::new(0.0, 0.0));
        assert_approx_eq!(f32, bottom_left.x(), 0.0);
        assert_approx_eq!(f32, bottom_left.y(), 576.0);

        let top_right = canvas.to_drawing(Point::new(16.0, 8.0));
        assert_approx_eq!(f32, top_right.x(), 1152.0);
        assert_approx_eq!(f32, top_right.y(), 0.0);
    }

    #[test]
    fn test_document_size_includes_padding() {
        let size = canvas().document_size();
        assert_approx_eq!(f32, size.width(), 16.4 * 72.0, epsilon = 0.01);
        assert_approx_eq!(f32, size.height(), 8.4 * 72.0, epsilon = 0.01);
    }

    #[test]
    fn test_pixel_size() {
        let canvas = canvas();
        assert_eq!(canvas.pixel_size(300.0), (4920, 2520));
        assert_eq!(canvas.pixel_size(10.0), (164, 84));
    }

    #[test]
    fn test_new_document_background() {
        let canvas = canvas();
        let with_bg = canvas.new_document(Some(Color::white())).to_string();
        assert!(with_bg.contains("fill=\"#ffffff\""));

        let without_bg = canvas.new_document(None).to_string();
        assert!(!without_bg.contains("<rect"));
    }
}
