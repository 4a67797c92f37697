//! Outline strokes for boxes, arrows and text backings.
//!
//! A [`StrokeDefinition`] is a color and a width in drawing-space units
//! (points). [`apply_stroke!`](crate::apply_stroke!) writes it onto any SVG
//! element that accepts stroke attributes.
//!
//! ```
//! use astrolabe_core::{color::Color, draw::StrokeDefinition};
//! use svg::node::element as svg_element;
//!
//! let stroke = StrokeDefinition::new(Color::new("#424242").unwrap(), 2.0);
//! let rect = astrolabe_core::apply_stroke!(svg_element::Rectangle::new(), &stroke);
//! assert!(rect.to_string().contains("stroke-width=\"2\""));
//! ```

use crate::color::Color;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeDefinition {
    color: Color,
    width: f32,
}

impl StrokeDefinition {
    pub fn new(color: Color, width: f32) -> Self {
        Self { color, width }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Width in points.
    pub fn width(&self) -> f32 {
        self.width
    }
}

impl Default for StrokeDefinition {
    fn default() -> Self {
        Self::new(Color::default(), 1.0)
    }
}

/// Sets `stroke`, `stroke-opacity` and `stroke-width` on an SVG element.
#[macro_export]
macro_rules! apply_stroke {
    ($element:expr, $stroke:expr) => {{
        let stroke: &$crate::draw::StrokeDefinition = $stroke;
        $element
            .set("stroke", stroke.color().to_svg_value())
            .set("stroke-opacity", stroke.color().alpha())
            .set("stroke-width", stroke.width())
    }};
}
