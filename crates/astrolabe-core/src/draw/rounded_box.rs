//! Rounded rectangle drawable used for diagram boxes.

use svg::node::element as svg_element;

use crate::{
    color::Color,
    draw::{Drawable, LayeredOutput, RenderLayer, StrokeDefinition},
    geometry::{Point, Size},
};

/// Visual style of a rounded box: fill, border and corner radius.
///
/// The radius is in drawing-space units and is clamped to half of the shorter
/// side when rendered.
#[derive(Debug, Clone)]
pub struct RoundedBoxDefinition {
    fill: Color,
    stroke: StrokeDefinition,
    radius: f32,
}

impl RoundedBoxDefinition {
    pub fn new(fill: Color, stroke: StrokeDefinition, radius: f32) -> Self {
        Self {
            fill,
            stroke,
            radius,
        }
    }

    pub fn fill(&self) -> Color {
        self.fill
    }

    pub fn stroke(&self) -> &StrokeDefinition {
        &self.stroke
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Default for RoundedBoxDefinition {
    fn default() -> Self {
        Self {
            fill: Color::white(),
            stroke: StrokeDefinition::default(),
            radius: 0.0,
        }
    }
}

/// A rounded box of a fixed size, drawn on the [`RenderLayer::Shape`] layer.
#[derive(Debug, Clone)]
pub struct RoundedBox<'a> {
    definition: &'a RoundedBoxDefinition,
    size: Size,
}

impl<'a> RoundedBox<'a> {
    pub fn new(definition: &'a RoundedBoxDefinition, size: Size) -> Self {
        Self { definition, size }
    }

    fn effective_radius(&self) -> f32 {
        let limit = self.size.width().min(self.size.height()) / 2.0;
        self.definition.radius().clamp(0.0, limit.max(0.0))
    }
}

impl<'a> Drawable for RoundedBox<'a> {
    fn render_to_layers(&self, position: Point) -> LayeredOutput {
        let bounds = position.to_bounds(self.size);
        let radius = self.effective_radius();
        let fill = self.definition.fill();

        let rect = svg_element::Rectangle::new()
            .set("x", bounds.min_x())
            .set("y", bounds.min_y())
            .set("width", bounds.width())
            .set("height", bounds.height())
            .set("rx", radius)
            .set("ry", radius)
            .set("fill", fill.to_svg_value())
            .set("fill-opacity", fill.alpha());
        let rect = crate::apply_stroke!(rect, self.definition.stroke());

        let mut output = LayeredOutput::new();
        output.add_to_layer(RenderLayer::Shape, Box::new(rect));
        output
    }

    fn size(&self) -> Size {
        self.size
    }
}
