//! Arrow drawable types and SVG marker generation.
//!
//! Arrows are straight segments with open arrowheads. Heads are SVG markers
//! that are shared between every arrow of the same color, so an
//! [`ArrowDrawer`] collects the colors while arrows are drawn and emits the
//! marker definitions once at the end.

use std::{collections::BTreeMap, fmt, str};

use serde::{Deserialize, Deserializer, de};
use svg::{self, node::element as svg_element};

use crate::{
    color::Color,
    draw::{LayeredOutput, RenderLayer, StrokeDefinition},
    geometry::Point,
};

/// Side length of the square marker viewBox.
const HEAD_VIEWBOX: f32 = 10.0;

/// Visual properties of an arrow: the stroke of its line and heads.
#[derive(Debug, Clone, Default)]
pub struct ArrowDefinition {
    stroke: StrokeDefinition,
}

impl ArrowDefinition {
    pub fn new(stroke: StrokeDefinition) -> Self {
        Self { stroke }
    }

    /// Gets the arrow stroke definition
    pub fn stroke(&self) -> &StrokeDefinition {
        &self.stroke
    }
}

/// Defines which ends of an arrow carry a head.
///
/// - `Forward`: `->` head at the destination
/// - `Backward`: `<-` head at the source
/// - `Bidirectional`: `<->` heads at both ends
/// - `Plain`: `-` no heads
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ArrowDirection {
    #[default]
    Forward, // ->
    Backward,      // <-
    Bidirectional, // <->
    Plain,         // -
}

impl ArrowDirection {
    fn to_str(self) -> &'static str {
        match self {
            Self::Forward => "->",
            Self::Backward => "<-",
            Self::Bidirectional => "<->",
            Self::Plain => "-",
        }
    }
}

impl str::FromStr for ArrowDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "->" => Ok(Self::Forward),
            "<-" => Ok(Self::Backward),
            "<->" => Ok(Self::Bidirectional),
            "-" => Ok(Self::Plain),
            _ => Err(format!(
                "invalid arrow head style `{s}`, valid values: ->, <-, <->, -"
            )),
        }
    }
}

impl fmt::Display for ArrowDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

impl<'de> Deserialize<'de> for ArrowDirection {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// A drawable arrow combining an [`ArrowDefinition`] with an [`ArrowDirection`].
#[derive(Debug, Clone)]
pub struct Arrow<'a> {
    definition: &'a ArrowDefinition,
    direction: ArrowDirection,
}

impl<'a> Arrow<'a> {
    pub fn new(definition: &'a ArrowDefinition, direction: ArrowDirection) -> Self {
        Self {
            definition,
            direction,
        }
    }

    fn render_to_svg(&self, source: Point, destination: Point) -> svg_element::Path {
        let color = self.definition.stroke().color();

        let path = svg_element::Path::new()
            .set("d", Self::create_path_data_from_points(source, destination))
            .set("fill", "none");
        let mut path = crate::apply_stroke!(path, self.definition.stroke());

        let (start_marker, end_marker) = Self::get_markers(self.direction, color);
        if let Some(marker) = start_marker {
            path = path.set("marker-start", marker);
        }
        if let Some(marker) = end_marker {
            path = path.set("marker-end", marker);
        }

        path
    }

    fn marker_start_id(color: Color) -> String {
        format!("arrow-start-{}", color.to_id_safe_string())
    }

    fn marker_end_id(color: Color) -> String {
        format!("arrow-end-{}", color.to_id_safe_string())
    }

    fn get_markers(direction: ArrowDirection, color: Color) -> (Option<String>, Option<String>) {
        let start = || format!("url(#{})", Self::marker_start_id(color));
        let end = || format!("url(#{})", Self::marker_end_id(color));
        match direction {
            ArrowDirection::Forward => (None, Some(end())),
            ArrowDirection::Backward => (Some(start()), None),
            ArrowDirection::Bidirectional => (Some(start()), Some(end())),
            ArrowDirection::Plain => (None, None),
        }
    }

    /// Create a path data string from two points
    pub fn create_path_data_from_points(start: Point, end: Point) -> String {
        format!("M {} {} L {} {}", start.x(), start.y(), end.x(), end.y())
    }

    /// Open chevron head. Sized in stroke widths so heavier arrows get larger heads.
    ///
    /// The reference point sits on the viewBox edge the tip points at, so the
    /// stroked tip ends exactly on the arrow endpoint.
    fn create_head(id: String, color: Color, path_data: &str, ref_x: f32) -> svg_element::Marker {
        svg_element::Marker::new()
            .set("id", id)
            .set("viewBox", format!("0 0 {HEAD_VIEWBOX} {HEAD_VIEWBOX}"))
            .set("refX", ref_x)
            .set("refY", 5)
            .set("markerUnits", "strokeWidth")
            .set("markerWidth", 4)
            .set("markerHeight", 4)
            .set("orient", "auto")
            .add(
                svg_element::Path::new()
                    .set("d", path_data)
                    .set("fill", "none")
                    .set("stroke", color.to_svg_value())
                    .set("stroke-opacity", color.alpha())
                    .set("stroke-width", 2.5)
                    .set("stroke-linecap", "round")
                    .set("stroke-linejoin", "round"),
            )
    }

    fn create_end_head(color: Color) -> svg_element::Marker {
        Self::create_head(Self::marker_end_id(color), color, "M 1 1 L 9 5 L 1 9", HEAD_VIEWBOX)
    }

    fn create_start_head(color: Color) -> svg_element::Marker {
        Self::create_head(Self::marker_start_id(color), color, "M 9 1 L 1 5 L 9 9", 0.0)
    }
}

/// Manages arrow rendering and SVG marker generation.
///
/// Marker colors are kept ordered by their id so the emitted definitions do
/// not depend on the order in which arrows were drawn.
#[derive(Debug, Default)]
pub struct ArrowDrawer {
    start_heads: BTreeMap<String, Color>,
    end_heads: BTreeMap<String, Color>,
}

impl ArrowDrawer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws an arrow line on the [`RenderLayer::Arrow`] layer and records
    /// the markers it references.
    pub fn draw_arrow(&mut self, arrow: &Arrow, source: Point, destination: Point) -> LayeredOutput {
        self.register_arrow_markers(arrow);

        let mut output = LayeredOutput::new();
        output.add_to_layer(
            RenderLayer::Arrow,
            Box::new(arrow.render_to_svg(source, destination)),
        );
        output
    }

    /// Returns `true` when no drawn arrow needs a head marker.
    pub fn is_empty(&self) -> bool {
        self.start_heads.is_empty() && self.end_heads.is_empty()
    }

    /// Generates SVG marker definitions for all collected colors
    pub fn draw_marker_definitions(&self) -> svg_element::Definitions {
        let mut defs = svg_element::Definitions::new();
        for color in self.start_heads.values() {
            defs = defs.add(Arrow::create_start_head(*color));
        }
        for color in self.end_heads.values() {
            defs = defs.add(Arrow::create_end_head(*color));
        }
        defs
    }

    fn register_arrow_markers(&mut self, arrow: &Arrow) {
        let color = arrow.definition.stroke().color();
        let direction = arrow.direction;
        if matches!(
            direction,
            ArrowDirection::Backward | ArrowDirection::Bidirectional
        ) {
            self.start_heads
                .insert(Arrow::marker_start_id(color), color);
        }
        if matches!(
            direction,
            ArrowDirection::Forward | ArrowDirection::Bidirectional
        ) {
            self.end_heads.insert(Arrow::marker_end_id(color), color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn green_definition() -> ArrowDefinition {
        ArrowDefinition::new(StrokeDefinition::new(Color::new("#2E7D32").unwrap(), 2.5))
    }

    #[test]
    fn test_arrow_direction_from_str_valid() {
        let forward: ArrowDirection = "->".parse().unwrap();
        assert_eq!(forward, ArrowDirection::Forward);

        let backward: ArrowDirection = "<-".parse().unwrap();
        assert_eq!(backward, ArrowDirection::Backward);

        let bidirectional: ArrowDirection = "<->".parse().unwrap();
        assert_eq!(bidirectional, ArrowDirection::Bidirectional);

        let plain: ArrowDirection = "-".parse().unwrap();
        assert_eq!(plain, ArrowDirection::Plain);
    }

    #[test]
    fn test_arrow_direction_from_str_invalid() {
        let result: Result<ArrowDirection, _> = ">>".parse();
        assert!(result.unwrap_err().contains("invalid arrow head style"));
    }

    #[test]
    fn test_arrow_direction_display() {
        assert_eq!(format!("{}", ArrowDirection::Forward), "->");
        assert_eq!(format!("{}", ArrowDirection::Backward), "<-");
        assert_eq!(format!("{}", ArrowDirection::Bidirectional), "<->");
        assert_eq!(format!("{}", ArrowDirection::Plain), "-");
    }

    #[test]
    fn test_create_path_data_from_points() {
        let path =
            Arrow::create_path_data_from_points(Point::new(10.0, 20.0), Point::new(100.0, 50.0));
        assert_eq!(path, "M 10 20 L 100 50");
    }

    #[test]
    fn test_draw_forward_arrow_references_end_marker() {
        let def = green_definition();
        let arrow = Arrow::new(&def, ArrowDirection::Forward);
        let mut drawer = ArrowDrawer::new();

        let output = drawer.draw_arrow(&arrow, Point::new(0.0, 0.0), Point::new(72.0, 0.0));
        assert_eq!(output.layer_len(RenderLayer::Arrow), 1);

        let rendered: String = output
            .render()
            .into_iter()
            .map(|node| node.to_string())
            .collect();
        assert!(rendered.contains("marker-end=\"url(#arrow-end-c2e7d32ff)\""));
        assert!(!rendered.contains("marker-start"));
    }

    #[test]
    fn test_marker_definitions_deduplicated_per_color() {
        let def = green_definition();
        let mut drawer = ArrowDrawer::new();
        assert!(drawer.is_empty());

        for _ in 0..3 {
            let arrow = Arrow::new(&def, ArrowDirection::Forward);
            drawer.draw_arrow(&arrow, Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        }
        let arrow = Arrow::new(&def, ArrowDirection::Bidirectional);
        drawer.draw_arrow(&arrow, Point::new(0.0, 0.0), Point::new(10.0, 0.0));

        let defs = drawer.draw_marker_definitions().to_string();
        assert_eq!(defs.matches("<marker").count(), 2);
        assert!(defs.contains("arrow-start-c2e7d32ff"));
        assert!(defs.contains("arrow-end-c2e7d32ff"));
    }

    #[test]
    fn test_plain_arrow_has_no_markers() {
        let def = green_definition();
        let arrow = Arrow::new(&def, ArrowDirection::Plain);
        let mut drawer = ArrowDrawer::new();
        drawer.draw_arrow(&arrow, Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        assert!(drawer.is_empty());
    }

    #[test]
    fn test_head_tips_end_on_the_endpoint() {
        let def = green_definition();
        let mut drawer = ArrowDrawer::new();
        let arrow = Arrow::new(&def, ArrowDirection::Bidirectional);
        drawer.draw_arrow(&arrow, Point::new(0.0, 0.0), Point::new(10.0, 0.0));

        let defs = drawer.draw_marker_definitions().to_string();
        let start = defs.find("id=\"arrow-start-").unwrap();
        let end = defs.find("id=\"arrow-end-").unwrap();
        let (start_marker, end_marker) = if start < end {
            (&defs[start..end], &defs[end..])
        } else {
            (&defs[start..], &defs[end..start])
        };

        assert!(start_marker.contains("refX=\"0\""));
        assert!(end_marker.contains("refX=\"10\""));
        assert!(end_marker.contains("viewBox=\"0 0 10 10\""));
    }
}
