//! Text rendering definitions for diagram labels and content.
//!
//! This module provides types for configuring text appearance and rendering
//! text elements in diagrams. Text is rendered as SVG `<text>` elements,
//! centered on its anchor point, with an optional rounded backing patch.
//!
//! # Overview
//!
//! - [`TextDefinition`] - Reusable text style configuration
//! - [`Text`] - A renderable text element combining content with a [`TextDefinition`]
//!
//! # Quick Start
//!
//! ```
//! # use astrolabe_core::draw::{FontWeight, TextDefinition, Text};
//! let mut style = TextDefinition::new();
//! style.set_font_size(12.0);
//! style.set_font_weight(FontWeight::Bold);
//!
//! let text = Text::new(&style, "Frontend\nLexical Editor");
//! let size = text.calculate_size();
//! assert!(size.width() > 0.0);
//! ```
//!
//! Font sizes are in points, which is also the unit of drawing space.

use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, Style, Weight};
use log::info;
use serde::Deserialize;
use svg::{self, node::Text as SvgText, node::element as svg_element};

use crate::{
    color::Color,
    draw::{Drawable, LayeredOutput, RenderLayer, StrokeDefinition},
    geometry::{Insets, Point, Size},
};

/// Line height as a multiple of the font size.
const LINE_SPACING: f32 = 1.2;

/// Font weight of a text element.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

impl FontWeight {
    fn to_svg_value(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Bold => "bold",
        }
    }
}

/// Font style (slant) of a text element.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

impl FontStyle {
    fn to_svg_value(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Italic => "italic",
        }
    }
}

/// Defines the visual style for text elements in diagrams.
///
/// # Default Values
///
/// | Property | Default |
/// |----------|---------|
/// | Font family | `"sans-serif"` |
/// | Font size | `10` |
/// | Weight / style | normal / normal |
/// | Text color | `None` (SVG default, black) |
/// | Background | `None` |
/// | Padding | Zero on all sides |
#[derive(Debug, Clone)]
pub struct TextDefinition {
    font_family: String,
    font_size: f32,
    weight: FontWeight,
    style: FontStyle,
    color: Option<Color>,
    background_color: Option<Color>,
    background_stroke: Option<StrokeDefinition>,
    padding: Insets,
}

impl TextDefinition {
    /// Creates a new text definition with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the font size in points.
    pub fn set_font_size(&mut self, size: f32) {
        self.font_size = size;
    }

    /// Sets the font family (e.g., "DejaVu Sans", "sans-serif", "monospace").
    pub fn set_font_family(&mut self, family: &str) {
        self.font_family = family.to_string();
    }

    pub fn set_font_weight(&mut self, weight: FontWeight) {
        self.weight = weight;
    }

    pub fn set_font_style(&mut self, style: FontStyle) {
        self.style = style;
    }

    /// Sets the text color. `None` falls back to the SVG default (black).
    pub fn set_color(&mut self, color: Option<Color>) {
        self.color = color;
    }

    /// Sets the backing patch color.
    ///
    /// When set, the text is drawn over a rounded rectangle of this color whose
    /// corner radius matches the smallest padding inset.
    pub fn set_background_color(&mut self, color: Option<Color>) {
        self.background_color = color;
    }

    /// Sets the outline of the backing patch. Ignored without a background color.
    pub fn set_background_stroke(&mut self, stroke: Option<StrokeDefinition>) {
        self.background_stroke = stroke;
    }

    /// Sets the padding between the text and the backing patch edges.
    ///
    /// Padding is part of the measured size even when no background is set.
    pub fn set_padding(&mut self, padding: Insets) {
        self.padding = padding;
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_weight(&self) -> FontWeight {
        self.weight
    }

    pub fn font_style(&self) -> FontStyle {
        self.style
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    pub fn background_color(&self) -> Option<Color> {
        self.background_color
    }

    pub fn padding(&self) -> Insets {
        self.padding
    }

    fn line_height(&self) -> f32 {
        self.font_size * LINE_SPACING
    }
}

impl Default for TextDefinition {
    fn default() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            font_size: 10.0,
            weight: FontWeight::default(),
            style: FontStyle::default(),
            color: None,
            background_color: None,
            background_stroke: None,
            padding: Insets::default(),
        }
    }
}

/// A renderable text element combining content with styling.
///
/// Multi-line content (separated by `\n`) is rendered as stacked lines
/// centered on the anchor point.
///
/// # Examples
///
/// ```
/// # use astrolabe_core::draw::{RenderLayer, TextDefinition, Text};
/// let style = TextDefinition::new();
/// let text = Text::new(&style, "enqueue jobs").with_layer(RenderLayer::Label);
///
/// assert_eq!(text.content(), "enqueue jobs");
/// assert_eq!(text.layer(), RenderLayer::Label);
/// ```
#[derive(Debug, Clone)]
pub struct Text<'a> {
    definition: &'a TextDefinition,
    content: &'a str,
    layer: RenderLayer,
}

impl<'a> Text<'a> {
    /// Creates a new text element drawn on the [`RenderLayer::Annotation`] layer.
    pub fn new(definition: &'a TextDefinition, content: &'a str) -> Self {
        Self {
            definition,
            content,
            layer: RenderLayer::Annotation,
        }
    }

    /// Places the text (and its backing patch) on `layer`.
    pub fn with_layer(mut self, layer: RenderLayer) -> Self {
        self.layer = layer;
        self
    }

    /// Returns the text content of this element.
    pub fn content(&self) -> &str {
        self.content
    }

    /// Returns the layer the text is drawn on.
    pub fn layer(&self) -> RenderLayer {
        self.layer
    }

    /// Calculate the total size required to display this text, including padding.
    pub fn calculate_size(&self) -> Size {
        self.calculate_size_without_padding()
            .add_padding(self.definition.padding())
    }

    fn calculate_size_without_padding(&self) -> Size {
        TEXT_MANAGER
            .get_or_init(TextManager::new)
            .calculate_text_size(self.content, self.definition)
    }

    fn render_backing(&self, position: Point, color: Color) -> svg_element::Rectangle {
        let bounds = position.to_bounds(self.calculate_size());
        let padding = self.definition.padding();
        let radius = padding
            .top()
            .min(padding.right())
            .min(padding.bottom())
            .min(padding.left());

        let mut backing = svg_element::Rectangle::new()
            .set("x", bounds.min_x())
            .set("y", bounds.min_y())
            .set("width", bounds.width())
            .set("height", bounds.height())
            .set("rx", radius)
            .set("fill", color.to_svg_value())
            .set("fill-opacity", color.alpha());

        match &self.definition.background_stroke {
            Some(stroke) => backing = crate::apply_stroke!(backing, stroke),
            None => backing = backing.set("stroke", "none"),
        }

        backing
    }
}

impl<'a> Drawable for Text<'a> {
    fn render_to_layers(&self, position: Point) -> LayeredOutput {
        let mut output = LayeredOutput::new();

        if let Some(bg_color) = self.definition.background_color() {
            let backing = self.render_backing(position, bg_color);
            output.add_to_layer(self.layer, Box::new(backing));
        }

        let lines: Vec<&str> = self.content.lines().collect();
        let line_height = self.definition.line_height();
        let total_height = line_height * lines.len() as f32;
        let y_offset = -(total_height + line_height) / 2.0;

        let mut rendered_text = svg_element::Text::new("")
            .set("x", position.x())
            .set("y", position.y() + y_offset)
            .set("text-anchor", "middle")
            .set("dominant-baseline", "central")
            .set("font-family", self.definition.font_family())
            .set("font-size", self.definition.font_size())
            .set("font-weight", self.definition.font_weight().to_svg_value())
            .set("font-style", self.definition.font_style().to_svg_value());

        if let Some(color) = self.definition.color() {
            rendered_text = rendered_text
                .set("fill", color.to_svg_value())
                .set("fill-opacity", color.alpha());
        }

        for line in lines {
            let tspan = svg_element::TSpan::new("")
                .set("x", position.x())
                .set("dy", line_height)
                .add(SvgText::new(line));
            rendered_text = rendered_text.add(tspan);
        }

        output.add_to_layer(self.layer, Box::new(rendered_text));
        output
    }

    fn size(&self) -> Size {
        self.calculate_size()
    }
}

/// TextManager handles text measurement and font operations.
/// It keeps one FontSystem alive since building it scans the system fonts.
struct TextManager {
    font_system: Arc<Mutex<FontSystem>>,
}

impl TextManager {
    fn new() -> Self {
        info!("Initializing FontSystem");
        Self {
            font_system: Arc::new(Mutex::new(FontSystem::new())),
        }
    }

    /// Measure text in points using cosmic-text shaping.
    ///
    /// Every line contributes one line height, so the result stays consistent
    /// with how [`Text`] stacks its lines. Falls back to an average glyph
    /// width estimate when no font could shape the text.
    fn calculate_text_size(&self, text: &str, text_def: &TextDefinition) -> Size {
        if text.is_empty() {
            return Size::default();
        }

        let mut font_system = self
            .font_system
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let font_size = text_def.font_size();
        let line_height = text_def.line_height();
        let metrics = Metrics::new(font_size, line_height);

        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);

        let family = match text_def.font_family() {
            "sans-serif" => Family::SansSerif,
            "serif" => Family::Serif,
            "monospace" => Family::Monospace,
            name => Family::Name(name),
        };
        let weight = match text_def.font_weight() {
            FontWeight::Normal => Weight::NORMAL,
            FontWeight::Bold => Weight::BOLD,
        };
        let style = match text_def.font_style() {
            FontStyle::Normal => Style::Normal,
            FontStyle::Italic => Style::Italic,
        };
        let attrs = Attrs::new().family(family).weight(weight).style(style);

        buffer.set_size(None, None);
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let line_count = text.lines().count().max(1) as f32;
        let max_width = buffer
            .layout_runs()
            .filter_map(|run| run.glyphs.last().map(|last| last.x + last.w))
            .fold(0.0_f32, f32::max);

        let width = if max_width > 0.0 {
            max_width
        } else {
            let longest = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
            longest as f32 * font_size * 0.55
        };

        Size::new(width, line_height * line_count)
    }
}

static TEXT_MANAGER: OnceLock<TextManager> = OnceLock::new();

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_text_definition_defaults() {
        let def = TextDefinition::new();
        assert_approx_eq!(f32, def.font_size(), 10.0);
        assert_eq!(def.font_family(), "sans-serif");
        assert_eq!(def.font_weight(), FontWeight::Normal);
        assert_eq!(def.font_style(), FontStyle::Normal);
        assert!(def.color().is_none());
        assert!(def.background_color().is_none());
        assert_approx_eq!(f32, def.padding().horizontal_sum(), 0.0);
    }

    #[test]
    fn test_text_calculate_size_empty() {
        let def = TextDefinition::new();
        let size = Text::new(&def, "").calculate_size();
        assert_approx_eq!(f32, size.width(), 0.0);
        assert_approx_eq!(f32, size.height(), 0.0);
    }

    #[test]
    fn test_text_calculate_size_multiline() {
        let def = TextDefinition::new();
        let single = Text::new(&def, "Rails App").calculate_size();
        let multi = Text::new(&def, "Rails App\n(API Layer)").calculate_size();

        assert_approx_eq!(f32, single.height(), 12.0);
        assert_approx_eq!(f32, multi.height(), 24.0);
    }

    #[test]
    fn test_text_calculate_size_includes_padding() {
        let mut def = TextDefinition::new();
        let bare = Text::new(&def, "Test").calculate_size();

        def.set_padding(Insets::uniform(3.0));
        let padded = Text::new(&def, "Test").calculate_size();

        assert_approx_eq!(f32, padded.width() - bare.width(), 6.0, epsilon = 0.001);
        assert_approx_eq!(f32, padded.height() - bare.height(), 6.0, epsilon = 0.001);
    }

    #[test]
    fn test_text_larger_font_is_larger() {
        let mut small = TextDefinition::new();
        small.set_font_size(9.0);
        let mut large = TextDefinition::new();
        large.set_font_size(18.0);

        let small_size = Text::new(&small, "Sidekiq Workers").calculate_size();
        let large_size = Text::new(&large, "Sidekiq Workers").calculate_size();

        assert!(large_size.width() > small_size.width());
        assert!(large_size.height() > small_size.height());
    }

    #[test]
    fn test_text_render_without_background_single_node() {
        let def = TextDefinition::new();
        let output = Text::new(&def, "Hello").render_to_layers(Point::new(10.0, 10.0));
        assert_eq!(output.layer_len(RenderLayer::Annotation), 1);
    }

    #[test]
    fn test_text_render_with_background_uses_same_layer() {
        let mut def = TextDefinition::new();
        def.set_background_color(Some(Color::white().with_alpha(0.9)));
        def.set_padding(Insets::uniform(3.0));

        let output = Text::new(&def, "store results")
            .with_layer(RenderLayer::Label)
            .render_to_layers(Point::new(0.0, 0.0));

        assert_eq!(output.layer_len(RenderLayer::Label), 2);
        assert_eq!(output.layer_len(RenderLayer::Annotation), 0);
    }

    #[test]
    fn test_text_render_svg_attributes() {
        let mut def = TextDefinition::new();
        def.set_font_weight(FontWeight::Bold);
        def.set_font_style(FontStyle::Italic);
        def.set_color(Some(Color::new("#212121").unwrap()));

        let rendered: String = Text::new(&def, "Line 1\nLine 2")
            .render_to_layers(Point::new(50.0, 50.0))
            .render()
            .into_iter()
            .map(|node| node.to_string())
            .collect();

        assert!(rendered.contains("font-weight=\"bold\""));
        assert!(rendered.contains("font-style=\"italic\""));
        assert!(rendered.contains("fill=\"#212121\""));
        assert_eq!(rendered.matches("<tspan").count(), 2);
    }
}
