//! Declarative scene model.
//!
//! A [`Scene`] lists everything drawn on the canvas: boxes, arrows and free
//! text, in the order they are drawn. Positions and sizes are in canvas
//! units with the origin at the bottom-left corner. Font sizes and line
//! widths are in points.
//!
//! Scenes are built in code or deserialized from TOML:
//!
//! ```toml
//! [canvas]
//! width = 16.0
//! height = 8.0
//!
//! [palette]
//! frontend = "#E3F2FD"
//! border = "#424242"
//!
//! [[boxes]]
//! x = 1.0
//! y = 4.0
//! width = 4.0
//! height = 3.0
//! fill = "frontend"
//! border = "border"
//! title = "Frontend\nLexical Editor"
//! details = ["React Components"]
//!
//! [[arrows]]
//! start = [5.0, 5.5]
//! end = [6.0, 5.5]
//! label = "lexical_data (JSON)"
//! paint = { color = "#2E7D32" }
//! ```

use serde::Deserialize;

use astrolabe_core::{
    color::Color,
    draw::{ArrowDirection, FontStyle, FontWeight},
    geometry::Point,
};

use crate::palette::Palette;

/// A color reference: either a palette role or a literal color.
///
/// In TOML a role is a bare string (`"frontend"`) and a literal is a table
/// (`{ color = "#E3F2FD" }`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Paint {
    Role(String),
    Literal { color: Color },
}

impl Paint {
    /// Creates a paint that refers to a palette role.
    pub fn role(role: impl Into<String>) -> Self {
        Self::Role(role.into())
    }

    /// Creates a paint with a literal color.
    pub fn color(color: Color) -> Self {
        Self::Literal { color }
    }
}

/// Font size (points), weight and style of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct FontSpec {
    pub size: f32,
    #[serde(default)]
    pub weight: FontWeight,
    #[serde(default)]
    pub style: FontStyle,
}

impl FontSpec {
    pub fn new(size: f32) -> Self {
        Self {
            size,
            weight: FontWeight::Normal,
            style: FontStyle::Normal,
        }
    }

    pub fn bold(mut self) -> Self {
        self.weight = FontWeight::Bold;
        self
    }

    pub fn italic(mut self) -> Self {
        self.style = FontStyle::Italic;
        self
    }
}

/// Logical extent of the canvas, in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CanvasSpec {
    pub width: f32,
    pub height: f32,
}

impl CanvasSpec {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Vertical placement of a box title.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TitleAlign {
    /// Near the top edge, above the detail lines.
    #[default]
    Top,
    /// Centered in the box, for boxes that only carry a title.
    Center,
}

/// A rounded box with a title and a bullet list of detail lines.
///
/// `(x, y)` is the bottom-left corner. The title may span several lines.
/// Details are drawn top-down below the title; nothing checks that they fit.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BoxElement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub fill: Paint,
    pub border: Paint,
    /// Border width in points.
    #[serde(default = "BoxElement::default_border_width")]
    pub border_width: f32,
    /// Corner radius in canvas units.
    #[serde(default)]
    pub radius: f32,
    /// Distance the drawn outline extends beyond the nominal rectangle, in canvas units.
    #[serde(default)]
    pub outset: f32,
    pub title: String,
    #[serde(default)]
    pub title_align: TitleAlign,
    /// Fill of a rounded patch behind the title. No patch when unset.
    #[serde(default)]
    pub title_backing: Option<Paint>,
    #[serde(default)]
    pub details: Vec<String>,
    /// Color of the title and detail text. Black when unset.
    #[serde(default)]
    pub text: Option<Paint>,
    #[serde(default = "BoxElement::default_title_font")]
    pub title_font: FontSpec,
    #[serde(default = "BoxElement::default_detail_font")]
    pub detail_font: FontSpec,
}

impl BoxElement {
    pub fn new(
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Paint,
        border: Paint,
        title: impl Into<String>,
    ) -> Self {
        Self {
            x,
            y,
            width,
            height,
            fill,
            border,
            border_width: Self::default_border_width(),
            radius: 0.0,
            outset: 0.0,
            title: title.into(),
            title_align: TitleAlign::default(),
            title_backing: None,
            details: Vec::new(),
            text: None,
            title_font: Self::default_title_font(),
            detail_font: Self::default_detail_font(),
        }
    }

    pub fn with_details<I, S>(mut self, details: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.details = details.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_border_width(mut self, width: f32) -> Self {
        self.border_width = width;
        self
    }

    /// Sets both the corner radius and the outline outset.
    pub fn with_rounding(mut self, radius: f32, outset: f32) -> Self {
        self.radius = radius;
        self.outset = outset;
        self
    }

    pub fn with_text(mut self, paint: Paint) -> Self {
        self.text = Some(paint);
        self
    }

    pub fn with_title_align(mut self, align: TitleAlign) -> Self {
        self.title_align = align;
        self
    }

    pub fn with_title_backing(mut self, paint: Paint) -> Self {
        self.title_backing = Some(paint);
        self
    }

    /// Y coordinate of the top edge.
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// X coordinate of the horizontal center.
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    fn default_border_width() -> f32 {
        1.0
    }

    fn default_title_font() -> FontSpec {
        FontSpec::new(12.0).bold()
    }

    fn default_detail_font() -> FontSpec {
        FontSpec::new(9.0)
    }
}

/// A straight, labeled arrow between two points.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ArrowElement {
    pub start: Point,
    pub end: Point,
    #[serde(default)]
    pub label: String,
    /// Center of the label. The segment midpoint when unset.
    #[serde(default)]
    pub label_anchor: Option<Point>,
    pub paint: Paint,
    /// Line width in points.
    #[serde(default = "ArrowElement::default_width")]
    pub width: f32,
    /// Distance the start is moved toward the end, in canvas units.
    #[serde(default)]
    pub shrink_start: f32,
    /// Distance the end is moved toward the start, in canvas units.
    #[serde(default)]
    pub shrink_end: f32,
    #[serde(default)]
    pub head: ArrowDirection,
    #[serde(default = "ArrowElement::default_label_font")]
    pub label_font: FontSpec,
    #[serde(default = "ArrowElement::default_label_backing")]
    pub label_backing: Paint,
}

impl ArrowElement {
    pub fn new(start: Point, end: Point, label: impl Into<String>, paint: Paint) -> Self {
        Self {
            start,
            end,
            label: label.into(),
            label_anchor: None,
            paint,
            width: Self::default_width(),
            shrink_start: 0.0,
            shrink_end: 0.0,
            head: ArrowDirection::default(),
            label_font: Self::default_label_font(),
            label_backing: Self::default_label_backing(),
        }
    }

    pub fn with_label_anchor(mut self, anchor: Point) -> Self {
        self.label_anchor = Some(anchor);
        self
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    /// Sets the same shrink margin on both ends.
    pub fn with_shrink(mut self, margin: f32) -> Self {
        self.shrink_start = margin;
        self.shrink_end = margin;
        self
    }

    pub fn with_head(mut self, head: ArrowDirection) -> Self {
        self.head = head;
        self
    }

    /// Returns the label center: the explicit anchor or the segment midpoint.
    pub fn label_position(&self) -> Point {
        self.label_anchor
            .unwrap_or_else(|| self.start.midpoint(self.end))
    }

    fn default_width() -> f32 {
        1.0
    }

    fn default_label_font() -> FontSpec {
        FontSpec::new(10.0).bold()
    }

    fn default_label_backing() -> Paint {
        Paint::color(Color::white().with_alpha(0.9))
    }
}

/// Free-standing text centered on a position.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TextElement {
    pub position: Point,
    pub text: String,
    #[serde(default = "TextElement::default_font")]
    pub font: FontSpec,
    pub paint: Paint,
    /// Fill of a rounded patch behind the text. No patch when unset.
    #[serde(default)]
    pub backing: Option<Paint>,
}

impl TextElement {
    pub fn new(position: Point, text: impl Into<String>, paint: Paint) -> Self {
        Self {
            position,
            text: text.into(),
            font: Self::default_font(),
            paint,
            backing: None,
        }
    }

    pub fn with_font(mut self, font: FontSpec) -> Self {
        self.font = font;
        self
    }

    pub fn with_backing(mut self, paint: Paint) -> Self {
        self.backing = Some(paint);
        self
    }

    fn default_font() -> FontSpec {
        FontSpec::new(10.0)
    }
}

/// A complete diagram: canvas extent, palette and the elements to draw.
#[derive(Debug, Clone, Deserialize)]
pub struct Scene {
    pub canvas: CanvasSpec,
    #[serde(default)]
    pub palette: Palette,
    #[serde(default)]
    pub boxes: Vec<BoxElement>,
    #[serde(default)]
    pub arrows: Vec<ArrowElement>,
    #[serde(default)]
    pub texts: Vec<TextElement>,
}

impl Scene {
    /// Creates an empty scene.
    pub fn new(canvas: CanvasSpec, palette: Palette) -> Self {
        Self {
            canvas,
            palette,
            boxes: Vec::new(),
            arrows: Vec::new(),
            texts: Vec::new(),
        }
    }

    pub fn add_box(&mut self, element: BoxElement) -> &mut Self {
        self.boxes.push(element);
        self
    }

    pub fn add_arrow(&mut self, element: ArrowElement) -> &mut Self {
        self.arrows.push(element);
        self
    }

    pub fn add_text(&mut self, element: TextElement) -> &mut Self {
        self.texts.push(element);
        self
    }

    /// Returns `true` if the scene draws nothing.
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty() && self.arrows.is_empty() && self.texts.is_empty()
    }
}
