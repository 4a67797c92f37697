//! Scene to SVG document rendering.
//!
//! Every paint is resolved against the palette before anything is drawn, so
//! an unknown role fails the render without producing partial output. The
//! elements are then drawn back to front: boxes, arrow lines, arrow labels,
//! and finally free text.

use log::{debug, warn};
use svg::Document;

use astrolabe_core::{
    color::Color,
    draw::{
        Arrow, ArrowDefinition, ArrowDrawer, Drawable, LayeredOutput, RenderLayer, RoundedBox,
        RoundedBoxDefinition, StrokeDefinition, Text, TextDefinition,
    },
    geometry::{Insets, Point, Size},
};

use crate::{
    canvas::Canvas,
    error::AstrolabeError,
    layout::{self, BoxTextLayout},
    palette::Palette,
    scene::{ArrowElement, BoxElement, FontSpec, Scene, TextElement},
};

/// Bullet prefix of box detail lines.
const DETAIL_BULLET: &str = "• ";

/// Backing padding as a multiple of the font size.
const BACKING_PADDING_RATIO: f32 = 0.3;

/// Width of a backing outline, in points.
const BACKING_BORDER_WIDTH: f32 = 1.0;

#[derive(Debug, Clone, Copy)]
struct BoxColors {
    fill: Color,
    border: Color,
    text: Option<Color>,
    title_backing: Option<Color>,
}

#[derive(Debug, Clone, Copy)]
struct TextColors {
    text: Color,
    backing: Option<Color>,
}

#[derive(Debug, Clone, Copy)]
struct ArrowColors {
    line: Color,
    backing: Color,
}

/// Scene with every paint resolved to a color.
#[derive(Debug)]
struct ResolvedScene<'a> {
    scene: &'a Scene,
    boxes: Vec<BoxColors>,
    arrows: Vec<ArrowColors>,
    texts: Vec<TextColors>,
}

impl<'a> ResolvedScene<'a> {
    fn resolve(scene: &'a Scene) -> Result<Self, AstrolabeError> {
        let palette: &Palette = &scene.palette;

        let boxes = scene
            .boxes
            .iter()
            .enumerate()
            .map(|(i, element)| -> Result<BoxColors, AstrolabeError> {
                let name = format!("box #{} ({:?})", i + 1, first_line(&element.title));
                Ok(BoxColors {
                    fill: palette.resolve(&element.fill, &name)?,
                    border: palette.resolve(&element.border, &name)?,
                    text: element
                        .text
                        .as_ref()
                        .map(|paint| palette.resolve(paint, &name))
                        .transpose()?,
                    title_backing: element
                        .title_backing
                        .as_ref()
                        .map(|paint| palette.resolve(paint, &name))
                        .transpose()?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let arrows = scene
            .arrows
            .iter()
            .enumerate()
            .map(|(i, element)| -> Result<ArrowColors, AstrolabeError> {
                let name = format!("arrow #{} ({:?})", i + 1, element.label);
                Ok(ArrowColors {
                    line: palette.resolve(&element.paint, &name)?,
                    backing: palette.resolve(&element.label_backing, &name)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let texts = scene
            .texts
            .iter()
            .enumerate()
            .map(|(i, element)| -> Result<TextColors, AstrolabeError> {
                let name = format!("text #{} ({:?})", i + 1, first_line(&element.text));
                Ok(TextColors {
                    text: palette.resolve(&element.paint, &name)?,
                    backing: element
                        .backing
                        .as_ref()
                        .map(|paint| palette.resolve(paint, &name))
                        .transpose()?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            scene,
            boxes,
            arrows,
            texts,
        })
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}

/// Draws a scene onto a [`Canvas`] and assembles the SVG document.
#[derive(Debug)]
pub(crate) struct SceneRenderer {
    canvas: Canvas,
    font_family: String,
    text_layout: BoxTextLayout,
    arrow_drawer: ArrowDrawer,
}

impl SceneRenderer {
    pub(crate) fn new(canvas: Canvas, font_family: &str) -> Self {
        Self {
            canvas,
            font_family: font_family.to_string(),
            text_layout: BoxTextLayout::default(),
            arrow_drawer: ArrowDrawer::new(),
        }
    }

    /// Renders `scene` to a document filled with `background`.
    pub(crate) fn render(
        mut self,
        scene: &Scene,
        background: Option<Color>,
    ) -> Result<Document, AstrolabeError> {
        let resolved = ResolvedScene::resolve(scene)?;
        debug!(
            boxes = scene.boxes.len(),
            arrows = scene.arrows.len(),
            texts = scene.texts.len();
            "Scene paints resolved"
        );

        let mut output = LayeredOutput::new();

        for (element, colors) in resolved.scene.boxes.iter().zip(&resolved.boxes) {
            output.merge(self.render_box(element, *colors));
        }
        for (index, (element, colors)) in resolved
            .scene
            .arrows
            .iter()
            .zip(&resolved.arrows)
            .enumerate()
        {
            output.merge(self.render_arrow(index, element, *colors));
        }
        for (element, colors) in resolved.scene.texts.iter().zip(&resolved.texts) {
            output.merge(self.render_text(element, *colors));
        }

        let mut doc = self.canvas.new_document(background);
        if !self.arrow_drawer.is_empty() {
            doc = doc.add(self.arrow_drawer.draw_marker_definitions());
        }
        for node in output.render() {
            doc = doc.add(node);
        }

        Ok(doc)
    }

    fn text_definition(&self, font: FontSpec, color: Option<Color>) -> TextDefinition {
        let mut definition = TextDefinition::new();
        definition.set_font_family(&self.font_family);
        definition.set_font_size(font.size);
        definition.set_font_weight(font.weight);
        definition.set_font_style(font.style);
        definition.set_color(color);
        definition
    }

    /// Puts a rounded `fill` patch behind the text, outlined in `edge` at the
    /// patch opacity.
    fn add_backing(definition: &mut TextDefinition, font: FontSpec, fill: Color, edge: Color) {
        definition.set_background_color(Some(fill));
        definition.set_background_stroke(Some(StrokeDefinition::new(
            edge.with_alpha(fill.alpha()),
            BACKING_BORDER_WIDTH,
        )));
        definition.set_padding(Insets::uniform(BACKING_PADDING_RATIO * font.size));
    }

    fn render_box(&self, element: &BoxElement, colors: BoxColors) -> LayeredOutput {
        let mut output = LayeredOutput::new();

        let definition = RoundedBoxDefinition::new(
            colors.fill,
            StrokeDefinition::new(colors.border, element.border_width),
            self.canvas.length(element.radius),
        );
        let outset = 2.0 * element.outset;
        let size = Size::new(element.width + outset, element.height + outset)
            .scale(self.canvas.length(1.0));
        let center = Point::new(element.center_x(), element.y + element.height / 2.0);
        output.merge(
            RoundedBox::new(&definition, size).render_to_layers(self.canvas.to_drawing(center)),
        );

        let mut title_def = self.text_definition(element.title_font, colors.text);
        if let Some(backing) = colors.title_backing {
            Self::add_backing(&mut title_def, element.title_font, backing, colors.border);
        }
        let title_anchor = self.text_layout.title_anchor(element);
        output.merge(
            Text::new(&title_def, &element.title)
                .with_layer(RenderLayer::Shape)
                .render_to_layers(self.canvas.to_drawing(title_anchor)),
        );

        let detail_def = self.text_definition(element.detail_font, colors.text);
        let anchors = self.text_layout.detail_anchors(element);
        for (detail, anchor) in element.details.iter().zip(anchors) {
            let line = format!("{DETAIL_BULLET}{detail}");
            output.merge(
                Text::new(&detail_def, &line)
                    .with_layer(RenderLayer::Shape)
                    .render_to_layers(self.canvas.to_drawing(anchor)),
            );
        }

        debug!(
            title = first_line(&element.title),
            details = element.details.len();
            "Box rendered"
        );
        output
    }

    fn render_arrow(
        &mut self,
        index: usize,
        element: &ArrowElement,
        colors: ArrowColors,
    ) -> LayeredOutput {
        let mut output = LayeredOutput::new();

        match layout::shrink_segment(
            element.start,
            element.end,
            element.shrink_start,
            element.shrink_end,
        ) {
            Some((start, end)) => {
                let definition =
                    ArrowDefinition::new(StrokeDefinition::new(colors.line, element.width));
                let arrow = Arrow::new(&definition, element.head);
                output.merge(self.arrow_drawer.draw_arrow(
                    &arrow,
                    self.canvas.to_drawing(start),
                    self.canvas.to_drawing(end),
                ));
            }
            None => warn!(
                arrow = index + 1,
                label = element.label.as_str();
                "Shrink margins consume the arrow, skipping its line"
            ),
        }

        if !element.label.is_empty() {
            let mut label_def = self.text_definition(element.label_font, Some(colors.line));
            Self::add_backing(&mut label_def, element.label_font, colors.backing, colors.line);

            output.merge(
                Text::new(&label_def, &element.label)
                    .with_layer(RenderLayer::Label)
                    .render_to_layers(self.canvas.to_drawing(element.label_position())),
            );
        }

        output
    }

    fn render_text(&self, element: &TextElement, colors: TextColors) -> LayeredOutput {
        let mut definition = self.text_definition(element.font, Some(colors.text));
        if let Some(backing) = colors.backing {
            Self::add_backing(&mut definition, element.font, backing, colors.text);
        }
        Text::new(&definition, &element.text)
            .with_layer(RenderLayer::Annotation)
            .render_to_layers(self.canvas.to_drawing(element.position))
    }
}

#[cfg(test)]
mod tests {
    use astrolabe_core::draw::ArrowDirection;

    use super::*;
    use crate::scene::{CanvasSpec, Paint, TitleAlign};

    fn render(scene: &Scene) -> Result<String, AstrolabeError> {
        let canvas = Canvas::new(scene.canvas, 0.2);
        SceneRenderer::new(canvas, "sans-serif")
            .render(scene, Some(Color::white()))
            .map(|doc| doc.to_string())
    }

    fn palette() -> Palette {
        [
            ("fill", Color::new("#E3F2FD").unwrap()),
            ("border", Color::new("#424242").unwrap()),
            ("arrow", Color::new("#2E7D32").unwrap()),
            ("text", Color::new("#212121").unwrap()),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_unknown_role_fails_before_drawing() {
        let mut scene = Scene::new(CanvasSpec::new(4.0, 4.0), palette());
        scene.add_text(TextElement::new(
            Point::new(2.0, 2.0),
            "Title",
            Paint::role("headline"),
        ));

        let err = render(&scene).unwrap_err();
        match err {
            AstrolabeError::UnknownRole { role, element } => {
                assert_eq!(role, "headline");
                assert!(element.starts_with("text #1"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_box_renders_bulleted_details_in_shape_layer() {
        let mut scene = Scene::new(CanvasSpec::new(16.0, 8.0), palette());
        scene.add_box(
            BoxElement::new(
                1.0,
                4.0,
                4.0,
                3.0,
                Paint::role("fill"),
                Paint::role("border"),
                "Backend\nProcessing",
            )
            .with_details(["Sidekiq Workers", "Database Storage"])
            .with_text(Paint::role("text")),
        );

        let svg = render(&scene).unwrap();
        assert!(svg.contains("data-layer=\"shape\""));
        assert!(svg.contains("• Sidekiq Workers"));
        assert!(svg.contains("• Database Storage"));
        assert!(svg.contains("Processing"));
        assert!(!svg.contains("<marker"));
    }

    #[test]
    fn test_title_and_text_backings() {
        let mut scene = Scene::new(CanvasSpec::new(10.0, 12.0), palette());
        scene
            .add_box(
                BoxElement::new(
                    4.0,
                    8.0,
                    2.5,
                    3.0,
                    Paint::role("fill"),
                    Paint::role("border"),
                    "Rails App\n(API Layer)",
                )
                .with_title_align(TitleAlign::Center)
                .with_title_backing(Paint::color(Color::white().with_alpha(0.8))),
            )
            .add_text(
                TextElement::new(Point::new(5.0, 11.5), "Lexical Rails", Paint::role("text"))
                    .with_backing(Paint::color(Color::white().with_alpha(0.8))),
            );

        let svg = render(&scene).unwrap();
        assert_eq!(svg.matches("fill-opacity=\"0.8\"").count(), 2);
        assert!(svg.contains("stroke=\"#424242\""));
        assert!(svg.contains("stroke=\"#212121\""));
    }

    #[test]
    fn test_unknown_backing_role_fails() {
        let mut scene = Scene::new(CanvasSpec::new(4.0, 4.0), palette());
        scene.add_text(
            TextElement::new(Point::new(2.0, 2.0), "Title", Paint::role("text"))
                .with_backing(Paint::role("halo")),
        );

        let err = render(&scene).unwrap_err();
        assert!(matches!(err, AstrolabeError::UnknownRole { ref role, .. } if role == "halo"));
    }

    #[test]
    fn test_degenerate_arrow_keeps_label() {
        let mut scene = Scene::new(CanvasSpec::new(4.0, 4.0), palette());
        scene.add_arrow(
            ArrowElement::new(
                Point::new(1.0, 1.0),
                Point::new(1.1, 1.0),
                "too short",
                Paint::role("arrow"),
            )
            .with_shrink(0.1),
        );

        let svg = render(&scene).unwrap();
        assert!(!svg.contains("data-layer=\"arrow\""));
        assert!(svg.contains("data-layer=\"label\""));
        assert!(svg.contains("too short"));
    }

    #[test]
    fn test_labels_drawn_above_all_arrow_lines() {
        let mut scene = Scene::new(CanvasSpec::new(16.0, 8.0), palette());
        for (y, label) in [(5.5, "first"), (4.5, "second")] {
            scene.add_arrow(
                ArrowElement::new(
                    Point::new(5.0, y),
                    Point::new(6.0, y),
                    label,
                    Paint::role("arrow"),
                )
                .with_width(2.5),
            );
        }

        let svg = render(&scene).unwrap();
        let arrow_layer = svg.find("data-layer=\"arrow\"").unwrap();
        let label_layer = svg.find("data-layer=\"label\"").unwrap();
        assert!(arrow_layer < label_layer);
        assert!(svg.contains("<marker"));
        assert_eq!(svg.matches("marker-end=").count(), 2);
    }

    #[test]
    fn test_bidirectional_arrow_uses_both_heads() {
        let mut scene = Scene::new(CanvasSpec::new(4.0, 4.0), palette());
        scene.add_arrow(
            ArrowElement::new(Point::new(1.0, 2.0), Point::new(3.0, 2.0), "", Paint::role("arrow"))
                .with_head(ArrowDirection::Bidirectional),
        );

        let svg = render(&scene).unwrap();
        assert!(svg.contains("marker-start="));
        assert!(svg.contains("marker-end="));
        assert!(!svg.contains("data-layer=\"label\""));
    }

    #[test]
    fn test_empty_scene_renders_background_only() {
        let scene = Scene::new(CanvasSpec::new(16.0, 8.0), Palette::new());
        let svg = render(&scene).unwrap();
        assert!(svg.contains("fill=\"#ffffff\""));
        assert!(!svg.contains("data-layer"));
    }
}
