//! Placement rules for box text and arrow endpoints.
//!
//! All positions here are in scene coordinates (canvas units, Y up).

use astrolabe_core::geometry::Point;

use crate::scene::{BoxElement, TitleAlign};

/// Vertical placement of box text, as fractions of the box height measured
/// down from the top edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxTextLayout {
    /// Title anchor offset.
    pub title_offset: f32,
    /// Offset of the first detail line.
    pub detail_start: f32,
    /// Spacing between consecutive detail lines.
    pub detail_step: f32,
}

impl Default for BoxTextLayout {
    fn default() -> Self {
        Self {
            title_offset: 0.4 / 3.0,
            detail_start: 0.8 / 3.0,
            detail_step: 0.1,
        }
    }
}

impl BoxTextLayout {
    /// Center of the title.
    pub fn title_anchor(&self, element: &BoxElement) -> Point {
        let y = match element.title_align {
            TitleAlign::Top => element.top() - self.title_offset * element.height,
            TitleAlign::Center => element.y + element.height / 2.0,
        };
        Point::new(element.center_x(), y)
    }

    /// Centers of the detail lines, top-down in scene order.
    pub fn detail_anchors(&self, element: &BoxElement) -> Vec<Point> {
        (0..element.details.len())
            .map(|i| {
                let offset = self.detail_start + i as f32 * self.detail_step;
                Point::new(element.center_x(), element.top() - offset * element.height)
            })
            .collect()
    }
}

/// Moves both ends of a segment inward by their margins.
///
/// Returns `None` when the margins consume the whole segment, including a
/// zero-length segment.
pub fn shrink_segment(
    start: Point,
    end: Point,
    shrink_start: f32,
    shrink_end: f32,
) -> Option<(Point, Point)> {
    let length = start.distance(end);
    let shrink_start = shrink_start.max(0.0);
    let shrink_end = shrink_end.max(0.0);

    if length <= 0.0 || shrink_start + shrink_end >= length {
        return None;
    }

    Some((
        start.move_towards(end, shrink_start),
        end.move_towards(start, shrink_end),
    ))
}
