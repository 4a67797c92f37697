//! Drawable Components for Diagram Rendering
//!
//! This module provides drawable abstractions for the elements of a diagram:
//! rounded boxes, arrows, and text. Drawables emit SVG nodes into a
//! [`LayeredOutput`], which keeps the back-to-front order of the final
//! document independent of the order in which elements are visited.

mod arrow;
mod layer;
mod rounded_box;
mod stroke;
mod text;

pub use arrow::{Arrow, ArrowDefinition, ArrowDirection, ArrowDrawer};
pub use layer::{LayeredOutput, RenderLayer, SvgNode};
pub use rounded_box::{RoundedBox, RoundedBoxDefinition};
pub use stroke::StrokeDefinition;
pub use text::{FontStyle, FontWeight, Text, TextDefinition};

use crate::geometry::{Point, Size};

/// An element that can render itself at a position in drawing space.
pub trait Drawable: std::fmt::Debug {
    /// Renders the element with its center at `position`.
    fn render_to_layers(&self, position: Point) -> LayeredOutput;

    /// Returns the size the element occupies when rendered.
    fn size(&self) -> Size;
}
