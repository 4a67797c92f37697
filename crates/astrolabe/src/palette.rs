//! Named color roles shared by every element of a scene.

use indexmap::IndexMap;
use serde::Deserialize;

use astrolabe_core::color::Color;

use crate::{error::AstrolabeError, scene::Paint};

/// An ordered mapping from role names to colors.
///
/// Roles keep their insertion order, so a palette loaded from a file lists
/// its roles in the order they were written.
///
/// # Example
///
/// ```
/// # use astrolabe::{Palette, color::Color};
/// let mut palette = Palette::new();
/// palette.insert("frontend", Color::new("#E3F2FD").unwrap());
///
/// assert!(palette.get("frontend").is_some());
/// assert!(palette.get("backend").is_none());
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Palette {
    roles: IndexMap<String, Color>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a role. Replacing keeps the role's original position.
    pub fn insert(&mut self, role: impl Into<String>, color: Color) {
        self.roles.insert(role.into(), color);
    }

    /// Returns the color of `role`, if defined.
    pub fn get(&self, role: &str) -> Option<Color> {
        self.roles.get(role).copied()
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Iterates over the roles in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Color)> {
        self.roles.iter().map(|(role, color)| (role.as_str(), *color))
    }

    /// Resolves a [`Paint`] to a concrete color.
    ///
    /// `element` names the scene element that uses the paint and is only used
    /// in the error message.
    ///
    /// # Errors
    ///
    /// Returns [`AstrolabeError::UnknownRole`] if the paint names a role that
    /// is not defined in this palette.
    pub fn resolve(&self, paint: &Paint, element: &str) -> Result<Color, AstrolabeError> {
        match paint {
            Paint::Literal { color } => Ok(*color),
            Paint::Role(role) => self.get(role).ok_or_else(|| AstrolabeError::UnknownRole {
                role: role.clone(),
                element: element.to_string(),
            }),
        }
    }
}

impl<S: Into<String>> FromIterator<(S, Color)> for Palette {
    fn from_iter<I: IntoIterator<Item = (S, Color)>>(iter: I) -> Self {
        Self {
            roles: iter
                .into_iter()
                .map(|(role, color)| (role.into(), color))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette() -> Palette {
        [
            ("frontend", Color::new("#E3F2FD").unwrap()),
            ("rails", Color::new("#FFF3E0").unwrap()),
            ("arrow", Color::new("#2E7D32").unwrap()),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_palette_preserves_insertion_order() {
        let palette = palette();
        let roles: Vec<&str> = palette.iter().map(|(role, _)| role).collect();
        assert_eq!(roles, vec!["frontend", "rails", "arrow"]);
    }

    #[test]
    fn test_palette_resolve_role_and_literal() {
        let palette = palette();

        let role = palette.resolve(&Paint::role("arrow"), "arrow #1").unwrap();
        assert_eq!(role.to_svg_value(), "#2e7d32");

        let literal = palette
            .resolve(&Paint::color(Color::new("red").unwrap()), "text #1")
            .unwrap();
        assert_eq!(literal.to_svg_value(), "#ff0000");
    }

    #[test]
    fn test_palette_resolve_unknown_role() {
        let err = palette()
            .resolve(&Paint::role("database"), "box #3")
            .unwrap_err();
        match err {
            AstrolabeError::UnknownRole { role, element } => {
                assert_eq!(role, "database");
                assert_eq!(element, "box #3");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
