//! Scene loading from TOML.

use std::{fs, io, path::Path};

use log::{debug, info};

use astrolabe::{AstrolabeError, Scene};

/// The three-tier architecture scene rendered when no scene file is given.
const REFERENCE_SCENE: &str = include_str!("../scenes/lexical_rails.toml");

/// Reads and parses a scene file.
///
/// # Errors
///
/// Returns [`AstrolabeError::Io`] naming the path if the file cannot be
/// read, and [`AstrolabeError::Config`] if it is not a valid scene.
pub fn load_scene(path: impl AsRef<Path>) -> Result<Scene, AstrolabeError> {
    let path = path.as_ref();
    info!(path = path.display().to_string(); "Loading scene file");

    let content = fs::read_to_string(path)
        .map_err(|err| io::Error::new(err.kind(), format!("{}: {err}", path.display())))?;
    parse_scene(&content)
        .map_err(|err| AstrolabeError::Config(format!("{}: {err}", path.display())))
}

/// Returns the built-in three-tier architecture scene.
pub fn reference_scene() -> Result<Scene, AstrolabeError> {
    debug!("Using built-in reference scene");
    parse_scene(REFERENCE_SCENE)
        .map_err(|err| AstrolabeError::Config(format!("built-in scene: {err}")))
}

fn parse_scene(content: &str) -> Result<Scene, toml::de::Error> {
    let scene: Scene = toml::from_str(content)?;
    debug!(
        boxes = scene.boxes.len(),
        arrows = scene.arrows.len(),
        texts = scene.texts.len(),
        roles = scene.palette.len();
        "Scene parsed"
    );
    Ok(scene)
}
