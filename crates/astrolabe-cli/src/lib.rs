//! CLI logic for the Astrolabe diagram tool.
//!
//! The CLI renders a scene (a TOML file, or the built-in three-tier
//! architecture scene) to one or more raster images.

pub mod error_adapter;

mod args;
mod config;
mod scene_file;

pub use args::Args;
pub use scene_file::{load_scene, reference_scene};

use std::path::PathBuf;

use log::info;

use astrolabe::{AstrolabeError, DiagramRenderer, export::OutputTarget};

/// Outputs written when none are given on the command line.
pub const DEFAULT_OUTPUTS: [&str; 2] = [
    "lexical-rails-architecture.png",
    "lexical-rails-architecture.webp",
];

/// Run the Astrolabe CLI application
///
/// Loads the configuration and the scene, then renders the scene to every
/// requested output.
///
/// # Errors
///
/// Returns `AstrolabeError` for:
/// - Configuration or scene loading errors
/// - Unsupported output formats, before anything is rendered
/// - Unknown palette roles
/// - Per-output export failures
pub fn run(args: &Args) -> Result<Vec<PathBuf>, AstrolabeError> {
    let app_config = config::load_config(args.config.as_ref())?;
    let dpi = args.dpi.unwrap_or_else(|| app_config.export().dpi());

    let outputs = output_targets(&args.outputs, dpi)?;
    info!(outputs = outputs.len(), dpi = dpi; "Rendering diagram");

    let scene = match &args.scene {
        Some(path) => load_scene(path)?,
        None => reference_scene()?,
    };

    let renderer = DiagramRenderer::new(app_config);
    let written = renderer.render(&scene, &outputs)?;

    info!(files = written.len(); "Diagram exported successfully");
    Ok(written)
}

/// Outputs that were still written when `err` ended the run.
pub fn written_before_failure(err: &AstrolabeError) -> &[PathBuf] {
    match err {
        AstrolabeError::Export { written, .. } => written,
        _ => &[],
    }
}

fn output_targets(paths: &[String], dpi: f32) -> Result<Vec<OutputTarget>, AstrolabeError> {
    if paths.is_empty() {
        return DEFAULT_OUTPUTS
            .iter()
            .map(|path| OutputTarget::from_path(*path, dpi))
            .collect();
    }
    paths
        .iter()
        .map(|path| OutputTarget::from_path(path, dpi))
        .collect()
}

#[cfg(test)]
mod tests {
    use astrolabe::export::OutputFormat;

    use super::*;

    #[test]
    fn test_output_targets_default() {
        let targets = output_targets(&[], 300.0).unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].format(), OutputFormat::Png);
        assert_eq!(targets[1].format(), OutputFormat::WebP);
        assert_eq!(targets[1].dpi(), 300.0);
    }

    #[test]
    fn test_output_targets_rejects_unknown_extension() {
        let paths = vec!["a.png".to_string(), "b.bmp".to_string()];
        let err = output_targets(&paths, 300.0).unwrap_err();
        assert!(matches!(err, AstrolabeError::UnsupportedFormat(token) if token == "bmp"));
    }

    #[test]
    fn test_written_before_failure_only_for_exports() {
        let err = AstrolabeError::Export {
            written: vec![PathBuf::from("kept.png")],
            failures: Vec::new(),
        };
        assert_eq!(written_before_failure(&err), [PathBuf::from("kept.png")]);

        let err = AstrolabeError::Config("bad".to_string());
        assert!(written_before_failure(&err).is_empty());
    }
}
