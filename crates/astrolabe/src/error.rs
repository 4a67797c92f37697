//! Error types for Astrolabe operations.
//!
//! This module provides the main error type [`AstrolabeError`] which wraps
//! the error conditions of resolving, rendering, and exporting a scene.

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::export;

/// The main error type for Astrolabe operations.
///
/// # Export Failures
///
/// The `Export` variant is returned when at least one output could not be
/// written. It lists the outputs that were written alongside one
/// [`ExportFailure`] per failed output, so callers can report each path.
#[derive(Debug, Error)]
pub enum AstrolabeError {
    #[error("unknown palette role `{role}` referenced by {element}")]
    UnknownRole { role: String, element: String },

    #[error("unsupported output format `{0}`, supported formats: png, webp")]
    UnsupportedFormat(String),

    #[error(
        "failed to write {} of {} outputs",
        .failures.len(),
        .failures.len() + .written.len()
    )]
    Export {
        written: Vec<PathBuf>,
        failures: Vec<ExportFailure>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// A single output that could not be written.
#[derive(Debug, Error)]
#[error("failed to write `{}`: {source}", .path.display())]
pub struct ExportFailure {
    path: PathBuf,
    #[source]
    source: export::Error,
}

impl ExportFailure {
    pub(crate) fn new(path: PathBuf, source: export::Error) -> Self {
        Self { path, source }
    }

    /// Returns the path of the failed output.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Returns the underlying export error.
    pub fn error(&self) -> &export::Error {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_error_message_counts_outputs() {
        let err = AstrolabeError::Export {
            written: vec![PathBuf::from("a.png")],
            failures: vec![ExportFailure::new(
                PathBuf::from("missing/b.webp"),
                export::Error::Io(io::Error::new(io::ErrorKind::NotFound, "no such directory")),
            )],
        };
        assert_eq!(err.to_string(), "failed to write 1 of 2 outputs");
    }

    #[test]
    fn test_unknown_role_message_names_role_and_element() {
        let err = AstrolabeError::UnknownRole {
            role: "frontent".to_string(),
            element: "box #1".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("frontent"));
        assert!(msg.contains("box #1"));
    }
}
