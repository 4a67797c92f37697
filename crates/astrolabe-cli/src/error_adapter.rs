//! Error adapter for converting AstrolabeError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! # Multi-Error Support
//!
//! When an [`AstrolabeError::Export`] lists several failed outputs, each
//! failure is rendered independently so every path gets its own report.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use astrolabe::{AstrolabeError, ExportFailure};

/// Adapter for a single failed output.
pub struct FailureAdapter<'a>(pub &'a ExportFailure);

impl fmt::Debug for FailureAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for FailureAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for FailureAdapter<'_> {}

impl MietteDiagnostic for FailureAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("astrolabe::export"))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(
            "check that the output directory exists and is writable",
        ))
    }
}

/// Adapter for every other [`AstrolabeError`] variant.
pub struct ErrorAdapter<'a>(pub &'a AstrolabeError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            AstrolabeError::UnknownRole { .. } => "astrolabe::palette",
            AstrolabeError::UnsupportedFormat(_) => "astrolabe::format",
            AstrolabeError::Export { .. } => "astrolabe::export",
            AstrolabeError::Io(_) => "astrolabe::io",
            AstrolabeError::Render(_) => "astrolabe::render",
            AstrolabeError::Config(_) => "astrolabe::config",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            AstrolabeError::UnknownRole { .. } => {
                "define the role under [palette] or use a literal `{ color = \"...\" }`"
            }
            AstrolabeError::UnsupportedFormat(_) => "use a .png or .webp output path",
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// One failed output of an export.
    Failure(FailureAdapter<'a>),
    /// Any other error.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Failure(failure) => fmt::Display::fmt(failure, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Failure(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Failure(failure) => failure.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Failure(failure) => failure.help(),
            Reportable::Error(e) => e.help(),
        }
    }
}

/// Convert an [`AstrolabeError`] into a list of reportable errors.
///
/// For [`AstrolabeError::Export`], this returns one [`Reportable`] for
/// each failed output. For other error variants, this returns a single
/// [`Reportable`].
pub fn to_reportables(err: &AstrolabeError) -> Vec<Reportable<'_>> {
    match err {
        AstrolabeError::Export { failures, .. } if !failures.is_empty() => failures
            .iter()
            .map(|failure| Reportable::Failure(FailureAdapter(failure)))
            .collect(),
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}
