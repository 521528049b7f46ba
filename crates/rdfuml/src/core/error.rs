//! Core error types for RDF diagram extraction
//!
//! This module defines the error taxonomy shared by the store adapter,
//! the diagram model, and the renderers.

use thiserror::Error;

/// Core error types for diagram extraction and rendering
#[derive(Error, Debug)]
pub enum RdfUmlError {
    #[error("Unsupported input format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Diagram model is frozen: cannot {operation} after finalize")]
    FrozenModel { operation: String },

    #[error("Renderer invocation failed: {message}{}", diagnostics_suffix(.diagnostics))]
    RendererInvocation {
        message: String,
        diagnostics: String,
    },

    #[error("Unsupported output format: {extension}")]
    UnsupportedOutputFormat { extension: String },

    #[error("Load error: {message}")]
    LoadError { message: String },

    #[error("Query error: {message}")]
    QueryError { message: String },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

fn diagnostics_suffix(diagnostics: &str) -> String {
    if diagnostics.trim().is_empty() {
        String::new()
    } else {
        format!("\n{}", diagnostics.trim())
    }
}

impl RdfUmlError {
    /// Create a new unsupported format error
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// Create a new frozen model error for the attempted operation
    pub fn frozen_model(operation: impl Into<String>) -> Self {
        Self::FrozenModel {
            operation: operation.into(),
        }
    }

    /// Create a new renderer invocation error carrying the renderer's stderr
    pub fn renderer_invocation(message: impl Into<String>, diagnostics: impl Into<String>) -> Self {
        Self::RendererInvocation {
            message: message.into(),
            diagnostics: diagnostics.into(),
        }
    }

    /// Create a new unsupported output format error
    pub fn unsupported_output_format(extension: impl Into<String>) -> Self {
        Self::UnsupportedOutputFormat {
            extension: extension.into(),
        }
    }

    /// Create a new load error
    pub fn load_error(message: impl Into<String>) -> Self {
        Self::LoadError {
            message: message.into(),
        }
    }

    /// Create a new query error
    pub fn query_error(message: impl Into<String>) -> Self {
        Self::QueryError {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_format() {
        let error = RdfUmlError::unsupported_format(".xyz");
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Unsupported input format"));
        assert!(error_msg.contains(".xyz"));
    }

    #[test]
    fn test_frozen_model() {
        let error = RdfUmlError::frozen_model("add_edge");
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("frozen"));
        assert!(error_msg.contains("add_edge"));
    }

    #[test]
    fn test_renderer_invocation_with_diagnostics() {
        let error = RdfUmlError::renderer_invocation("dot exited with 1", "Error: syntax error in line 3\n");
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Renderer invocation failed"));
        assert!(error_msg.contains("dot exited with 1"));
        assert!(error_msg.ends_with("syntax error in line 3"));
    }

    #[test]
    fn test_renderer_invocation_without_diagnostics() {
        let error = RdfUmlError::renderer_invocation("dot not found", "  ");
        assert_eq!(format!("{}", error), "Renderer invocation failed: dot not found");
    }

    #[test]
    fn test_io_error_conversion() {
        use std::io;
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: RdfUmlError = io_err.into();
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("IO error"));
        assert!(error_msg.contains("File not found"));
    }
}
