//! Error types for grammar loading.
//!
//! Covers every way a grammar source can fail: I/O, document syntax,
//! unknown file formats, and structural grammar problems.

use std::path::PathBuf;

use command_grammar_core::GrammarError;
use thiserror::Error;

/// Errors that can occur while loading a grammar.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Malformed XML.
    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// Well-formed XML that does not describe a grammar.
    #[error("XML grammar error at line {line}, column {column}: {message}")]
    XmlElement {
        line: u32,
        column: u32,
        message: String,
    },

    /// The document parsed but describes an invalid grammar.
    #[error("invalid grammar: {0}")]
    Grammar(#[from] GrammarError),

    /// The file extension does not name a supported format.
    #[error("unsupported grammar format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// All configured loader sources failed.
    #[error("no grammar sources available")]
    NoSourcesAvailable,
}

/// Convenience alias for results with [`LoadError`].
pub type Result<T> = std::result::Result<T, LoadError>;
