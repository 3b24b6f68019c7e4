//! Error types for the struk-core library.
//!
//! Parsing itself never fails: unresolved or malformed fields are simply
//! left out of the record. Errors only arise while building a parser from
//! user configuration or while reading/writing configuration files.

use thiserror::Error;

/// Main error type for the struk library.
#[derive(Error, Debug)]
pub enum StrukError {
    /// A configured pattern could not be compiled.
    #[error("invalid pattern for {name}: {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    /// Configuration is structurally valid JSON but semantically unusable.
    #[error("configuration error: {0}")]
    Config(String),

    /// Configuration file could not be decoded or encoded.
    #[error("configuration format error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the struk library.
pub type Result<T> = std::result::Result<T, StrukError>;
