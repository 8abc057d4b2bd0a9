//! File I/O for graph sources and rendered options
//!
//! The pipeline itself is in-memory and infallible; only reading source files,
//! loading configuration and writing JSON output can fail, and they share one error
//! type.

use std::fs;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur around the pipeline
#[derive(Error, Debug)]
pub enum IoError {
    /// An I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration or input file could not be parsed
    #[error("parse error: {0}")]
    Parse(String),

    /// Output could not be serialized
    #[error("write error: {0}")]
    Write(String),
}

/// Result type for I/O operations
pub type IoResult<T> = Result<T, IoError>;

/// Read graph source text from a file
///
/// The content is returned as-is; an empty file is a valid (empty) source.
pub fn read_source(path: &Path) -> IoResult<String> {
    Ok(fs::read_to_string(path)?)
}

/// Serializes renderer options and summaries as JSON
#[derive(Debug, Clone, Copy)]
pub struct JsonWriter {
    pretty: bool,
}

impl JsonWriter {
    /// Indented output
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    /// Single-line output
    pub fn compact() -> Self {
        Self { pretty: false }
    }

    /// Serialize to a string
    pub fn render<T: Serialize>(&self, value: &T) -> IoResult<String> {
        let result = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        result.map_err(|e| IoError::Write(format!("JSON serialization failed: {}", e)))
    }

    /// Serialize to a file, creating parent directories
    pub fn write<T: Serialize>(&self, value: &T, output: &Path) -> IoResult<()> {
        let json = self.render(value)?;
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(output, json)?;
        Ok(())
    }
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::pretty()
    }
}
