//! Error types for page generation.

use std::io;
use std::path::PathBuf;

/// Errors that abort a run.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("Template file not found: {}", .path.display())]
    TemplateNotFound { path: PathBuf },

    #[error("Failed to read template {}: {source}", .path.display())]
    TemplateRead { path: PathBuf, source: io::Error },

    #[error("Data file not found: {}", .path.display())]
    DataNotFound { path: PathBuf },

    #[error("Failed to read data file {}: {source}", .path.display())]
    DataRead { path: PathBuf, source: io::Error },

    #[error("Failed to parse data file {}: {message}", .path.display())]
    DataParse { path: PathBuf, message: String },

    #[error("Failed to create output directory {}: {source}", .path.display())]
    CreateOutputDir { path: PathBuf, source: io::Error },

    #[error("Failed to write sitemap {}: {source}", .path.display())]
    WriteSitemap { path: PathBuf, source: io::Error },
}

/// Errors confined to a single row. The run continues with the next row.
#[derive(Debug, thiserror::Error)]
pub enum RowError {
    #[error("missing 'file_name' column")]
    MissingFileName,

    #[error("empty 'file_name' value")]
    EmptyFileName,

    #[error("'{file_name}' was already generated by row {first_row}")]
    DuplicateFileName { file_name: String, first_row: usize },

    #[error("failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("malformed row: {message}")]
    Malformed { message: String },
}
