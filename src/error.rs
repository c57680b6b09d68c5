//! Error types shared across the export pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by configuration loading, rendering and delivery.
///
/// Asset acquisition (logo fetch, chart capture) never reports through this
/// type; those operations degrade to `None` so the document still renders.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("invalid color literal: {0}")]
    InvalidColor(String),

    #[error("invalid branding config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("PDF rendering failed: {0}")]
    Render(#[from] genpdf::error::Error),

    #[error("failed to deliver {path}")]
    Delivery {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "bookmarks")]
    #[error("outline injection failed: {0}")]
    Outline(#[from] crate::bookmarks::OutlineError),
}

pub type Result<T> = std::result::Result<T, ExportError>;
