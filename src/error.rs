/// Error taxonomy for the ingestion and question-answering pipeline.
use std::path::PathBuf;

use thiserror::Error;

use crate::embedder::EmbedderError;

/// Failures raised by the vector store, during either `add_batch` or `query`.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbedderError),

    #[error("embedding count mismatch: {texts} texts, {vectors} vectors")]
    VectorCountMismatch { texts: usize, vectors: usize },
}

/// Top-level pipeline error.
#[derive(Error, Debug)]
pub enum RagError {
    #[error("source document not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("pdf extraction failed: {0}")]
    Pdf(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, RagError>;
