//! Domain records shared by ingestion and question answering.
use serde::Serialize;

/// One PDF page with non-empty normalized text. Numbers start at 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub number: u32,
    pub text: String,
}

/// A window of a page's text, the unit of indexing and retrieval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub text: String,
    pub source_page: u32,
}

/// A chunk as written to the vector store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub id: String,
    pub text: String,
    pub page: u32,
}

/// A ranked similarity hit. `page` is `None` when the source is unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetrievalHit {
    pub text: String,
    pub page: Option<u32>,
}

impl RetrievalHit {
    pub fn new(text: impl Into<String>, page: Option<u32>) -> Self {
        Self {
            text: text.into(),
            page,
        }
    }
}
