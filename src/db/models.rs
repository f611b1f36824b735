use std::fmt;

use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct StoredChunk<'a> {
    pub key: &'a str,
    pub content: &'a str,
    pub page: Option<u32>,
}

#[derive(Debug)]
pub struct CollectionInfo {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub chunk_count: usize,
}

impl fmt::Display for CollectionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Collection: {} (id {})", self.name, self.id)?;
        writeln!(f, "Chunks:     {}", self.chunk_count)?;
        write!(
            f,
            "Created:    {}",
            self.created_at.format("%Y-%m-%d %H:%M:%S UTC")
        )
    }
}

#[derive(Debug)]
pub struct SearchResult {
    pub chunk_key: String,
    pub content: String,
    pub page: Option<u32>,
    pub similarity: f64,
}
