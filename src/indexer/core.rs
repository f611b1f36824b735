use crate::error::StoreError;
use crate::indexer::chunker::Chunker;
use crate::models::{Chunk, IndexEntry, Page};
use crate::store::VectorStore;
use tracing::{info, warn};

/// Outcome of [`Indexer::ensure_indexed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexReport {
    /// The store was non-empty; nothing was written.
    AlreadyIndexed { existing: usize },
    /// The store was empty and `added` entries were written.
    Indexed { added: usize },
}

/// Loads a document's chunks into a vector store, at most once.
///
/// The guard is the store's entry count, not a content hash: pointing the
/// indexer at a different PDF while the store is populated leaves the old
/// index in place. Delete the database to rebuild.
pub struct Indexer<'a, S: VectorStore + ?Sized> {
    pub store: &'a mut S,
    pub chunker: Chunker,
}

impl<'a, S: VectorStore + ?Sized> Indexer<'a, S> {
    pub fn new(store: &'a mut S, chunker: Chunker) -> Self {
        Self { store, chunker }
    }

    /// Splits every page into windows in page order.
    pub fn chunk_pages(&self, pages: &[Page]) -> Vec<Chunk> {
        pages
            .iter()
            .flat_map(|page| {
                self.chunker.windows(&page.text).map(|text| Chunk {
                    text: text.to_string(),
                    source_page: page.number,
                })
            })
            .collect()
    }

    pub fn ensure_indexed(&mut self, pages: &[Page]) -> Result<IndexReport, StoreError> {
        let existing = self.store.count()?;
        if existing > 0 {
            info!("Collection already indexed ({existing} chunks), skipping");
            warn!("Index is trusted by count; delete the database if the source PDF changed");
            return Ok(IndexReport::AlreadyIndexed { existing });
        }

        info!(
            "Chunking {} pages (size={}, overlap={})",
            pages.len(),
            self.chunker.size(),
            self.chunker.overlap()
        );

        let entries: Vec<IndexEntry> = self
            .chunk_pages(pages)
            .into_iter()
            .enumerate()
            .map(|(i, chunk)| IndexEntry {
                id: format!("chunk_{}", i + 1),
                text: chunk.text,
                page: chunk.source_page,
            })
            .collect();

        if entries.is_empty() {
            warn!("No text to index ({} pages)", pages.len());
            return Ok(IndexReport::Indexed { added: 0 });
        }

        self.store.add_batch(&entries)?;
        info!(
            "Indexing complete: {} chunks from {} pages",
            entries.len(),
            pages.len()
        );

        Ok(IndexReport::Indexed {
            added: entries.len(),
        })
    }
}
