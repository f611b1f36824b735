//! Vector store capability used by the indexer and the retriever.
use tracing::debug;

use crate::db::Db;
use crate::db::models::{CollectionInfo, StoredChunk};
use crate::embedder::Embedder;
use crate::error::StoreError;
use crate::models::{IndexEntry, RetrievalHit};

/// Store texts with page metadata; retrieve top-K by semantic similarity.
pub trait VectorStore {
    /// Number of entries currently held.
    fn count(&self) -> Result<usize, StoreError>;

    /// Embeds and writes every entry in a single batch.
    fn add_batch(&mut self, entries: &[IndexEntry]) -> Result<(), StoreError>;

    /// Most similar entries first.
    fn query(&self, text: &str, top_k: usize) -> Result<Vec<RetrievalHit>, StoreError>;
}

/// A named collection inside a sqlite-vec database, embedded with `E`.
pub struct SqliteStore<'a, E: Embedder + ?Sized> {
    db: &'a mut Db,
    embedder: &'a E,
    collection: String,
}

impl<'a, E: Embedder + ?Sized> SqliteStore<'a, E> {
    pub fn new(db: &'a mut Db, embedder: &'a E, collection: impl Into<String>) -> Self {
        Self {
            db,
            embedder,
            collection: collection.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn info(&self) -> Result<Option<CollectionInfo>, StoreError> {
        Ok(self.db.collection_info(&self.collection)?)
    }
}

impl<E: Embedder + ?Sized> VectorStore for SqliteStore<'_, E> {
    fn count(&self) -> Result<usize, StoreError> {
        Ok(self.db.count_chunks(&self.collection)?)
    }

    fn add_batch(&mut self, entries: &[IndexEntry]) -> Result<(), StoreError> {
        let texts: Vec<&str> = entries.iter().map(|e| e.text.as_str()).collect();
        let vectors = self.embedder.embed_batch(&texts)?;
        if vectors.len() != texts.len() {
            return Err(StoreError::VectorCountMismatch {
                texts: texts.len(),
                vectors: vectors.len(),
            });
        }

        let rows: Vec<StoredChunk> = entries
            .iter()
            .map(|e| StoredChunk {
                key: &e.id,
                content: &e.text,
                page: Some(e.page),
            })
            .collect();

        self.db.insert_chunks(&self.collection, &rows, &vectors)?;
        debug!("Wrote {} entries to {}", rows.len(), self.collection);
        Ok(())
    }

    fn query(&self, text: &str, top_k: usize) -> Result<Vec<RetrievalHit>, StoreError> {
        let query_vector = self.embedder.embed(text)?;
        let results = self.db.search(&self.collection, &query_vector, top_k)?;
        for r in &results {
            debug!("Hit {} (similarity {:.3})", r.chunk_key, r.similarity);
        }
        Ok(results
            .into_iter()
            .map(|r| RetrievalHit::new(r.content, r.page))
            .collect())
    }
}
