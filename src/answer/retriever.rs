use crate::error::StoreError;
use crate::models::RetrievalHit;
use crate::store::VectorStore;
use tracing::debug;

/// Similarity lookup against the indexed document.
pub struct Retriever<'a, S: VectorStore + ?Sized> {
    store: &'a S,
    top_k: usize,
}

impl<'a, S: VectorStore + ?Sized> Retriever<'a, S> {
    pub fn new(store: &'a S, top_k: usize) -> Self {
        Self { store, top_k }
    }

    /// Hits in the store's relevance order, most similar first.
    pub fn retrieve(&self, question: &str) -> Result<Vec<RetrievalHit>, StoreError> {
        let hits = self.store.query(question, self.top_k)?;
        debug!("Retrieved {} hits (top_k={})", hits.len(), self.top_k);
        Ok(hits)
    }
}
