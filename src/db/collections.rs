use super::{Db, models::*, serialize_vector};
use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, Result, params};

impl Db {
    /// Number of chunks stored under `collection` (0 if it does not exist yet).
    pub fn count_chunks(&self, collection: &str) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            r#"
            SELECT COUNT(*)
            FROM chunks c
            JOIN collections k ON c.collection_id = k.id
            WHERE k.name = ?
            "#,
            params![collection],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Returns the collection row with its chunk count, if it was ever written.
    pub fn collection_info(&self, collection: &str) -> Result<Option<CollectionInfo>> {
        let row: Option<(i64, String, DateTime<Utc>)> = self
            .conn
            .query_row(
                "SELECT id, name, created_at FROM collections WHERE name = ?",
                params![collection],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        match row {
            Some((id, name, created_at)) => Ok(Some(CollectionInfo {
                id,
                chunk_count: self.count_chunks(&name)?,
                name,
                created_at,
            })),
            None => Ok(None),
        }
    }

    /// Writes chunks and their embeddings to `collection` in one transaction.
    ///
    /// The collection row is created on first write. A duplicate chunk key,
    /// or a chunk without exactly one embedding, fails the whole batch.
    pub fn insert_chunks(
        &mut self,
        collection: &str,
        chunks: &[StoredChunk<'_>],
        embeddings: &[Vec<f32>],
    ) -> Result<()> {
        if chunks.len() != embeddings.len() {
            return Err(rusqlite::Error::InvalidParameterCount(
                embeddings.len(),
                chunks.len(),
            ));
        }

        let tx = self.conn.transaction()?;

        let collection_id: i64 = tx.query_row(
            r#"
            INSERT INTO collections (name, created_at)
            VALUES (?, ?)
            ON CONFLICT(name) DO UPDATE SET name = excluded.name
            RETURNING id
            "#,
            params![collection, Utc::now()],
            |row| row.get(0),
        )?;

        for (chunk, embedding) in chunks.iter().zip(embeddings) {
            tx.execute(
                "INSERT INTO chunks (collection_id, chunk_key, content, page) VALUES (?, ?, ?, ?)",
                params![
                    collection_id,
                    chunk.key,
                    chunk.content,
                    chunk.page.map(i64::from)
                ],
            )?;
            let chunk_id = tx.last_insert_rowid();

            let vector_blob = serialize_vector(embedding);
            tx.execute(
                "INSERT INTO vec_chunks (rowid, embedding) VALUES (?, ?)",
                params![chunk_id, vector_blob],
            )?;
        }

        tx.commit()?;
        Ok(())
    }
}
