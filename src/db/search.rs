use super::{Db, models::SearchResult, serialize_vector};
use rusqlite::{Result, params};

fn map_search_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SearchResult> {
    let distance: f64 = row.get(3)?;
    let similarity = 1.0 - (distance / 2.0);

    // Stored pages are 1-based; anything else is an unknown source.
    let page = row
        .get::<_, Option<i64>>(2)?
        .filter(|p| *p > 0)
        .and_then(|p| u32::try_from(p).ok());

    Ok(SearchResult {
        chunk_key: row.get(0)?,
        content: row.get(1)?,
        page,
        similarity,
    })
}

impl Db {
    /// Nearest chunks of `collection` by cosine distance, closest first.
    ///
    /// Equal distances keep insertion order.
    pub fn search(
        &self,
        collection: &str,
        query_vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT
                c.chunk_key,
                c.content,
                c.page,
                vec_distance_cosine(v.embedding, ?) as distance
            FROM vec_chunks v
            JOIN chunks c ON v.rowid = c.id
            JOIN collections k ON c.collection_id = k.id
            WHERE k.name = ?
            ORDER BY distance ASC, c.id ASC
            LIMIT ?
            "#,
        )?;

        let rows = stmt.query_map(
            params![serialize_vector(query_vector), collection, top_k as i64],
            map_search_row,
        )?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::StoredChunk;

    fn padded(values: &[f32]) -> Vec<f32> {
        let mut v = vec![0.0f32; 8];
        v[..values.len()].copy_from_slice(values);
        v
    }

    #[test]
    fn test_search_orders_by_similarity() {
        let mut db = Db::open_in_memory(8).unwrap();

        let chunks = vec![
            StoredChunk {
                key: "chunk_1",
                content: "governance framework",
                page: Some(1),
            },
            StoredChunk {
                key: "chunk_2",
                content: "collateral valuation",
                page: Some(2),
            },
        ];
        let near = padded(&[0.1, 0.2, 0.3]);
        let far = padded(&[0.9, -0.8, 0.1]);
        db.insert_chunks("regs", &chunks, &[near.clone(), far])
            .unwrap();

        let results = db.search("regs", &near, 5).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk_key, "chunk_1");
        assert_eq!(results[0].page, Some(1));
        assert!(results[0].similarity > 0.99);
        assert_eq!(results[1].content, "collateral valuation");
        assert!(results[1].similarity < results[0].similarity);
    }

    #[test]
    fn test_search_respects_top_k_and_collection() {
        let mut db = Db::open_in_memory(8).unwrap();
        let v = padded(&[0.5, 0.5]);

        let regs: Vec<StoredChunk> = ["a", "b", "c"]
            .into_iter()
            .map(|k| StoredChunk {
                key: k,
                content: k,
                page: Some(1),
            })
            .collect();
        db.insert_chunks("regs", &regs, &vec![v.clone(); 3]).unwrap();

        let other = vec![StoredChunk {
            key: "z",
            content: "z",
            page: Some(9),
        }];
        db.insert_chunks("other", &other, &[v.clone()]).unwrap();

        let results = db.search("regs", &v, 2).unwrap();
        // Ties fall back to insertion order
        let keys: Vec<&str> = results.iter().map(|r| r.chunk_key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_missing_page_is_unknown() {
        let mut db = Db::open_in_memory(8).unwrap();
        let v = padded(&[1.0]);
        let chunks = vec![StoredChunk {
            key: "chunk_1",
            content: "orphan",
            page: None,
        }];
        db.insert_chunks("regs", &chunks, &[v.clone()]).unwrap();

        let results = db.search("regs", &v, 1).unwrap();
        assert_eq!(results[0].page, None);
    }
}
