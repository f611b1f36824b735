/// End-to-end integration tests for the compliance-rag pipeline.
///
/// Tests the complete flow:
///   Config → DB → Embedder → Indexer → Retrieval → Themes → Answer
use compliance_rag::answer::Assistant;
use compliance_rag::config::Config;
use compliance_rag::db::Db;
use compliance_rag::embedder::mock::MockEmbedder;
use compliance_rag::error::RagError;
use compliance_rag::indexer::chunker::Chunker;
use compliance_rag::indexer::core::{IndexReport, Indexer};
use compliance_rag::models::Page;
use compliance_rag::pdf;
use compliance_rag::store::{SqliteStore, VectorStore};
use std::path::Path;
use tempfile::tempdir;

const GOVERNANCE_PAGE: &str = "The management body should approve the governance framework, \
     the risk appetite and the internal control policy of the institution.";
const COLLATERAL_PAGE: &str = "Collateral valuation should be performed by a qualified valuer, \
     and each property should be subject to regular revaluation.";

fn pages() -> Vec<Page> {
    vec![
        Page {
            number: 1,
            text: GOVERNANCE_PAGE.to_string(),
        },
        Page {
            number: 2,
            text: COLLATERAL_PAGE.to_string(),
        },
    ]
}

fn chunker(config: &Config) -> Chunker {
    Chunker::new(config.chunk_size, config.chunk_overlap).unwrap()
}

/// Full pipeline: index two pages → ask → themed, cited answer
#[test]
fn test_full_pipeline() {
    let config = Config::default();
    let embedder = MockEmbedder::new(config.model.dimensions);
    let mut db = Db::open_in_memory(config.model.dimensions).unwrap();
    let mut store = SqliteStore::new(&mut db, &embedder, &config.collection);

    let report = Indexer::new(&mut store, chunker(&config))
        .ensure_indexed(&pages())
        .unwrap();
    assert_eq!(report, IndexReport::Indexed { added: 2 });

    let assistant = Assistant::new(&store, &config).unwrap();
    let answer = assistant
        .ask("What governance and collateral valuation rules apply?")
        .unwrap();

    let themes: Vec<&str> = answer.sections.iter().map(|s| s.theme.as_str()).collect();
    assert_eq!(
        themes,
        vec!["Governance & Risk Management", "Collateral & Valuation"]
    );
    assert_eq!(answer.sections[0].pages, vec![1]);
    assert_eq!(answer.sections[1].pages, vec![2]);

    let rendered = answer.to_string();
    assert!(rendered.contains("=== SYNTHESIZED ANSWER (3 lines per theme) ==="));
    assert!(rendered.contains("◆ Governance & Risk Management"));
    assert!(rendered.contains("Sources: pages [2]"));
}

/// Second ensure_indexed call must not add anything
#[test]
fn test_index_is_idempotent() {
    let config = Config::default();
    let embedder = MockEmbedder::new(config.model.dimensions);
    let mut db = Db::open_in_memory(config.model.dimensions).unwrap();
    let mut store = SqliteStore::new(&mut db, &embedder, &config.collection);

    Indexer::new(&mut store, chunker(&config))
        .ensure_indexed(&pages())
        .unwrap();
    let first = store.count().unwrap();

    let report = Indexer::new(&mut store, chunker(&config))
        .ensure_indexed(&pages())
        .unwrap();
    assert_eq!(report, IndexReport::AlreadyIndexed { existing: first });
    assert_eq!(store.count().unwrap(), first);
}

/// The index survives reopening the database file
#[test]
fn test_index_persists_across_reopen() {
    let temp_dir = tempdir().unwrap();
    let db_path = temp_dir.path().join("compliance.db");
    let config = Config::default();
    let embedder = MockEmbedder::new(config.model.dimensions);

    {
        let mut db = Db::open(&db_path, config.model.dimensions).unwrap();
        let mut store = SqliteStore::new(&mut db, &embedder, &config.collection);
        Indexer::new(&mut store, chunker(&config))
            .ensure_indexed(&pages())
            .unwrap();
    }

    let mut db = Db::open(&db_path, config.model.dimensions).unwrap();
    let mut store = SqliteStore::new(&mut db, &embedder, &config.collection);
    let report = Indexer::new(&mut store, chunker(&config))
        .ensure_indexed(&pages())
        .unwrap();
    assert_eq!(report, IndexReport::AlreadyIndexed { existing: 2 });

    let info = store.info().unwrap().expect("collection should exist");
    assert_eq!(info.name, config.collection);
    assert_eq!(info.chunk_count, 2);
}

/// Collections in one database do not see each other
#[test]
fn test_collections_are_isolated() {
    let config = Config::default();
    let embedder = MockEmbedder::new(config.model.dimensions);
    let mut db = Db::open_in_memory(config.model.dimensions).unwrap();

    {
        let mut store = SqliteStore::new(&mut db, &embedder, "first");
        Indexer::new(&mut store, chunker(&config))
            .ensure_indexed(&pages())
            .unwrap();
    }

    let store = SqliteStore::new(&mut db, &embedder, "second");
    assert_eq!(store.count().unwrap(), 0);
    assert!(store.query("collateral", 5).unwrap().is_empty());
}

/// A question against an empty store yields an answer with no sections
#[test]
fn test_empty_store_answers_with_no_sections() {
    let config = Config::default();
    let embedder = MockEmbedder::new(config.model.dimensions);
    let mut db = Db::open_in_memory(config.model.dimensions).unwrap();
    let store = SqliteStore::new(&mut db, &embedder, &config.collection);

    let assistant = Assistant::new(&store, &config).unwrap();
    let answer = assistant.ask("anything at all?").unwrap();
    assert!(answer.sections.is_empty());
}

#[test]
fn test_missing_pdf_fails_before_indexing() {
    let err = pdf::extract_pages(Path::new("/nonexistent/regulation.pdf")).unwrap_err();
    assert!(matches!(err, RagError::NotFound(_)));
    assert!(err.to_string().contains("regulation.pdf"));
}

#[test]
fn test_config_defaults_and_roundtrip() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("config.json");
    let path_str = path.to_str().unwrap();

    // Missing file: defaults are returned
    let config = Config::load(path_str).unwrap();
    assert_eq!(config.chunk_size, 1200);
    assert_eq!(config.chunk_overlap, 200);
    assert_eq!(config.search_top_k, 6);
    assert_eq!(config.max_lines_per_theme, 3);
    assert_eq!(config.catch_all_theme, "Other / General");
    config.validate().unwrap();

    // A saved config reads back unchanged
    config.save(path_str).unwrap();
    let reloaded = Config::load(path_str).unwrap();
    assert_eq!(reloaded.collection, config.collection);
    assert_eq!(reloaded.themes.len(), config.themes.len());
}
