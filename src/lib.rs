//! # compliance-rag: local regulatory PDF question answering
//!
//! Indexes a single regulatory PDF into a local sqlite-vec store and answers
//! free-text questions with short extractive summaries grouped by business
//! theme, each citing the pages it came from.
//!
//! ## Architecture
//!
//! - **[`config`]** - Tunables: chunking, retrieval, summary limits, theme taxonomy
//! - **[`pdf`]** - Per-page text extraction (lopdf)
//! - **[`indexer`]** - Normalization, overlapping windows, one-shot indexing
//! - **[`embedder`]** - Sentence embeddings via ONNX Runtime (all-MiniLM-L6-v2)
//! - **[`db`]** - SQLite + sqlite-vec persistence and cosine search
//! - **[`store`]** - The `VectorStore` seam between pipeline and database
//! - **[`answer`]** - Retrieval, theme classification, summarization, composition
//! - **[`repl`]** - Interactive question loop

pub mod answer;
pub mod config;
pub mod db;
pub mod embedder;
pub mod error;
pub mod indexer;
pub mod models;
pub mod pdf;
pub mod repl;
pub mod store;
