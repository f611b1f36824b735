use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use compliance_rag::answer::Assistant;
use compliance_rag::config::{Config, EmbedderBackend};
use compliance_rag::db::Db;
use compliance_rag::embedder::Embedder;
use compliance_rag::embedder::download::download_model_files;
use compliance_rag::embedder::mock::MockEmbedder;
use compliance_rag::embedder::onnx::OnnxEmbedder;
use compliance_rag::indexer::chunker::Chunker;
use compliance_rag::indexer::core::{IndexReport, Indexer};
use compliance_rag::store::SqliteStore;
use compliance_rag::{pdf, repl};

#[derive(Parser)]
#[command(name = "compliance-rag", version, about = "Ask questions about a regulatory PDF")]
struct Cli {
    /// Path to the JSON config file
    #[arg(long, default_value = "config.json")]
    config: String,

    /// Override the source PDF path
    #[arg(long)]
    pdf: Option<String>,

    /// Override the database path
    #[arg(long)]
    db: Option<String>,

    /// Override the number of retrieved chunks
    #[arg(long)]
    top_k: Option<usize>,

    /// Override the summary lines per theme
    #[arg(long)]
    lines: Option<usize>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Index if needed, then ask questions interactively (default)
    Chat,
    /// Answer a single question
    Ask {
        question: String,
        /// Print the answer as JSON
        #[arg(long)]
        json: bool,
    },
    /// Index the PDF if the store is empty
    Index,
    /// Show what the store holds
    Stats,
    /// Fetch the ONNX embedding model
    DownloadModel,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(&cli.config)?;
    if let Some(pdf) = cli.pdf {
        config.pdf_path = pdf;
    }
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(top_k) = cli.top_k {
        config.search_top_k = top_k;
    }
    if let Some(lines) = cli.lines {
        config.max_lines_per_theme = lines;
    }
    config.validate()?;

    match cli.command.unwrap_or(Command::Chat) {
        Command::DownloadModel => download_model_files(Path::new(&config.model.dir)),
        Command::Stats => stats(&config),
        Command::Index => {
            let embedder = build_embedder(&config)?;
            let mut db = open_db(&config)?;
            let mut store = SqliteStore::new(&mut db, embedder.as_ref(), &config.collection);
            match index(&config, &mut store)? {
                IndexReport::AlreadyIndexed { existing } => {
                    println!("Collection already indexed: {existing} chunks")
                }
                IndexReport::Indexed { added } => println!("Indexing complete: {added} chunks added"),
            }
            Ok(())
        }
        Command::Ask { question, json } => {
            let embedder = build_embedder(&config)?;
            let mut db = open_db(&config)?;
            let mut store = SqliteStore::new(&mut db, embedder.as_ref(), &config.collection);
            index(&config, &mut store)?;

            let assistant = Assistant::new(&store, &config)?;
            let answer = assistant.ask(question.trim())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&answer)?);
            } else {
                print!("{answer}");
            }
            Ok(())
        }
        Command::Chat => {
            let embedder = build_embedder(&config)?;
            let mut db = open_db(&config)?;
            let mut store = SqliteStore::new(&mut db, embedder.as_ref(), &config.collection);
            index(&config, &mut store)?;

            let assistant = Assistant::new(&store, &config)?;
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            let answered = repl::run_loop(stdin.lock(), &mut stdout, |q| assistant.ask(q))?;
            stdout.flush()?;
            info!("Session ended after {answered} answers");
            Ok(())
        }
    }
}

fn open_db(config: &Config) -> Result<Db> {
    Db::open(&config.db_path, config.model.dimensions)
        .with_context(|| format!("failed to open database: {}", config.db_path))
}

fn build_embedder(config: &Config) -> Result<Box<dyn Embedder>> {
    match config.model.backend {
        EmbedderBackend::Mock => {
            warn!("Using mock embedder: retrieval is lexical, not semantic");
            Ok(Box::new(MockEmbedder::new(config.model.dimensions)))
        }
        EmbedderBackend::Onnx => {
            let model_dir = Path::new(&config.model.dir);
            if config.model.auto_download {
                download_model_files(model_dir)?;
            }
            let embedder = OnnxEmbedder::new(model_dir, config.model.dimensions)
                .with_context(|| format!("failed to load {}", config.model.name))?;
            Ok(Box::new(embedder))
        }
    }
}

/// Extracts the PDF and loads it into the store unless already populated.
fn index(config: &Config, store: &mut SqliteStore<'_, dyn Embedder>) -> Result<IndexReport> {
    let pages = pdf::extract_pages(Path::new(&config.pdf_path))?;
    let chunker = Chunker::new(config.chunk_size, config.chunk_overlap)?;
    let report = Indexer::new(store, chunker).ensure_indexed(&pages)?;
    Ok(report)
}

fn stats(config: &Config) -> Result<()> {
    let db = open_db(config)?;
    match db.collection_info(&config.collection)? {
        Some(info) => println!("{info}"),
        None => println!("Collection {} is empty", config.collection),
    }
    Ok(())
}
