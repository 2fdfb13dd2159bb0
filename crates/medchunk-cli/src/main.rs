//! medchunk — chunk clinical markdown files and print the chunk records as JSON.
//!
//! ```bash
//! medchunk notes/*.md --pretty
//! medchunk --dedup --config medchunk.toml inbox/*.md
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use medchunk_common::Config;
use medchunk_ingestion::dedup::DedupIndex;
use medchunk_ingestion::pipeline::ingest_batch;
use medchunk_ingestion::{chunk_document, ChunkerConfig, RawDocument};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "medchunk", version, about = "Chunk clinical markdown documents for retrieval")]
struct Cli {
    /// Config file (defaults to $MEDCHUNK_CONFIG or ./medchunk.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Skip duplicate files and report chunk-level dedup statistics
    #[arg(long)]
    dedup: bool,

    /// Markdown or text files to chunk
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("medchunk=info,warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::load_or_default()?,
    };
    let chunker = ChunkerConfig::from(&config.chunker);

    let docs = cli
        .files
        .iter()
        .map(|path| {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Ok(RawDocument::new(path.display().to_string(), text))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    info!(files = docs.len(), dedup = cli.dedup, "Chunking documents");

    let output = if cli.dedup {
        let mut index = DedupIndex::new();
        let report = ingest_batch(&docs, &mut index, &chunker);
        serde_json::json!({
            "report": &report,
            "documents": &report.documents,
        })
    } else {
        let chunked: Vec<_> = docs.iter().map(|doc| chunk_document(doc, &chunker)).collect();
        serde_json::to_value(&chunked)?
    };

    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{rendered}");

    Ok(())
}
