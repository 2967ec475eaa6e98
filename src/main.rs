//! Simscore command line entrypoint.
//!
//! Usage: `simscore <corpus.jsonl> <query> [k]`
//!
//! Each corpus line is `{"id": "...", "text": "..."}`. Encoder settings come from
//! `SIMSCORE_*` environment variables; log level from `RUST_LOG`.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, bail};

use simscore::{Document, EngineConfig, Retriever};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (corpus_path, query, k) = match args.as_slice() {
        [path, query] => (path, query, None),
        [path, query, k] => {
            let k: usize = k
                .parse()
                .with_context(|| format!("k must be a positive integer, got '{k}'"))?;
            (path, query, Some(k))
        }
        _ => bail!("usage: simscore <corpus.jsonl> <query> [k]"),
    };

    let config = EngineConfig::from_env()?;
    config.validate()?;

    tracing::info!(
        representation = %config.representation,
        corpus = %corpus_path,
        "Simscore starting"
    );

    let corpus = load_corpus(Path::new(corpus_path))?;
    let mut retriever = Retriever::from_config(&config)?;
    retriever.index(&corpus)?;

    let hits = retriever.search(query, k.unwrap_or(config.top_k))?;
    println!("{}", serde_json::to_string_pretty(&hits)?);

    Ok(())
}

/// Reads a JSON-lines corpus, skipping blank lines.
fn load_corpus(path: &Path) -> anyhow::Result<Vec<Document>> {
    let file =
        File::open(path).with_context(|| format!("failed to open corpus {}", path.display()))?;

    let mut corpus = Vec::new();
    for (line_no, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let doc: Document = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: invalid corpus line", path.display(), line_no + 1))?;
        corpus.push(doc);
    }

    tracing::debug!(documents = corpus.len(), "Corpus loaded");
    Ok(corpus)
}
