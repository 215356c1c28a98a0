//! Startup helpers for the `hybrid-rerank` binary.
//!
//! Usage: `hybrid-rerank <corpus.json> <query> [keyword ...]`
//!
//! The corpus is a JSON array of snippet strings. It is embedded with Ollama
//! into an in-memory store, searched once, and the ranking is written to
//! stdout. Settings come from the JSON file named by `HYBRID_RERANK_CONFIG`,
//! or the defaults when unset.

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, bail};

use crate::retrieval::{
    HybridConfig, HybridSearcher, InMemorySnippetStore, KeywordSet, OllamaEmbedder, init_tracing,
    write_results,
};

/// Environment variable naming the JSON config file.
pub const CONFIG_ENV: &str = "HYBRID_RERANK_CONFIG";

/// Parsed command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CliArgs {
    /// JSON corpus of snippets.
    pub corpus: PathBuf,
    /// Query text.
    pub query: String,
    /// Lowercased keywords.
    pub keywords: KeywordSet,
}

/// Run the binary.
///
/// # Returns
/// `ExitCode::SUCCESS` when the ranking was printed, `1` on failure.
#[must_use]
pub fn run() -> ExitCode {
    init_tracing();
    tracing::info!("Starting hybrid-rerank v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = try_run(std::env::args().skip(1)) {
        tracing::error!("Search failed: {e:#}");
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}

fn try_run(args: impl IntoIterator<Item = String>) -> anyhow::Result<()> {
    let args = parse_args(args)?;
    let config = load_config()?;

    let embedder = OllamaEmbedder::new(&config.embedding).context("failed to build embedder")?;
    tracing::info!("Ollama endpoint: {}", embedder.endpoint());

    let snippets = load_corpus(&args.corpus)?;
    let store = InMemorySnippetStore::from_embedder(&config.retrieval.keyspace, snippets, &embedder)
        .context("failed to embed corpus")?;

    let searcher = HybridSearcher::new(store, embedder, &config);
    let settings = searcher.config();
    tracing::info!(
        keyspace = %settings.keyspace,
        top_k = settings.top_k,
        prefetch_factor = settings.prefetch_factor,
        "Searching {} keyword(s)",
        args.keywords.len()
    );
    let ranking = searcher
        .search(&args.query, &args.keywords)
        .context("hybrid search failed")?;

    let mut stdout = io::stdout().lock();
    write_results(&mut stdout, &ranking).context("failed to write results")?;
    Ok(())
}

/// Parse `<corpus.json> <query> [keyword ...]`.
///
/// Keywords are lowercased to line up with the scorer's lowercased text.
///
/// # Errors
/// Returns an error if the corpus path or query is missing.
pub fn parse_args(args: impl IntoIterator<Item = String>) -> anyhow::Result<CliArgs> {
    let mut args = args.into_iter();
    let Some(corpus) = args.next() else {
        bail!("usage: hybrid-rerank <corpus.json> <query> [keyword ...]");
    };
    let Some(query) = args.next() else {
        bail!("missing query text");
    };

    Ok(CliArgs {
        corpus: PathBuf::from(corpus),
        query,
        keywords: args.map(|kw| kw.to_lowercase()).collect(),
    })
}

/// Load the config named by [`CONFIG_ENV`], or the defaults.
///
/// # Errors
/// Returns an error if the file cannot be read or is invalid.
pub fn load_config() -> anyhow::Result<HybridConfig> {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) => HybridConfig::from_json_file(&path)
            .with_context(|| format!("failed to load config from {}", Path::new(&path).display())),
        None => Ok(HybridConfig::default()),
    }
}

/// Read a JSON array of snippet strings.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn load_corpus(path: &Path) -> anyhow::Result<Vec<String>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read corpus {}", path.display()))?;
    let snippets: Vec<String> = serde_json::from_str(&raw)
        .with_context(|| format!("corpus {} is not a JSON array of strings", path.display()))?;
    if snippets.is_empty() {
        tracing::warn!("Corpus {} is empty", path.display());
    }
    Ok(snippets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        let parsed = parse_args(args(&["corpus.json", "pets", "Cat", "dog", "cat"])).unwrap();
        assert_eq!(parsed.corpus, PathBuf::from("corpus.json"));
        assert_eq!(parsed.query, "pets");
        assert_eq!(parsed.keywords.iter().collect::<Vec<_>>(), vec!["cat", "dog"]);
    }

    #[test]
    fn test_parse_args_without_keywords() {
        let parsed = parse_args(args(&["corpus.json", "pets"])).unwrap();
        assert!(parsed.keywords.is_empty());
    }

    #[test]
    fn test_parse_args_missing_query() {
        assert!(parse_args(args(&["corpus.json"])).is_err());
        assert!(parse_args(Vec::new()).is_err());
    }

    #[test]
    fn test_load_corpus_rejects_missing_file() {
        assert!(load_corpus(Path::new("/nonexistent/corpus.json")).is_err());
    }
}
