//! Binary entrypoint running one hybrid search over a snippet corpus.

use std::process::ExitCode;

use hybrid_rerank::start_hybrid_rerank;

/// Embed the corpus, search it, and print the ranking.
fn main() -> ExitCode {
    start_hybrid_rerank::run()
}
