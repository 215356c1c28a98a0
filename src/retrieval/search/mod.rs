//! ANN fetch, hybrid search orchestration, and result display.

pub mod ann_fetch;
pub mod display;
pub mod hybrid_search;

pub use ann_fetch::hybrid_ann_anykeyword;
pub use display::{format_results, write_results};
pub use hybrid_search::{HybridSearchRequest, HybridSearcher, hybrid_search_with_kw};
