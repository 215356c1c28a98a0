//! ANN query construction.

pub mod ann_query;
pub mod where_clause;

pub use ann_query::{QueryValue, build_ann_query, build_query_params};
pub use where_clause::{DEFAULT_PLACEHOLDER, LogicalJoiner, WhereClause, create_where_parts};
