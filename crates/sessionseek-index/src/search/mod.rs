//! Read path: match queries against the two full-text indexes.
//!
//! [`QueryBuilder`] turns user input into a [`SearchPlan`]; an
//! [`IndexAdapter`] bound to one connection ranks sessions, counts them and
//! fetches the matching rows for a window of sessions.

mod adapter;
mod builder;
mod fetcher;
mod flat;
mod ranker;

pub use adapter::{
    IndexAdapter, IndexCapabilities, MAX_SNIPPET_TOKENS, SnippetOptions, TextIndex,
};
pub use builder::{CategoryQuery, Predicate, QueryBuilder, SearchPlan};
