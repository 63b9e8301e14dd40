// SQLite FTS5 index over conversation records
// Read path: session-grouped match queries. Write path: idempotent upserts.

mod db;
mod error;
mod queries;
mod records;
mod schema;
pub mod search;

// Public API
pub use db::Database;
pub use error::{Error, Result};
pub use records::{CorpusStats, MessageRecord, ProjectRecord, SessionRecord, ToolUseRecord};
pub use schema::SCHEMA_VERSION;
pub use search::{
    CategoryQuery, IndexAdapter, IndexCapabilities, MAX_SNIPPET_TOKENS, Predicate, QueryBuilder,
    SearchPlan, SnippetOptions, TextIndex,
};
