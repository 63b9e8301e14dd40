// Runtime layer - orchestrates index and engine per call
// Every search opens its own read-only connection and releases it on return

pub mod client;
pub mod config;
mod error;
pub mod ops;
pub mod time;

pub use client::{SearchOps, SessionSeek};
pub use config::{Config, IndexConfig, SearchConfig, resolve_workspace_path};
pub use error::{Error, ErrorKind, Result};
pub use ops::SearchService;
pub use sessionseek_index::CorpusStats;
