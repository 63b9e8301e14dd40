use crate::client::SearchOps;
use crate::config::Config;
use crate::Result;
use sessionseek_index::{CorpusStats, Database};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

pub const DATABASE_FILE: &str = "sessionseek.db";
pub const CONFIG_FILE: &str = "config.toml";

/// A workspace opened for writing: one data directory holding the corpus
/// and its config.
///
/// Holds the writable connection used for ingestion and reindexing, and
/// brings the schema up to date on open. Searching needs none of this; use
/// [`SearchOps::open`] for read-only access.
pub struct SessionSeek {
    db: Database,
    db_path: PathBuf,
    config: Arc<Config>,
}

impl SessionSeek {
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        std::fs::create_dir_all(data_dir)?;

        let db_path = data_dir.join(DATABASE_FILE);
        let config = Config::load_from(&data_dir.join(CONFIG_FILE))?;
        let db = Database::open(&db_path)?;

        Ok(Self {
            db,
            db_path,
            config: Arc::new(config),
        })
    }

    pub fn search(&self) -> SearchOps {
        SearchOps::new(self.db_path.clone(), self.config.clone())
    }

    /// Writable handle for loading records.
    pub fn corpus(&self) -> &Database {
        &self.db
    }

    /// Repopulate both text indexes from the stored records.
    pub fn reindex(&self) -> Result<CorpusStats> {
        self.db.rebuild_search_index()?;
        let stats = self.db.corpus_stats()?;
        info!(
            sessions = stats.sessions,
            messages = stats.messages,
            tool_uses = stats.tool_uses,
            "rebuilt search index"
        );
        Ok(stats)
    }

    pub fn database_path(&self) -> &PathBuf {
        &self.db_path
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
