use rusqlite::{Connection, OpenFlags};
use std::path::Path;

use crate::{
    Error, Result,
    queries::{message, project, session, tool_use},
    records::{CorpusStats, MessageRecord, ProjectRecord, SessionRecord, ToolUseRecord},
    schema,
    search::{IndexAdapter, IndexCapabilities, SnippetOptions},
};

/// Handle on one SQLite connection to the corpus.
///
/// A writable handle migrates the schema on open, and only ever drops
/// tables that hold no records. Read-only handles are
/// cheap to open and meant to live for a single search.
pub struct Database {
    conn: Connection,
    location: String,
    capabilities: IndexCapabilities,
    snippets: SnippetOptions,
}

impl Database {
    pub fn open(db_path: &Path) -> Result<Self> {
        let location = db_path.display().to_string();
        let conn = Connection::open(db_path)
            .map_err(|e| Error::from_connection_failure(e, &location))?;

        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        // schema first: a refused file is left exactly as found
        schema::init_schema(&conn, &location).map_err(|e| e.while_opening(&location))?;
        // journal_mode answers with the resulting mode, so read it as a row
        conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))
            .map_err(|e| Error::from_connection_failure(e, &location))?;

        Ok(Self::from_connection(conn, location))
    }

    /// Open an existing index without write access.
    ///
    /// Never changes the file. Fails with [`Error::Unavailable`] when the file
    /// is missing, locked or not a database, and with
    /// [`Error::IncompatibleSchema`] when it cannot be searched as it stands.
    /// An unversioned corpus is searchable when its tables and text indexes
    /// have the expected layout.
    pub fn open_read_only(db_path: &Path) -> Result<Self> {
        let location = db_path.display().to_string();
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(db_path, flags)
            .map_err(|e| Error::from_connection_failure(e, &location))?;

        let version = schema::user_version(&conn).map_err(|e| e.while_opening(&location))?;
        if version != schema::SCHEMA_VERSION {
            let report = schema::inspect_layout(&conn)?;
            let reason = if !report.is_compatible() {
                Some(report.describe_problems())
            } else if version != 0 {
                Some("written by a different version".to_string())
            } else if !report.has_fts {
                Some("full-text indexes are missing; reindex to build them".to_string())
            } else {
                None
            };
            if let Some(reason) = reason {
                return Err(Error::IncompatibleSchema {
                    location,
                    found: version,
                    expected: schema::SCHEMA_VERSION,
                    reason,
                });
            }
        }

        Ok(Self::from_connection(conn, location))
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        schema::init_schema(&conn, ":memory:")?;
        Ok(Self::from_connection(conn, ":memory:".to_string()))
    }

    fn from_connection(conn: Connection, location: String) -> Self {
        Self {
            conn,
            location,
            capabilities: IndexCapabilities::default(),
            snippets: SnippetOptions::default(),
        }
    }

    pub fn with_capabilities(mut self, capabilities: IndexCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_snippet_options(mut self, snippets: SnippetOptions) -> Self {
        self.snippets = snippets;
        self
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    // --- Read path ---

    /// Adapter over the bare connection; each statement is its own read.
    pub fn adapter(&self) -> IndexAdapter<'_> {
        IndexAdapter::new(&self.conn, &self.location, self.capabilities, &self.snippets)
    }

    /// Run `f` inside one deferred read transaction.
    ///
    /// Every statement `f` issues sees the same snapshot of the corpus. The
    /// transaction is rolled back if `f` fails.
    pub fn read_snapshot<T, E, F>(&self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&IndexAdapter<'_>) -> std::result::Result<T, E>,
        E: From<Error>,
    {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(|e| Error::from_connection_failure(e, &self.location))?;

        let out = {
            let adapter = IndexAdapter::new(&tx, &self.location, self.capabilities, &self.snippets);
            f(&adapter)?
        };

        tx.commit()
            .map_err(|e| Error::from_connection_failure(e, &self.location))?;
        Ok(out)
    }

    pub fn list_tool_names(&self) -> Result<Vec<String>> {
        tool_use::list_names(&self.conn)
    }

    pub fn get_project(&self, project_id: &str) -> Result<Option<ProjectRecord>> {
        project::get(&self.conn, project_id)
    }

    pub fn corpus_stats(&self) -> Result<CorpusStats> {
        Ok(CorpusStats {
            sessions: session::count(&self.conn)?,
            messages: message::count(&self.conn)?,
            tool_uses: tool_use::count(&self.conn)?,
        })
    }

    // --- Write path ---

    pub fn insert_or_update_project(&self, record: &ProjectRecord) -> Result<()> {
        project::insert_or_update(&self.conn, record)
    }

    pub fn insert_or_update_session(&self, record: &SessionRecord) -> Result<()> {
        session::insert_or_update(&self.conn, record)
    }

    pub fn insert_or_update_message(&self, record: &MessageRecord) -> Result<()> {
        message::insert_or_update(&self.conn, record)
    }

    pub fn insert_or_update_tool_use(&self, record: &ToolUseRecord) -> Result<()> {
        tool_use::insert_or_update(&self.conn, record)
    }

    /// Repopulate both full-text indexes from the base tables.
    pub fn rebuild_search_index(&self) -> Result<()> {
        schema::rebuild_fts(&self.conn)
    }
}
