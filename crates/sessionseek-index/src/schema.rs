use rusqlite::{Connection, OptionalExtension};

use crate::{Error, Result};

// Schema version (increment when changing table or index definitions)
pub const SCHEMA_VERSION: i32 = 1;

// Base tables hold the records; fts_messages and fts_tool_uses are
// external-content FTS5 indexes over them, kept in sync by triggers.
// The upserts in queries/ update rows in place, so rowids are stable and
// the update triggers replace the indexed text of the same row.

// Columns every search and upsert relies on, per table.
const BASE_LAYOUT: &[(&str, &[&str])] = &[
    ("projects", &["project_id", "project_name", "created_at"]),
    ("sessions", &["session_id", "project_id", "start_time", "end_time"]),
    (
        "messages",
        &["message_id", "session_id", "message_index", "role", "content", "timestamp"],
    ),
    (
        "tool_uses",
        &[
            "id",
            "tool_use_id",
            "session_id",
            "message_index",
            "tool_name",
            "tool_input",
            "tool_result",
            "is_error",
            "timestamp",
        ],
    ),
];

const FTS_LAYOUT: &[(&str, &[&str])] = &[
    ("fts_messages", &["content"]),
    ("fts_tool_uses", &["tool_input", "tool_result"]),
];

/// What an existing database file holds, judged by its tables.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LayoutReport {
    /// Rows across all base tables.
    pub records: i64,
    /// Base tables or columns that are missing.
    pub problems: Vec<String>,
    pub has_fts: bool,
}

impl LayoutReport {
    /// Base tables carry every column searches and upserts rely on.
    pub fn is_compatible(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn describe_problems(&self) -> String {
        self.problems.join(", ")
    }
}

pub fn user_version(conn: &Connection) -> Result<i32> {
    Ok(conn.query_row("PRAGMA user_version", [], |row| row.get(0))?)
}

pub fn inspect_layout(conn: &Connection) -> Result<LayoutReport> {
    let mut report = LayoutReport::default();

    for (table, columns) in BASE_LAYOUT {
        let present = table_columns(conn, table)?;
        if present.is_empty() {
            report.problems.push(format!("table {} is missing", table));
            continue;
        }
        report.records += conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
            row.get::<_, i64>(0)
        })?;
        for column in columns.iter() {
            if !present.iter().any(|c| c.as_str() == *column) {
                report.problems.push(format!("column {}.{} is missing", table, column));
            }
        }
    }

    report.has_fts = true;
    for (table, columns) in FTS_LAYOUT {
        let present = table_columns(conn, table)?;
        if !columns
            .iter()
            .all(|column| present.iter().any(|c| c.as_str() == *column))
        {
            report.has_fts = false;
        }
    }
    Ok(report)
}

fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let exists: Option<String> = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table],
            |row| row.get(0),
        )
        .optional()?;
    if exists.is_none() {
        return Ok(Vec::new());
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
    let columns = stmt
        .query_map([table], |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(columns)
}

/// Bring the schema to [`SCHEMA_VERSION`].
///
/// A file without records is recreated. An unversioned file whose records
/// already use the expected layout (a corpus loaded by an outside pipeline)
/// is adopted in place and its text indexes are rebuilt. Anything else that
/// holds records is refused and left untouched.
pub fn init_schema(conn: &Connection, location: &str) -> Result<()> {
    let current_version = user_version(conn)?;
    let mut adopted = false;

    if current_version != SCHEMA_VERSION {
        let report = inspect_layout(conn)?;
        if report.records == 0 {
            drop_all_tables(conn)?;
        } else if current_version == 0 && report.is_compatible() {
            adopted = true;
        } else {
            let reason = if report.is_compatible() {
                "written by a different version".to_string()
            } else {
                report.describe_problems()
            };
            return Err(Error::IncompatibleSchema {
                location: location.to_string(),
                found: current_version,
                expected: SCHEMA_VERSION,
                reason,
            });
        }
    }

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS projects (
            project_id TEXT PRIMARY KEY,
            project_name TEXT NOT NULL,
            created_at TEXT
        );

        CREATE TABLE IF NOT EXISTS sessions (
            session_id TEXT PRIMARY KEY,
            project_id TEXT NOT NULL,
            start_time TEXT,
            end_time TEXT,
            FOREIGN KEY (project_id) REFERENCES projects(project_id)
        );

        CREATE TABLE IF NOT EXISTS messages (
            message_id INTEGER PRIMARY KEY AUTOINCREMENT,
            session_id TEXT NOT NULL,
            message_index INTEGER NOT NULL,
            role TEXT NOT NULL,
            content TEXT NOT NULL,
            timestamp TEXT,
            UNIQUE (session_id, message_index),
            FOREIGN KEY (session_id) REFERENCES sessions(session_id)
        );

        CREATE TABLE IF NOT EXISTS tool_uses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            tool_use_id TEXT NOT NULL UNIQUE,
            session_id TEXT NOT NULL,
            message_index INTEGER NOT NULL,
            tool_name TEXT NOT NULL,
            tool_input TEXT NOT NULL,
            tool_result TEXT,
            is_error INTEGER NOT NULL DEFAULT 0,
            timestamp TEXT,
            FOREIGN KEY (session_id) REFERENCES sessions(session_id)
        );

        CREATE INDEX IF NOT EXISTS idx_sessions_project ON sessions(project_id);
        CREATE INDEX IF NOT EXISTS idx_messages_session ON messages(session_id);
        CREATE INDEX IF NOT EXISTS idx_messages_ts ON messages(timestamp DESC);
        CREATE INDEX IF NOT EXISTS idx_tool_uses_session ON tool_uses(session_id);
        CREATE INDEX IF NOT EXISTS idx_tool_uses_name ON tool_uses(tool_name);

        CREATE VIRTUAL TABLE IF NOT EXISTS fts_messages USING fts5(
            content,
            content='messages',
            content_rowid='message_id',
            tokenize='porter unicode61'
        );

        CREATE VIRTUAL TABLE IF NOT EXISTS fts_tool_uses USING fts5(
            tool_input,
            tool_result,
            content='tool_uses',
            content_rowid='id',
            tokenize='porter unicode61'
        );

        CREATE TRIGGER IF NOT EXISTS messages_ai AFTER INSERT ON messages BEGIN
            INSERT INTO fts_messages(rowid, content) VALUES (new.message_id, new.content);
        END;

        CREATE TRIGGER IF NOT EXISTS messages_ad AFTER DELETE ON messages BEGIN
            INSERT INTO fts_messages(fts_messages, rowid, content)
            VALUES ('delete', old.message_id, old.content);
        END;

        CREATE TRIGGER IF NOT EXISTS messages_au AFTER UPDATE ON messages BEGIN
            INSERT INTO fts_messages(fts_messages, rowid, content)
            VALUES ('delete', old.message_id, old.content);
            INSERT INTO fts_messages(rowid, content) VALUES (new.message_id, new.content);
        END;

        CREATE TRIGGER IF NOT EXISTS tool_uses_ai AFTER INSERT ON tool_uses BEGIN
            INSERT INTO fts_tool_uses(rowid, tool_input, tool_result)
            VALUES (new.id, new.tool_input, new.tool_result);
        END;

        CREATE TRIGGER IF NOT EXISTS tool_uses_ad AFTER DELETE ON tool_uses BEGIN
            INSERT INTO fts_tool_uses(fts_tool_uses, rowid, tool_input, tool_result)
            VALUES ('delete', old.id, old.tool_input, old.tool_result);
        END;

        CREATE TRIGGER IF NOT EXISTS tool_uses_au AFTER UPDATE ON tool_uses BEGIN
            INSERT INTO fts_tool_uses(fts_tool_uses, rowid, tool_input, tool_result)
            VALUES ('delete', old.id, old.tool_input, old.tool_result);
            INSERT INTO fts_tool_uses(rowid, tool_input, tool_result)
            VALUES (new.id, new.tool_input, new.tool_result);
        END;
        "#,
    )?;

    if adopted {
        rebuild_fts(conn)?;
    }
    conn.execute(&format!("PRAGMA user_version = {}", SCHEMA_VERSION), [])?;

    Ok(())
}

/// Repopulate both full-text indexes from their base tables.
pub fn rebuild_fts(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        INSERT INTO fts_messages(fts_messages) VALUES ('rebuild');
        INSERT INTO fts_tool_uses(fts_tool_uses) VALUES ('rebuild');
        "#,
    )?;
    Ok(())
}

fn drop_all_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        DROP TABLE IF EXISTS fts_tool_uses;
        DROP TABLE IF EXISTS fts_messages;
        DROP TABLE IF EXISTS tool_uses;
        DROP TABLE IF EXISTS messages;
        DROP TABLE IF EXISTS sessions;
        DROP TABLE IF EXISTS projects;
        "#,
    )?;
    Ok(())
}
