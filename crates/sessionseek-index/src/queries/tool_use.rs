use rusqlite::{Connection, params};

use crate::{Result, records::ToolUseRecord};

/// Upsert keyed by `tool_use_id`.
pub fn insert_or_update(conn: &Connection, tool_use: &ToolUseRecord) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO tool_uses (tool_use_id, session_id, message_index, tool_name,
                               tool_input, tool_result, is_error, timestamp)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        ON CONFLICT(tool_use_id) DO UPDATE SET
            session_id = ?2,
            message_index = ?3,
            tool_name = ?4,
            tool_input = ?5,
            tool_result = COALESCE(?6, tool_result),
            is_error = ?7,
            timestamp = COALESCE(?8, timestamp)
        "#,
        params![
            &tool_use.tool_use_id,
            &tool_use.session_id,
            tool_use.message_index,
            &tool_use.tool_name,
            &tool_use.tool_input,
            &tool_use.tool_result,
            tool_use.is_error,
            &tool_use.timestamp
        ],
    )?;

    Ok(())
}

/// Distinct tool names, ascending.
pub fn list_names(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT DISTINCT tool_name
        FROM tool_uses
        ORDER BY tool_name ASC
        "#,
    )?;

    let names = stmt
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<Vec<String>, rusqlite::Error>>()?;

    Ok(names)
}

pub fn count(conn: &Connection) -> Result<usize> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM tool_uses", [], |row| row.get(0))?;
    Ok(count as usize)
}
