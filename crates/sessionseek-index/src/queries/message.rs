use rusqlite::{Connection, params};

use crate::{Result, records::MessageRecord};

/// Upsert keyed by `(session_id, message_index)`.
///
/// The conflict branch updates the existing row, so its rowid and therefore
/// its full-text entry are replaced rather than duplicated.
pub fn insert_or_update(conn: &Connection, message: &MessageRecord) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO messages (session_id, message_index, role, content, timestamp)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ON CONFLICT(session_id, message_index) DO UPDATE SET
            role = ?3,
            content = ?4,
            timestamp = COALESCE(?5, timestamp)
        "#,
        params![
            &message.session_id,
            message.message_index,
            message.role.as_str(),
            &message.content,
            &message.timestamp
        ],
    )?;

    Ok(())
}

pub fn count(conn: &Connection) -> Result<usize> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM messages", [], |row| row.get(0))?;
    Ok(count as usize)
}
