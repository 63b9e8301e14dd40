use rusqlite::{Connection, params};

use crate::{Result, records::SessionRecord};

pub fn insert_or_update(conn: &Connection, session: &SessionRecord) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO sessions (session_id, project_id, start_time, end_time)
        VALUES (?1, ?2, ?3, ?4)
        ON CONFLICT(session_id) DO UPDATE SET
            project_id = ?2,
            start_time = COALESCE(?3, start_time),
            end_time = COALESCE(?4, end_time)
        "#,
        params![
            &session.session_id,
            session.project_id.as_str(),
            &session.start_time,
            &session.end_time
        ],
    )?;

    Ok(())
}

pub fn count(conn: &Connection) -> Result<usize> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))?;
    Ok(count as usize)
}
