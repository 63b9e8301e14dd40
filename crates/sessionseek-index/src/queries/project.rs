use rusqlite::{Connection, OptionalExtension, params};
use sessionseek_types::ProjectId;

use crate::{Result, records::ProjectRecord};

pub fn insert_or_update(conn: &Connection, project: &ProjectRecord) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO projects (project_id, project_name, created_at)
        VALUES (?1, ?2, ?3)
        ON CONFLICT(project_id) DO UPDATE SET
            project_name = ?2,
            created_at = COALESCE(?3, created_at)
        "#,
        params![
            project.project_id.as_str(),
            &project.project_name,
            &project.created_at
        ],
    )?;

    Ok(())
}

pub fn get(conn: &Connection, project_id: &str) -> Result<Option<ProjectRecord>> {
    let result = conn
        .query_row(
            r#"
        SELECT project_id, project_name, created_at
        FROM projects
        WHERE project_id = ?1
        "#,
            [project_id],
            |row| {
                Ok(ProjectRecord {
                    project_id: ProjectId::from(row.get::<_, String>(0)?),
                    project_name: row.get(1)?,
                    created_at: row.get(2)?,
                })
            },
        )
        .optional()?;

    Ok(result)
}
