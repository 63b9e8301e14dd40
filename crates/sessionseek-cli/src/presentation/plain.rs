use super::highlight::Highlighter;
use owo_colors::OwoColorize;
use sessionseek_runtime::CorpusStats;
use sessionseek_types::{GroupedResults, MatchDetail, MatchRow};
use std::fmt::Write;

/// Terminal styling switch for headers and highlights.
pub struct Style {
    pub color: bool,
    pub highlighter: Highlighter,
}

impl Style {
    pub fn plain() -> Self {
        Self {
            color: false,
            highlighter: Highlighter::plain(),
        }
    }

    fn header(&self, text: &str) -> String {
        if self.color {
            text.bold().cyan().to_string()
        } else {
            text.to_string()
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    fn error(&self, text: &str) -> String {
        if self.color {
            text.red().to_string()
        } else {
            text.to_string()
        }
    }
}

pub fn render_grouped(results: &GroupedResults, query: &str, page: i64, style: &Style) -> String {
    let mut out = String::new();

    if results.is_empty() {
        let _ = writeln!(
            out,
            "No sessions on page {} for \"{}\" ({} matching in total)",
            page, query, results.total_sessions
        );
        return out;
    }

    let _ = writeln!(
        out,
        "{} matching \"{}\" (page {}, showing {})",
        plural(results.total_sessions, "session"),
        query,
        page,
        results.len()
    );

    for (session_id, rows) in results.iter() {
        out.push('\n');
        let project = rows.first().map(|r| r.project_name.as_str()).unwrap_or("-");
        let latest = rows
            .first()
            .and_then(|r| r.timestamp.as_deref())
            .unwrap_or("-");
        let _ = writeln!(
            out,
            "{}  {}  {}",
            style.header(session_id),
            project,
            style.dim(&format!("latest {}", latest))
        );

        for row in rows {
            render_row(&mut out, row, "  ", style);
        }
    }

    if results.has_more {
        let _ = writeln!(out, "\n{}", style.dim(&format!("more: --page {}", page + 1)));
    }
    out
}

pub fn render_records(rows: &[MatchRow], style: &Style) -> String {
    let mut out = String::new();
    if rows.is_empty() {
        out.push_str("No matching records\n");
        return out;
    }

    for row in rows {
        let _ = writeln!(
            out,
            "{}  {}",
            style.header(&row.session_id),
            row.project_name
        );
        render_row(&mut out, row, "  ", style);
    }
    out
}

fn render_row(out: &mut String, row: &MatchRow, indent: &str, style: &Style) {
    let label = match &row.detail {
        MatchDetail::Message { role } => role.as_str().to_string(),
        MatchDetail::Tool {
            tool_name,
            is_error: true,
        } => format!("{} {}", tool_name, style.error("[error]")),
        MatchDetail::Tool { tool_name, .. } => tool_name.clone(),
    };
    let timestamp = row.timestamp.as_deref().unwrap_or("-");

    let _ = writeln!(
        out,
        "{}{:<12} {}  {}",
        indent,
        row.category.as_str(),
        label,
        style.dim(timestamp)
    );
    for line in style.highlighter.apply(&row.snippet).lines() {
        let _ = writeln!(out, "{}  {}", indent, line);
    }
}

pub fn render_count(count: usize, session_id: &str) -> String {
    format!("{} in session {}\n", plural(count, "match"), session_id)
}

pub fn render_tools(names: &[String]) -> String {
    if names.is_empty() {
        return "No tools recorded\n".to_string();
    }
    let mut out = String::new();
    for name in names {
        let _ = writeln!(out, "{}", name);
    }
    out
}

pub fn render_reindex(summary: &CorpusStats) -> String {
    format!(
        "Rebuilt search index: {}, {}, {}\n",
        plural(summary.sessions, "session"),
        plural(summary.messages, "message"),
        plural(summary.tool_uses, "tool use")
    )
}

fn plural(count: usize, noun: &str) -> String {
    match (count, noun) {
        (1, _) => format!("1 {}", noun),
        (_, "match") => format!("{} matches", count),
        _ => format!("{} {}s", count, noun),
    }
}
