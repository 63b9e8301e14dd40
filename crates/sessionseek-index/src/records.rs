use serde::Serialize;
use sessionseek_types::{ProjectId, Role};

/// Project metadata record from the index database.
///
/// Owning collection of sessions, written by the ingestion pipeline.
#[derive(Debug, Clone)]
pub struct ProjectRecord {
    /// Project identifier.
    pub project_id: ProjectId,
    /// Human-readable project name shown next to matches.
    pub project_name: String,
    /// When the project was first seen (ISO 8601 timestamp).
    pub created_at: Option<String>,
}

/// Session metadata record from the index database.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    /// Opaque session identifier.
    pub session_id: String,
    /// Project this session belongs to.
    pub project_id: ProjectId,
    /// Session start timestamp (ISO 8601).
    pub start_time: Option<String>,
    /// Session end timestamp (ISO 8601), if completed.
    pub end_time: Option<String>,
}

/// Conversational message.
///
/// Identity is `(session_id, message_index)`; re-ingesting the same pair
/// updates the stored row.
#[derive(Debug, Clone)]
pub struct MessageRecord {
    pub session_id: String,
    /// Position of the message within its session.
    pub message_index: i64,
    pub role: Role,
    pub content: String,
    pub timestamp: Option<String>,
}

/// Tool invocation with its input and result payloads.
///
/// Identity is `tool_use_id`.
#[derive(Debug, Clone)]
pub struct ToolUseRecord {
    pub tool_use_id: String,
    pub session_id: String,
    /// Index of the message that issued the call.
    pub message_index: i64,
    pub tool_name: String,
    pub tool_input: String,
    pub tool_result: Option<String>,
    pub is_error: bool,
    pub timestamp: Option<String>,
}

/// Row counts of the base tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CorpusStats {
    pub sessions: usize,
    pub messages: usize,
    pub tool_uses: usize,
}
