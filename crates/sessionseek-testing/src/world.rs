//! TestWorld pattern for declarative integration test setup.
//!
//! Provides a fluent interface for:
//! - Creating an isolated workspace in a temp directory
//! - Loading projects, sessions and records into its corpus
//! - Executing CLI commands against that workspace

use anyhow::{Context, Result};
use assert_cmd::Command;
use predicates::Predicate;
use rusqlite::Connection;
use sessionseek_index::{MessageRecord, ProjectRecord, SessionRecord, ToolUseRecord};
use sessionseek_runtime::{SearchOps, SessionSeek};
use sessionseek_types::{ProjectId, Role};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Declarative test environment builder.
///
/// # Example
/// ```no_run
/// use sessionseek_testing::TestWorld;
/// use sessionseek_types::{Role, SearchFilters, SearchScope};
///
/// let world = TestWorld::new()
///     .with_project("p1", "Project One")
///     .with_session("s1", "p1")
///     .with_message("s1", Role::User, "Hello world", "2025-01-01T10:00:00");
///
/// let page = world
///     .search()
///     .search_grouped_by_session("Hello", SearchScope::Messages, &SearchFilters::new(), 3, 0)
///     .unwrap();
/// assert_eq!(page.total_sessions, 1);
/// ```
pub struct TestWorld {
    temp_dir: TempDir,
    data_dir: PathBuf,
    workspace: SessionSeek,
    env_vars: HashMap<String, String>,
    next_message_index: HashMap<String, i64>,
    next_tool_use: usize,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    /// Create a new isolated test environment with an empty corpus.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().join(".sessionseek");
        let workspace = SessionSeek::open(&data_dir).expect("Failed to open workspace");

        Self {
            temp_dir,
            data_dir,
            workspace,
            env_vars: HashMap::new(),
            next_message_index: HashMap::new(),
            next_tool_use: 0,
        }
    }

    /// Get the data directory path (.sessionseek).
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Get the temp directory root.
    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn workspace(&self) -> &SessionSeek {
        &self.workspace
    }

    /// Fresh search handle over the current corpus.
    pub fn search(&self) -> SearchOps {
        self.workspace.search()
    }

    /// Set an environment variable for CLI execution.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    /// Write `config.toml` into the data directory.
    ///
    /// Takes effect for CLI runs and for workspaces opened afterwards.
    pub fn with_config(self, toml: &str) -> Self {
        std::fs::write(self.data_dir.join("config.toml"), toml).expect("Failed to write config");
        self
    }

    /// Overwrite the corpus file's schema version stamp.
    ///
    /// Version 0 is what a loader that knows nothing of sessionseek leaves behind.
    pub fn with_schema_version(self, version: i32) -> Self {
        let conn =
            Connection::open(self.workspace.database_path()).expect("Failed to open corpus file");
        conn.pragma_update(None, "user_version", version)
            .expect("Failed to stamp schema version");
        self
    }

    /// Schema version stamp as currently stored in the corpus file.
    pub fn schema_version(&self) -> Result<i32> {
        let conn = Connection::open(self.workspace.database_path())?;
        let version = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
        Ok(version)
    }

    /// Number of stored messages, read straight from the corpus file.
    pub fn stored_messages(&self) -> Result<i64> {
        let conn = Connection::open(self.workspace.database_path())?;
        let count = conn.query_row("SELECT COUNT(*) FROM messages", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn with_project(self, project_id: &str, project_name: &str) -> Self {
        self.workspace
            .corpus()
            .insert_or_update_project(&ProjectRecord {
                project_id: ProjectId::from(project_id),
                project_name: project_name.to_string(),
                created_at: None,
            })
            .expect("Failed to insert project");
        self
    }

    pub fn with_session(self, session_id: &str, project_id: &str) -> Self {
        self.workspace
            .corpus()
            .insert_or_update_session(&SessionRecord {
                session_id: session_id.to_string(),
                project_id: ProjectId::from(project_id),
                start_time: None,
                end_time: None,
            })
            .expect("Failed to insert session");
        self
    }

    /// Append a message; its index is the next free slot in the session.
    pub fn with_message(
        mut self,
        session_id: &str,
        role: Role,
        content: &str,
        timestamp: &str,
    ) -> Self {
        let slot = self
            .next_message_index
            .entry(session_id.to_string())
            .or_insert(0);
        let message_index = *slot;
        *slot += 1;

        self.workspace
            .corpus()
            .insert_or_update_message(&MessageRecord {
                session_id: session_id.to_string(),
                message_index,
                role,
                content: content.to_string(),
                timestamp: Some(timestamp.to_string()),
            })
            .expect("Failed to insert message");
        self
    }

    /// Append a successful tool invocation with an id of the form `tool-N`.
    pub fn with_tool_use(
        self,
        session_id: &str,
        tool_name: &str,
        input: &str,
        result: Option<&str>,
        timestamp: &str,
    ) -> Self {
        self.insert_tool_use(session_id, tool_name, input, result, false, timestamp)
    }

    /// Append a failed tool invocation.
    pub fn with_tool_error(
        self,
        session_id: &str,
        tool_name: &str,
        input: &str,
        result: &str,
        timestamp: &str,
    ) -> Self {
        self.insert_tool_use(session_id, tool_name, input, Some(result), true, timestamp)
    }

    fn insert_tool_use(
        mut self,
        session_id: &str,
        tool_name: &str,
        input: &str,
        result: Option<&str>,
        is_error: bool,
        timestamp: &str,
    ) -> Self {
        let tool_use_id = format!("tool-{}", self.next_tool_use);
        self.next_tool_use += 1;
        let message_index = self
            .next_message_index
            .get(session_id)
            .copied()
            .unwrap_or(0);

        self.workspace
            .corpus()
            .insert_or_update_tool_use(&ToolUseRecord {
                tool_use_id,
                session_id: session_id.to_string(),
                message_index,
                tool_name: tool_name.to_string(),
                tool_input: input.to_string(),
                tool_result: result.map(str::to_string),
                is_error,
                timestamp: Some(timestamp.to_string()),
            })
            .expect("Failed to insert tool use");
        self
    }

    /// Configure a CLI command with this test environment's settings.
    ///
    /// The caller must provide the base command (e.g., from `cargo_bin_cmd!("sessionseek")`).
    pub fn configure_command<'a>(&self, cmd: &'a mut Command) -> &'a mut Command {
        cmd.arg("--data-dir").arg(self.data_dir());
        cmd.current_dir(self.temp_dir.path());
        cmd.env_remove("SESSIONSEEK_PATH");
        cmd.env_remove("RUST_LOG");

        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }

        cmd
    }

    /// Execute the `sessionseek` binary against this workspace.
    ///
    /// # Note
    /// This method uses `Command::cargo_bin()` which requires the binary to be
    /// built and the `CARGO_BIN_EXE_` environment variable to be set (which
    /// cargo test does automatically).
    #[allow(deprecated)]
    pub fn run(&self, args: &[&str]) -> Result<CliResult> {
        let mut cmd =
            Command::cargo_bin("sessionseek").context("Failed to find sessionseek binary")?;

        self.configure_command(&mut cmd);
        cmd.args(args);

        let output = cmd.output()?;

        Ok(CliResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Result of a CLI command execution.
#[derive(Debug)]
pub struct CliResult {
    pub status: std::process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CliResult {
    /// Check if the command succeeded.
    pub fn success(&self) -> bool {
        self.status.success()
    }

    pub fn exit_code(&self) -> Option<i32> {
        self.status.code()
    }

    /// Parse stdout as JSON.
    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.stdout)?)
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    pub fn stdout_matches(&self, predicate: impl Predicate<str>) -> bool {
        predicate.eval(self.stdout.as_str())
    }

    pub fn stderr_matches(&self, predicate: impl Predicate<str>) -> bool {
        predicate.eval(self.stderr.as_str())
    }
}
