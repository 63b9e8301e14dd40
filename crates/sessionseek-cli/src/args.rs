use crate::types::{LogLevel, OutputFormat, RoleArg};
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sessionseek")]
#[command(about = "Full-text search over conversation logs, paged by session", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Workspace directory (default: $SESSIONSEEK_PATH, then the XDG data dir)
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    #[arg(long, default_value = "plain", global = true)]
    pub format: OutputFormat,

    #[arg(long, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search and group matches by session, newest match first
    Search {
        /// Match query, passed to the index as written
        query: String,

        /// all, messages, tool-inputs or tool-results
        #[arg(long, default_value = "all")]
        scope: String,

        #[command(flatten)]
        filters: FilterArgs,

        /// Sessions per page (default from config.toml)
        #[arg(long, allow_negative_numbers = true)]
        per_page: Option<i64>,

        /// Zero-based page index
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        page: i64,
    },

    /// List matching records without grouping, most relevant first
    Records {
        query: String,

        #[arg(long, default_value = "all")]
        scope: String,

        #[command(flatten)]
        filters: FilterArgs,

        /// Only messages with this role; tool records are kept
        #[arg(long)]
        role: Option<RoleArg>,

        #[arg(long, default_value = "20", allow_negative_numbers = true)]
        limit: i64,

        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        offset: i64,
    },

    /// Count matching records in one session
    Count {
        query: String,

        #[arg(long)]
        session: String,

        #[arg(long, default_value = "all")]
        scope: String,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// List distinct tool names
    Tools,

    /// Rebuild the full-text indexes from stored records
    Reindex,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    #[arg(long)]
    pub project: Option<String>,

    #[arg(long)]
    pub tool: Option<String>,

    /// RFC 3339 timestamp or YYYY-MM-DD
    #[arg(long)]
    pub since: Option<String>,

    /// RFC 3339 timestamp or YYYY-MM-DD (a bare date covers the whole day)
    #[arg(long)]
    pub until: Option<String>,
}
