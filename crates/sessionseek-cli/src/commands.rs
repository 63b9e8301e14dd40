use super::args::{Cli, Commands};
use super::handlers::{self, Output};
use crate::types::OutputFormat;
use anyhow::Result;
use sessionseek_runtime::{ErrorKind, SearchOps, SessionSeek, resolve_workspace_path};
use std::path::Path;
use tracing::debug;

pub fn run(cli: Cli) -> Result<()> {
    let data_dir = resolve_workspace_path(cli.data_dir.as_deref())?;
    debug!(data_dir = %data_dir.display(), "resolved workspace");
    let format = cli.format;

    match cli.command {
        Commands::Search {
            query,
            scope,
            filters,
            per_page,
            page,
        } => {
            let (search, output) = reader(&data_dir, format)?;
            handlers::search::handle(&search, &query, &scope, filters, per_page, page, &output)
        }

        Commands::Records {
            query,
            scope,
            filters,
            role,
            limit,
            offset,
        } => {
            let (search, output) = reader(&data_dir, format)?;
            handlers::records::handle(
                &search, &query, &scope, filters, role, limit, offset, &output,
            )
        }

        Commands::Count {
            query,
            session,
            scope,
            filters,
        } => {
            let (search, output) = reader(&data_dir, format)?;
            handlers::count::handle(&search, &query, &session, &scope, filters, &output)
        }

        Commands::Tools => {
            let (search, output) = reader(&data_dir, format)?;
            handlers::tools::handle(&search, &output)
        }

        // the only command that opens the corpus for writing
        Commands::Reindex => {
            let workspace = SessionSeek::open(&data_dir)?;
            let output = Output::new(format, workspace.config());
            handlers::reindex::handle(&workspace, &output)
        }
    }
}

fn reader(data_dir: &Path, format: OutputFormat) -> Result<(SearchOps, Output)> {
    let search = SearchOps::open(data_dir)?;
    let output = Output::new(format, search.config());
    Ok((search, output))
}

/// Process exit status for a failed command.
///
/// 2 malformed query, 3 rejected parameters, 4 index unavailable, 1 anything else.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    let Some(err) = err.downcast_ref::<sessionseek_runtime::Error>() else {
        return 1;
    };
    match err.kind() {
        ErrorKind::MalformedQuerySyntax => 2,
        ErrorKind::InvalidPaginationParameters
        | ErrorKind::UnknownScope
        | ErrorKind::InvalidFilter => 3,
        ErrorKind::IndexUnavailable => 4,
        ErrorKind::Internal => 1,
    }
}
