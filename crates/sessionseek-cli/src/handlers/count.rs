use super::Output;
use crate::args::FilterArgs;
use crate::presentation::{plain, to_json};
use crate::types::OutputFormat;
use anyhow::Result;
use sessionseek_runtime::SearchOps;
use sessionseek_types::{SearchFilters, SearchScope};

pub fn handle(
    search: &SearchOps,
    query: &str,
    session_id: &str,
    scope: &str,
    filters: FilterArgs,
    output: &Output,
) -> Result<()> {
    let scope: SearchScope = scope.parse().map_err(sessionseek_runtime::Error::from)?;
    let filters = SearchFilters::from(filters);

    let count = search.count_matches_in_session(query, session_id, scope, &filters)?;

    match output.format {
        OutputFormat::Json => println!(
            "{}",
            to_json(&serde_json::json!({ "session_id": session_id, "matches": count }))?
        ),
        OutputFormat::Plain => print!("{}", plain::render_count(count, session_id)),
    }
    Ok(())
}
