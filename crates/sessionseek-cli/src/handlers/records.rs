use super::Output;
use crate::args::FilterArgs;
use crate::presentation::{plain, to_json};
use crate::types::{OutputFormat, RoleArg};
use anyhow::Result;
use sessionseek_runtime::SearchOps;
use sessionseek_types::{SearchFilters, SearchScope};

#[allow(clippy::too_many_arguments)]
pub fn handle(
    search: &SearchOps,
    query: &str,
    scope: &str,
    filters: FilterArgs,
    role: Option<RoleArg>,
    limit: i64,
    offset: i64,
    output: &Output,
) -> Result<()> {
    let scope: SearchScope = scope.parse().map_err(sessionseek_runtime::Error::from)?;
    let filters = SearchFilters::from(filters);

    let rows = search.search_records(
        query,
        scope,
        &filters,
        role.map(Into::into),
        limit,
        offset,
    )?;

    match output.format {
        OutputFormat::Json => println!("{}", to_json(&rows)?),
        OutputFormat::Plain => print!("{}", plain::render_records(&rows, &output.style)),
    }
    Ok(())
}
