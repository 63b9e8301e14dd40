use super::Output;
use crate::args::FilterArgs;
use crate::presentation::{plain, to_json};
use crate::types::OutputFormat;
use anyhow::Result;
use sessionseek_runtime::SearchOps;
use sessionseek_types::SearchFilters;

pub fn handle(
    search: &SearchOps,
    query: &str,
    scope: &str,
    filters: FilterArgs,
    per_page: Option<i64>,
    page: i64,
    output: &Output,
) -> Result<()> {
    let per_page = per_page.unwrap_or_else(|| search.default_page_size());
    let filters = SearchFilters::from(filters);

    let results = search.search_grouped_by_scope_name(query, scope, &filters, per_page, page)?;

    match output.format {
        OutputFormat::Json => println!("{}", to_json(&results)?),
        OutputFormat::Plain => print!(
            "{}",
            plain::render_grouped(&results, query, page, &output.style)
        ),
    }
    Ok(())
}
