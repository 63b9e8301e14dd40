pub mod count;
pub mod records;
pub mod reindex;
pub mod search;
pub mod tools;

use crate::args::FilterArgs;
use crate::presentation::highlight::Highlighter;
use crate::presentation::plain::Style;
use crate::types::OutputFormat;
use is_terminal::IsTerminal;
use sessionseek_runtime::Config;
use sessionseek_types::SearchFilters;

/// Where and how a handler prints its result.
pub struct Output {
    pub format: OutputFormat,
    pub style: Style,
}

impl Output {
    pub fn new(format: OutputFormat, config: &Config) -> Self {
        let color = format == OutputFormat::Plain && std::io::stdout().is_terminal();
        let highlighter = Highlighter::new(
            &config.search.highlight_open,
            &config.search.highlight_close,
            color,
        );
        Self {
            format,
            style: Style { color, highlighter },
        }
    }
}

impl From<FilterArgs> for SearchFilters {
    fn from(args: FilterArgs) -> Self {
        SearchFilters {
            project_id: args.project.map(Into::into),
            tool_name: args.tool,
            start_time: args.since,
            end_time: args.until,
        }
    }
}
