use super::Output;
use crate::presentation::{plain, to_json};
use crate::types::OutputFormat;
use anyhow::Result;
use sessionseek_runtime::SearchOps;

pub fn handle(search: &SearchOps, output: &Output) -> Result<()> {
    let names = search.list_tool_names()?;

    match output.format {
        OutputFormat::Json => println!("{}", to_json(&names)?),
        OutputFormat::Plain => print!("{}", plain::render_tools(&names)),
    }
    Ok(())
}
