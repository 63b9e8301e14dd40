use super::Output;
use crate::presentation::{plain, to_json};
use crate::types::OutputFormat;
use anyhow::Result;
use sessionseek_runtime::SessionSeek;

pub fn handle(workspace: &SessionSeek, output: &Output) -> Result<()> {
    let stats = workspace.reindex()?;

    match output.format {
        OutputFormat::Json => println!("{}", to_json(&stats)?),
        OutputFormat::Plain => print!("{}", plain::render_reindex(&stats)),
    }
    Ok(())
}
