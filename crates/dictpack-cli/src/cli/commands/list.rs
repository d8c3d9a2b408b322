//! `dictpack list` – catalog entries with their current install state.

use anyhow::Result;
use dictpack_core::pipeline::Pipeline;

pub fn run_list(pipeline: &Pipeline) -> Result<()> {
    println!("{:<14} {:<24} {}", "ID", "NAME", "STATE");
    for artifact in pipeline.catalog().list() {
        let state = pipeline.state(&artifact.id)?;
        println!("{:<14} {:<24} {}", artifact.id, artifact.display_name, state);
    }
    Ok(())
}
