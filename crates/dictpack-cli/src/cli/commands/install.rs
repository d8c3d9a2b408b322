//! `dictpack install <id>` – validate a staged artifact and install it.

use anyhow::Result;
use dictpack_core::pipeline::Pipeline;

pub fn run_install(pipeline: &Pipeline, id: &str) -> Result<()> {
    let target = pipeline.install(id)?;
    println!("Installed {id} at {}", target.display());
    Ok(())
}
