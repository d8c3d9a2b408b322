//! `dictpack fetch <id>` – download an artifact into the staging directory.

use anyhow::Result;
use dictpack_core::pipeline::Pipeline;

/// Downloads `id` to its staging path. With `install`, chains validation and
/// install on success; the staged copy is consumed by the install.
pub fn run_fetch(pipeline: &Pipeline, id: &str, install: bool) -> Result<()> {
    pipeline.download(id)?;
    println!("Fetched {id}");
    if install {
        let target = pipeline.install(id)?;
        println!("Installed {id} at {}", target.display());
    }
    Ok(())
}
