//! `dictpack remove <id>` – uninstall an installed artifact.

use anyhow::Result;
use dictpack_core::pipeline::Pipeline;

/// Removes the installed copy of `id`. Succeeds when nothing is installed,
/// so repeated removals are not an error.
pub fn run_remove(pipeline: &Pipeline, id: &str) -> Result<()> {
    pipeline.uninstall(id)?;
    println!("Removed {id}");
    Ok(())
}
