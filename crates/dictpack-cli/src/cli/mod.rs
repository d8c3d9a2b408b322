//! CLI for the dictpack dictionary manager.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dictpack_core::catalog::ArtifactCatalog;
use dictpack_core::config;
use dictpack_core::pipeline::Pipeline;

use commands::{run_fetch, run_install, run_list, run_remove};

/// Top-level CLI for the dictpack dictionary manager.
#[derive(Debug, Parser)]
#[command(name = "dictpack")]
#[command(about = "dictpack: fetch, verify and install dictionary artifacts", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// List catalog artifacts and their current install state.
    List,

    /// Download an artifact into the staging directory.
    Fetch {
        /// Artifact identifier (e.g. "main_en").
        id: String,
        /// Validate and install immediately after a successful download.
        #[arg(long)]
        install: bool,
    },

    /// Validate a staged artifact and install it under its locale directory.
    Install {
        /// Artifact identifier.
        id: String,
    },

    /// Uninstall an installed artifact.
    Remove {
        /// Artifact identifier.
        id: String,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let catalog = match &cfg.catalog_path {
            Some(path) => ArtifactCatalog::load(path)?,
            None => ArtifactCatalog::builtin(),
        };
        let pipeline = Pipeline::new(catalog, cfg.staging_dir()?, cfg.install_root()?);

        match cli.command {
            CliCommand::List => run_list(&pipeline)?,
            CliCommand::Fetch { id, install } => run_fetch(&pipeline, &id, install)?,
            CliCommand::Install { id } => run_install(&pipeline, &id)?,
            CliCommand::Remove { id } => run_remove(&pipeline, &id)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fetch_with_install_flag() {
        let cli = Cli::parse_from(["dictpack", "fetch", "main_en", "--install"]);
        match cli.command {
            CliCommand::Fetch { id, install } => {
                assert_eq!(id, "main_en");
                assert!(install);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_list() {
        let cli = Cli::parse_from(["dictpack", "list"]);
        assert!(matches!(cli.command, CliCommand::List));
    }

    #[test]
    fn parses_remove_with_id() {
        let cli = Cli::parse_from(["dictpack", "remove", "main_sv"]);
        match cli.command {
            CliCommand::Remove { id } => assert_eq!(id, "main_sv"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn fetch_requires_an_id() {
        assert!(Cli::try_parse_from(["dictpack", "fetch"]).is_err());
    }
}
