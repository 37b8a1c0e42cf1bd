//! CLI argument parsing for `ccl`.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// ccl: serialized read-modify-write of cloud config documents.
///
/// Cloud configs are addressed by director and config name. Every update
/// fetches the current document, changes it, and writes it back while
/// holding the lock for that pair; concurrent updates queue up in order.
#[derive(Parser, Debug)]
#[command(name = "ccl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration file (missing file means defaults).
    #[arg(short, long, global = true, default_value = "ccl.yml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Available commands for ccl.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the current cloud config.
    Show(ShowArgs),

    /// Merge YAML fragments into a cloud config.
    ///
    /// Each fragment is applied as its own locked update. All updates are
    /// issued at once and contend for the same lock, so they are applied
    /// one after another in the order given.
    Merge(MergeArgs),

    /// Replace a cloud config with the contents of a file.
    Put(PutArgs),
}

/// Director and config name addressing one cloud config.
#[derive(Args, Debug, Clone)]
pub struct Target {
    /// Director serving the cloud config.
    pub director: String,

    /// Name of the cloud config.
    pub name: String,
}

/// Arguments for the `show` command.
#[derive(Parser, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub target: Target,

    /// Print JSON instead of YAML.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `merge` command.
#[derive(Parser, Debug)]
pub struct MergeArgs {
    #[command(flatten)]
    pub target: Target,

    /// YAML fragments to merge, applied in order.
    #[arg(required = true)]
    pub fragments: Vec<PathBuf>,
}

/// Arguments for the `put` command.
#[derive(Parser, Debug)]
pub struct PutArgs {
    #[command(flatten)]
    pub target: Target,

    /// YAML file holding the new cloud config.
    pub file: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_merge_with_fragments() {
        let cli = Cli::try_parse_from(["ccl", "merge", "dirA", "cfgX", "a.yml", "b.yml"]).unwrap();

        assert_eq!(cli.config, PathBuf::from("ccl.yml"));
        match cli.command {
            Command::Merge(args) => {
                assert_eq!(args.target.director, "dirA");
                assert_eq!(args.target.name, "cfgX");
                assert_eq!(args.fragments.len(), 2);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn merge_requires_a_fragment() {
        assert!(Cli::try_parse_from(["ccl", "merge", "dirA", "cfgX"]).is_err());
    }

    #[test]
    fn global_config_flag_after_subcommand() {
        let cli =
            Cli::try_parse_from(["ccl", "show", "dirA", "cfgX", "--json", "-c", "other.yml"])
                .unwrap();

        assert_eq!(cli.config, PathBuf::from("other.yml"));
        assert!(matches!(cli.command, Command::Show(ShowArgs { json: true, .. })));
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
