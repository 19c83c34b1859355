//! CLI Argument Parsing
//!
//! Global flags (--root, --manifest, --json, --verbose) are inherited by all
//! subcommands. Running `clgen` without a subcommand is `clgen generate`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// clgen - embed OpenCL kernel sources in C++ headers
#[derive(Parser, Debug)]
#[command(name = "clgen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Project root; bundle directories are relative to it
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Bundle manifest (default: ROOT/clgen.toml, else the built-in one)
    #[arg(long, global = true, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Output format for CI
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Build bundles and write their headers
    Generate {
        /// Bundle to build (can be specified multiple times; default: all)
        #[arg(short, long = "bundle", value_name = "NAME")]
        bundles: Vec<String>,

        /// Dry run - show what would be written
        #[arg(long)]
        dry_run: bool,

        /// Also write each item's final source as <identifier>_gen.cl
        #[arg(long)]
        emit_source: bool,
    },

    /// Verify that headers on disk match a fresh build (exits 1 if not)
    Check {
        /// Bundle to check (can be specified multiple times; default: all)
        #[arg(short, long = "bundle", value_name = "NAME")]
        bundles: Vec<String>,
    },

    /// List the manifest's bundles
    List,
}

impl Cli {
    /// The subcommand to run; `generate` with defaults when none was given
    pub fn command_or_default(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Generate {
            bundles: Vec::new(),
            dry_run: false,
            emit_source: false,
        })
    }
}
