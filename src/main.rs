//! clgen CLI - embed OpenCL kernel sources in C++ headers
//!
//! Usage: clgen [COMMAND]
//!
//! Commands:
//!   generate  Build bundles and write their headers (default)
//!   check     Verify that headers on disk are current
//!   list      List the manifest's bundles

use anyhow::Result;
use clap::Parser;
use clgen::pipeline::WriteOptions;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod ui;

use cli::{Cli, Commands};
use commands::{check::cmd_check, generate::cmd_generate, list::cmd_list, Context};

/// Environment variable holding a `tracing` filter, e.g. `CLGEN_LOG=clgen=debug`
const LOG_ENV: &str = "CLGEN_LOG";

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let ctx = Context {
        root: cli.root.clone(),
        manifest: cli.manifest.clone(),
        json: cli.json,
    };

    let result = match cli.command_or_default() {
        Commands::Generate {
            bundles,
            dry_run,
            emit_source,
        } => cmd_generate(
            &ctx,
            &bundles,
            WriteOptions {
                dry_run,
                emit_source,
            },
        ),
        Commands::Check { bundles } => cmd_check(&ctx, &bundles),
        Commands::List => cmd_list(&ctx),
    };

    if let Err(e) = &result {
        if ctx.json {
            let _ = ui::json::emit(serde_json::json!({
                "event": "error",
                "message": format!("{e:#}"),
            }));
        }
    }
    result
}
