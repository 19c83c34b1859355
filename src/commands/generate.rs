use anyhow::{Context as _, Result};
use clgen::fs::LocalFs;
use clgen::pipeline::{generate, write_headers, WriteOptions};

use super::{display_path, Context};
use crate::ui::json::emit;

pub fn cmd_generate(ctx: &Context, bundles: &[String], options: WriteOptions) -> Result<()> {
    let manifest = ctx.load_manifest()?;
    let fs = LocalFs::new();

    if ctx.json {
        emit(serde_json::json!({
            "event": "start",
            "command": "generate",
            "bundles": bundles,
            "dry_run": options.dry_run,
        }))?;
    }

    let headers =
        generate(&fs, &ctx.root, &manifest, bundles).context("header generation failed")?;
    let written = write_headers(&fs, &headers, options).context("failed to write headers")?;

    for header in &headers {
        if ctx.json {
            emit(serde_json::json!({
                "event": "header",
                "bundle": header.bundle,
                "path": header.path,
                "bytes": header.content.len(),
                "hash": header.hash,
                "items": header.sources.iter().map(|s| &s.identifier).collect::<Vec<_>>(),
            }))?;
        } else {
            let verb = if options.dry_run { "Would write" } else { "Wrote" };
            println!(
                "{verb} {} ({} bytes, {})",
                display_path(&ctx.root, &header.path),
                header.content.len(),
                header.hash.short()
            );
        }
    }

    if ctx.json {
        emit(serde_json::json!({
            "event": "complete",
            "command": "generate",
            "status": "success",
            "headers": headers.len(),
            "files": written.len(),
            "dry_run": options.dry_run,
        }))?;
    } else if options.dry_run {
        println!("Dry run: {} file(s) not written", written.len());
    } else if options.emit_source {
        println!(
            "{} header(s) and {} source file(s) written",
            headers.len(),
            written.len() - headers.len()
        );
    }

    Ok(())
}
