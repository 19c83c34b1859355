use anyhow::{Context as _, Result};
use clgen::fs::LocalFs;
use clgen::pipeline::{check, generate, HeaderStatus};

use super::{display_path, Context};
use crate::ui::json::{emit, event_with};

pub fn cmd_check(ctx: &Context, bundles: &[String]) -> Result<()> {
    let manifest = ctx.load_manifest()?;
    let fs = LocalFs::new();

    let headers =
        generate(&fs, &ctx.root, &manifest, bundles).context("header generation failed")?;
    let report = check(&fs, &headers).context("failed to read headers")?;

    let outdated = report.iter().filter(|e| !e.is_current()).count();

    if ctx.json {
        for entry in &report {
            emit(event_with("header", entry))?;
        }
        emit(serde_json::json!({
            "event": "complete",
            "command": "check",
            "status": if outdated == 0 { "success" } else { "failure" },
            "headers": report.len(),
            "outdated": outdated,
        }))?;
    } else {
        for entry in &report {
            let path = display_path(&ctx.root, &entry.path);
            match &entry.status {
                HeaderStatus::Current => println!("  OK     {path}"),
                HeaderStatus::Missing => println!("  MISS   {path}"),
                HeaderStatus::Stale { changed, diff } => {
                    if changed.is_empty() {
                        println!("  STALE  {path}");
                    } else {
                        println!("  STALE  {path} ({})", changed.join(", "));
                    }
                    for line in diff.lines() {
                        println!("         {line}");
                    }
                }
            }
        }
        if outdated == 0 {
            println!("All {} header(s) are current", report.len());
        } else {
            println!(
                "{outdated} of {} header(s) are out of date; run `clgen generate`",
                report.len()
            );
        }
    }

    if outdated > 0 {
        std::process::exit(1);
    }
    Ok(())
}
