use anyhow::Result;

use super::{display_path, Context};
use crate::ui::json::emit;

pub fn cmd_list(ctx: &Context) -> Result<()> {
    let manifest = ctx.load_manifest()?;

    if ctx.json {
        for bundle in &manifest.bundles {
            emit(serde_json::json!({
                "event": "bundle",
                "name": bundle.name,
                "output": bundle.output_in(&ctx.root),
                "items": bundle.items.iter().map(|i| &i.identifier).collect::<Vec<_>>(),
            }))?;
        }
        return Ok(());
    }

    println!("namespace {}", manifest.namespace);
    for bundle in &manifest.bundles {
        println!(
            "{:<12} {}",
            bundle.name,
            display_path(&ctx.root, &bundle.output_in(&ctx.root))
        );
        for item in &bundle.items {
            let mut notes = Vec::new();
            if !item.includes.is_empty() {
                notes.push(format!("{} include(s)", item.includes.len()));
            }
            if !item.substitutions.is_empty() {
                notes.push(format!("{} substitution(s)", item.substitutions.len()));
            }
            if !item.minify {
                notes.push("not minified".to_string());
            }
            if notes.is_empty() {
                println!("    {} <- {}", item.identifier, item.entry);
            } else {
                println!(
                    "    {} <- {} [{}]",
                    item.identifier,
                    item.entry,
                    notes.join(", ")
                );
            }
        }
    }

    Ok(())
}
