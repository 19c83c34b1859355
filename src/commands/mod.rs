//! Subcommand implementations

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clgen::config::{load_or_default, Manifest};

pub mod check;
pub mod generate;
pub mod list;

/// Settings shared by every subcommand
#[derive(Debug, Clone)]
pub struct Context {
    pub root: PathBuf,
    pub manifest: Option<PathBuf>,
    pub json: bool,
}

impl Context {
    /// Resolve the manifest for this run; a relative `--manifest` is taken
    /// as given, not relative to `--root`.
    pub fn load_manifest(&self) -> Result<Manifest> {
        load_or_default(&self.root, self.manifest.as_deref()).with_context(|| {
            match &self.manifest {
                Some(path) => format!("failed to load manifest {}", path.display()),
                None => format!("failed to load manifest for {}", self.root.display()),
            }
        })
    }
}

/// Render `path` relative to `root` when it lies below it
pub fn display_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}
