//! Bundle manifest
//!
//! Resolution order:
//! 1. `--manifest FILE` (highest priority)
//! 2. Project manifest (`<root>/clgen.toml`)
//! 3. Built-in manifest (lowest priority)
//!
//! Environment variables (`CLGEN_*`) override header-wide settings of
//! whichever manifest was chosen.

mod loader;
mod types;

pub use loader::{
    load_or_default, load_with_warnings, parse_with_warnings, with_env_overrides,
    with_overrides_from, ConfigWarning, MANIFEST_FILE,
};
pub use types::{BundleConfig, ItemConfig, Manifest, BANNER};

/// TOML source of [`Manifest::builtin`]
pub const DEFAULT_MANIFEST: &str = include_str!("default_manifest.toml");
