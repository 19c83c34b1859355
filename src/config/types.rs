//! Manifest type definitions

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::encoder::{is_identifier, EncodeOptions};
use crate::error::{ClgenError, ClgenResult};

use super::loader;

/// Banner written at the top of every generated header
pub const BANNER: &str = "Generated by clgen from OpenCL sources. Do not edit.";

/// The list of bundles to build plus header-wide settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default = "default_namespace")]
    pub namespace: String,

    #[serde(default)]
    pub size_constants: bool,

    #[serde(default = "default_true")]
    pub banner: bool,

    #[serde(default, rename = "bundle")]
    pub bundles: Vec<BundleConfig>,
}

/// One generated header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleConfig {
    pub name: String,

    /// Directory holding the sources and the output, relative to the root
    pub dir: PathBuf,

    /// Header file name, relative to `dir`
    pub output: PathBuf,

    #[serde(default, rename = "item")]
    pub items: Vec<ItemConfig>,
}

/// One constant inside a header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemConfig {
    pub identifier: String,

    pub entry: String,

    #[serde(default)]
    pub includes: Vec<String>,

    /// Files whose `#include` lines are replaced verbatim after resolution
    #[serde(default)]
    pub substitutions: Vec<String>,

    #[serde(default = "default_true")]
    pub minify: bool,
}

fn default_namespace() -> String {
    "xmrig".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            size_constants: false,
            banner: true,
            bundles: Vec::new(),
        }
    }
}

impl BundleConfig {
    /// Absolute directory of this bundle under `root`
    pub fn dir_in(&self, root: &Path) -> PathBuf {
        root.join(&self.dir)
    }

    /// Path of the generated header under `root`
    pub fn output_in(&self, root: &Path) -> PathBuf {
        self.dir_in(root).join(&self.output)
    }
}

impl Manifest {
    /// Load a manifest file, logging non-fatal warnings
    pub fn load(path: &Path) -> ClgenResult<Self> {
        let (manifest, warnings) = loader::load_with_warnings(path)?;
        for warning in &warnings {
            warning.log();
        }
        Ok(manifest)
    }

    /// The manifest shipped inside the binary
    pub fn builtin() -> ClgenResult<Self> {
        toml::from_str(super::DEFAULT_MANIFEST).map_err(|e| ClgenError::InvalidManifest {
            file: PathBuf::from("<built-in>"),
            message: e.to_string(),
        })
    }

    pub fn bundle(&self, name: &str) -> Option<&BundleConfig> {
        self.bundles.iter().find(|b| b.name == name)
    }

    /// Bundles named in `names`, in manifest order; all bundles when empty
    pub fn select(&self, names: &[String]) -> ClgenResult<Vec<&BundleConfig>> {
        if let Some(unknown) = names.iter().find(|n| self.bundle(n).is_none()) {
            return Err(ClgenError::UnknownBundle {
                name: unknown.clone(),
            });
        }
        Ok(self
            .bundles
            .iter()
            .filter(|b| names.is_empty() || names.contains(&b.name))
            .collect())
    }

    pub fn encode_options(&self) -> EncodeOptions {
        EncodeOptions {
            size_constants: self.size_constants,
            banner: self.banner.then(|| BANNER.to_string()),
        }
    }

    /// Structural checks serde cannot express
    pub fn validate(&self, file: &Path) -> ClgenResult<()> {
        let invalid = |message: String| ClgenError::InvalidManifest {
            file: file.to_path_buf(),
            message,
        };

        if self.namespace.split("::").any(|s| !is_identifier(s)) {
            return Err(ClgenError::InvalidIdentifier {
                identifier: self.namespace.clone(),
            });
        }

        let mut names = HashSet::new();
        for bundle in &self.bundles {
            if !names.insert(bundle.name.as_str()) {
                return Err(ClgenError::DuplicateBundle {
                    name: bundle.name.clone(),
                });
            }
            if bundle.items.is_empty() {
                return Err(invalid(format!("bundle '{}' has no items", bundle.name)));
            }
            for item in &bundle.items {
                if !is_identifier(&item.identifier) {
                    return Err(ClgenError::InvalidIdentifier {
                        identifier: item.identifier.clone(),
                    });
                }
                if item.entry.trim().is_empty() {
                    return Err(invalid(format!(
                        "item '{}' in bundle '{}' has an empty entry",
                        item.identifier, bundle.name
                    )));
                }
            }
        }
        Ok(())
    }
}
