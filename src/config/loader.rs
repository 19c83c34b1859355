//! Manifest loading

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{ClgenError, ClgenResult};

use super::types::Manifest;

/// File name looked up in the project root when no manifest is given
pub const MANIFEST_FILE: &str = "clgen.toml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl ConfigWarning {
    pub fn log(&self) {
        let location = match self.line {
            Some(line) => format!("{}:{}", self.file.display(), line),
            None => self.file.display().to_string(),
        };
        match &self.suggestion {
            Some(suggestion) => warn!(
                "unknown manifest key '{}' at {} (did you mean '{}'?)",
                self.key, location, suggestion
            ),
            None => warn!("unknown manifest key '{}' at {}", self.key, location),
        }
    }
}

/// Load a manifest and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> ClgenResult<(Manifest, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ClgenError::MissingFile {
            path: path.to_path_buf(),
        },
        _ => ClgenError::Io(e),
    })?;
    parse_with_warnings(&content, path)
}

/// Parse manifest text; `file` is used for messages only.
pub fn parse_with_warnings(
    content: &str,
    file: &Path,
) -> ClgenResult<(Manifest, Vec<ConfigWarning>)> {
    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(content);

    let manifest: Manifest = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| ClgenError::InvalidManifest {
        file: file.to_path_buf(),
        message: e.to_string(),
    })?;
    manifest.validate(file)?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: file.to_path_buf(),
                line: find_line_number(content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((manifest, warnings))
}

/// Pick the manifest: an explicit file, `<root>/clgen.toml`, or the built-in one.
///
/// Environment overrides (`CLGEN_*`) are applied last.
pub fn load_or_default(root: &Path, explicit: Option<&Path>) -> ClgenResult<Manifest> {
    let manifest = match explicit {
        Some(path) => {
            debug!(manifest = %path.display(), "loading manifest");
            Manifest::load(path)?
        }
        None => {
            let project_manifest = root.join(MANIFEST_FILE);
            if project_manifest.is_file() {
                debug!(manifest = %project_manifest.display(), "loading project manifest");
                Manifest::load(&project_manifest)?
            } else {
                debug!("using built-in manifest");
                Manifest::builtin()?
            }
        }
    };

    let manifest = with_env_overrides(manifest);
    manifest.validate(explicit.unwrap_or(Path::new(MANIFEST_FILE)))?;
    Ok(manifest)
}

/// Apply environment variable overrides (CLGEN_* prefix)
pub fn with_env_overrides(manifest: Manifest) -> Manifest {
    with_overrides_from(manifest, |key| std::env::var(key).ok())
}

/// Apply overrides from any key lookup
pub fn with_overrides_from(
    mut manifest: Manifest,
    lookup: impl Fn(&str) -> Option<String>,
) -> Manifest {
    // CLGEN_NAMESPACE
    if let Some(namespace) = lookup("CLGEN_NAMESPACE") {
        let namespace = namespace.trim();
        if !namespace.is_empty() {
            manifest.namespace = namespace.to_string();
        }
    }

    // CLGEN_SIZE_CONSTANTS
    if let Some(val) = lookup("CLGEN_SIZE_CONSTANTS") {
        manifest.size_constants = val.to_lowercase() != "false" && val != "0";
    }

    manifest
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "namespace",
        "size_constants",
        "banner",
        "bundle",
        "name",
        "dir",
        "output",
        "item",
        "identifier",
        "entry",
        "includes",
        "substitutions",
        "minify",
    ];

    CANDIDATES
        .iter()
        .map(|candidate| (candidate, edit_distance(unknown, candidate)))
        .min_by_key(|&(_, dist)| dist)
        .filter(|&(_, dist)| dist <= 2)
        .map(|(candidate, _)| candidate.to_string())
}

/// Edit distance over chars, keeping a single row of the table.
fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitute = diagonal + usize::from(ca != cb);
            diagonal = row[j + 1];
            row[j + 1] = substitute.min(row[j] + 1).min(diagonal + 1);
        }
    }
    row[b.len()]
}
