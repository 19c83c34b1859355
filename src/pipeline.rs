//! Bundle pipeline
//!
//! For every selected bundle: resolve includes, apply substitutions, minify,
//! encode. All headers are built in memory before anything is written, so a
//! failing bundle leaves the tree untouched.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;
use similar::TextDiff;
use tracing::{debug, error, info, info_span};

use crate::config::{BundleConfig, ItemConfig, Manifest};
use crate::encoder::{decode, encode_many, encode_one};
use crate::error::ClgenResult;
use crate::fs::FileSystem;
use crate::hash::ContentHash;
use crate::minify::minify;
use crate::resolver::{apply_substitutions, resolve};

/// One item's final source text, as embedded in the header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSource {
    pub identifier: String,
    pub text: String,
}

/// A header ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedHeader {
    pub bundle: String,
    pub path: PathBuf,
    pub content: String,
    pub hash: ContentHash,
    pub sources: Vec<GeneratedSource>,
}

impl GeneratedHeader {
    /// Path of the `<identifier>_gen.cl` debug copy of one item
    pub fn source_path(&self, identifier: &str) -> PathBuf {
        let dir = self.path.parent().unwrap_or(Path::new(""));
        dir.join(format!("{identifier}_gen.cl"))
    }
}

/// Options for [`write_headers`]
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    /// Build and report, but write nothing
    pub dry_run: bool,
    /// Also write each item's minified source next to the header
    pub emit_source: bool,
}

/// Build the final text of one item.
pub fn build_item(fs: &dyn FileSystem, dir: &Path, item: &ItemConfig) -> ClgenResult<String> {
    let resolved = resolve(fs, dir, &item.entry, &item.includes)?;

    let mut overrides = IndexMap::new();
    for name in &item.substitutions {
        let text = fs.read_to_string(&dir.join(name))?;
        overrides.insert(name.clone(), text);
    }
    let substituted = apply_substitutions(&resolved, &overrides);

    if !item.minify {
        return Ok(substituted);
    }
    let minified = minify(&substituted)?;
    debug!(
        item = %item.identifier,
        resolved = substituted.len(),
        minified = minified.len(),
        "minified"
    );
    Ok(minified)
}

/// Build one bundle's header without writing it.
pub fn build_bundle(
    fs: &dyn FileSystem,
    root: &Path,
    manifest: &Manifest,
    bundle: &BundleConfig,
) -> ClgenResult<GeneratedHeader> {
    let dir = bundle.dir_in(root);
    let options = manifest.encode_options();

    let mut sources = Vec::with_capacity(bundle.items.len());
    for item in &bundle.items {
        sources.push(GeneratedSource {
            identifier: item.identifier.clone(),
            text: build_item(fs, &dir, item)?,
        });
    }

    let content = match sources.as_slice() {
        [single] => encode_one(&manifest.namespace, &single.identifier, &single.text, &options)?,
        many => encode_many(
            &manifest.namespace,
            many.iter().map(|s| (s.identifier.as_str(), s.text.as_str())),
            &options,
        )?,
    };

    Ok(GeneratedHeader {
        bundle: bundle.name.clone(),
        path: bundle.output_in(root),
        hash: ContentHash::from_content(&content),
        content,
        sources,
    })
}

/// Build every selected bundle (all when `names` is empty), stopping at the
/// first failure.
pub fn generate(
    fs: &dyn FileSystem,
    root: &Path,
    manifest: &Manifest,
    names: &[String],
) -> ClgenResult<Vec<GeneratedHeader>> {
    let bundles = manifest.select(names)?;
    let mut headers = Vec::with_capacity(bundles.len());

    for bundle in bundles {
        let _span = info_span!("bundle", name = %bundle.name).entered();
        match build_bundle(fs, root, manifest, bundle) {
            Ok(header) => {
                debug!(bytes = header.content.len(), hash = header.hash.short(), "built");
                headers.push(header);
            }
            Err(e) => {
                error!(error = %e, "bundle failed");
                return Err(e);
            }
        }
    }

    Ok(headers)
}

/// Write generated headers; returns every path written (or that would be).
pub fn write_headers(
    fs: &dyn FileSystem,
    headers: &[GeneratedHeader],
    options: WriteOptions,
) -> ClgenResult<Vec<PathBuf>> {
    let mut written = Vec::new();

    for header in headers {
        let mut outputs = vec![(header.path.clone(), header.content.as_str())];
        if options.emit_source {
            for source in &header.sources {
                outputs.push((header.source_path(&source.identifier), source.text.as_str()));
            }
        }

        for (path, content) in outputs {
            if options.dry_run {
                info!(path = %path.display(), "would write");
            } else {
                fs.write_atomic(&path, content)?;
                info!(path = %path.display(), bytes = content.len(), "wrote");
            }
            written.push(path);
        }
    }

    Ok(written)
}

/// State of a header on disk compared with a fresh build
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HeaderStatus {
    Current,
    Missing,
    Stale {
        /// Items whose embedded text differs (all items if the file is not
        /// in the generated format)
        changed: Vec<String>,
        /// Unified diff of the embedded sources of the changed items
        diff: String,
    },
}

/// One entry of a [`check`] report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckEntry {
    pub bundle: String,
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: HeaderStatus,
}

impl CheckEntry {
    pub fn is_current(&self) -> bool {
        self.status == HeaderStatus::Current
    }
}

/// Compare generated headers with what is on disk.
pub fn check(fs: &dyn FileSystem, headers: &[GeneratedHeader]) -> ClgenResult<Vec<CheckEntry>> {
    let mut entries = Vec::with_capacity(headers.len());

    for header in headers {
        let status = if !fs.exists(&header.path) {
            HeaderStatus::Missing
        } else {
            let on_disk = fs.read_to_string(&header.path)?;
            if on_disk == header.content {
                HeaderStatus::Current
            } else {
                stale_status(&on_disk, header)
            }
        };
        debug!(bundle = %header.bundle, ?status, "checked");
        entries.push(CheckEntry {
            bundle: header.bundle.clone(),
            path: header.path.clone(),
            status,
        });
    }

    Ok(entries)
}

fn stale_status(on_disk: &str, header: &GeneratedHeader) -> HeaderStatus {
    let old_items = decode(on_disk).unwrap_or_default();

    let mut changed = Vec::new();
    let mut diff = String::new();
    for source in &header.sources {
        let old = old_items
            .get(&source.identifier)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .unwrap_or_default();
        if old == source.text {
            continue;
        }
        changed.push(source.identifier.clone());
        diff.push_str(
            &TextDiff::from_lines(old.as_str(), source.text.as_str())
                .unified_diff()
                .context_radius(2)
                .header(
                    &format!("{} (on disk)", source.identifier),
                    &format!("{} (generated)", source.identifier),
                )
                .to_string(),
        );
    }

    // Same embedded texts, different wrapping (banner, namespace, options)
    if changed.is_empty() {
        diff = TextDiff::from_lines(on_disk, header.content.as_str())
            .unified_diff()
            .context_radius(2)
            .header("on disk", "generated")
            .to_string();
    }

    HeaderStatus::Stale { changed, diff }
}
