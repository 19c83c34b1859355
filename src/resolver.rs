//! Include resolution
//!
//! Inlines `#include "name"` directives whose argument is in a known include
//! set, recursively. Every known name is looked up relative to one base
//! directory, the same way for the entry file and for nested includes.
//!
//! A known file is inlined once, at its first directive; later directives
//! naming it are dropped. Directives naming anything else are left for the
//! device compiler.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{ClgenError, ClgenResult};
use crate::fs::FileSystem;

/// A recognized `#include "name"` directive within one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeDirective<'a> {
    /// Byte length of the leading tabs/spaces
    pub indent: usize,
    /// Byte offset just past the closing quote
    pub end: usize,
    /// The quoted argument
    pub name: &'a str,
}

/// Parse a single line as an include directive.
///
/// Accepts horizontal whitespace before `#`, between `#` and `include`, and
/// before the opening quote. Angle-bracket includes are not recognized.
pub fn parse_include(line: &str) -> Option<IncludeDirective<'_>> {
    let blank = |c: char| c == ' ' || c == '\t';

    let rest = line.trim_start_matches(blank);
    let indent = line.len() - rest.len();
    let rest = rest.strip_prefix('#')?.trim_start_matches(blank);
    let rest = rest.strip_prefix("include")?.trim_start_matches(blank);
    let arg = rest.strip_prefix('"')?;
    let close = arg.find(|c: char| c == '"' || c == '\n')?;
    if arg[close..].starts_with('\n') {
        return None;
    }

    let arg_offset = line.len() - arg.len();
    Some(IncludeDirective {
        indent,
        end: arg_offset + close + 1,
        name: &arg[..close],
    })
}

/// Recursive include resolver bound to one base directory and include set.
pub struct IncludeResolver<'a> {
    fs: &'a dyn FileSystem,
    base_dir: PathBuf,
    known: HashSet<String>,
    stack: Vec<String>,
    inlined: HashSet<String>,
}

impl<'a> IncludeResolver<'a> {
    pub fn new<S: AsRef<str>>(fs: &'a dyn FileSystem, base_dir: &Path, known: &[S]) -> Self {
        Self {
            fs,
            base_dir: base_dir.to_path_buf(),
            known: known.iter().map(|s| s.as_ref().to_string()).collect(),
            stack: Vec::new(),
            inlined: HashSet::new(),
        }
    }

    fn path_of(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    /// Resolve `entry` and everything it includes through the known set.
    pub fn resolve(mut self, entry: &str) -> ClgenResult<String> {
        let mut missing: Vec<&String> = self
            .known
            .iter()
            .filter(|name| !self.fs.exists(&self.path_of(name)))
            .collect();
        missing.sort();
        if let Some(name) = missing.first() {
            return Err(ClgenError::MissingFile {
                path: self.path_of(name),
            });
        }

        self.resolve_file(entry)
    }

    fn resolve_file(&mut self, name: &str) -> ClgenResult<String> {
        let path = self.path_of(name);
        let text = self.fs.read_to_string(&path)?;
        debug!(file = %path.display(), bytes = text.len(), "resolving includes");

        self.stack.push(name.to_string());
        self.inlined.insert(name.to_string());
        let resolved = self.resolve_text(&text)?;
        self.stack.pop();

        Ok(resolved)
    }

    fn resolve_text(&mut self, text: &str) -> ClgenResult<String> {
        let mut out = String::with_capacity(text.len());

        for line in text.split_inclusive('\n') {
            let directive = match parse_include(line) {
                Some(d) if self.known.contains(d.name) => d,
                _ => {
                    out.push_str(line);
                    continue;
                }
            };

            if self.stack.iter().any(|s| s == directive.name) {
                let mut chain = self.stack.clone();
                chain.push(directive.name.to_string());
                return Err(ClgenError::IncludeCycle { chain });
            }

            out.push_str(&line[..directive.indent]);
            if self.inlined.contains(directive.name) {
                debug!(name = directive.name, "dropping repeated include");
            } else {
                let included = self.resolve_file(directive.name)?;
                out.push_str(&included);
            }
            out.push_str(&line[directive.end..]);
        }

        Ok(out)
    }
}

/// Resolve `entry` (relative to `base_dir`) against the include set `known`.
pub fn resolve<S: AsRef<str>>(
    fs: &dyn FileSystem,
    base_dir: &Path,
    entry: &str,
    known: &[S],
) -> ClgenResult<String> {
    IncludeResolver::new(fs, base_dir, known).resolve(entry)
}

/// Replace directives naming an override key with the override text.
///
/// The whole directive, leading indentation included, is replaced at every
/// occurrence. Only directives that begin a line (after blanks) match, the
/// same rule [`resolve`] uses; a directive text after code or inside a
/// comment on the same line is left alone. Replacement text is inserted
/// verbatim and never rescanned, so this runs after [`resolve`] and cannot
/// recurse.
pub fn apply_substitutions(text: &str, overrides: &IndexMap<String, String>) -> String {
    if overrides.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    for line in text.split_inclusive('\n') {
        match parse_include(line).and_then(|d| overrides.get(d.name).map(|r| (d.end, r))) {
            Some((end, replacement)) => {
                out.push_str(replacement);
                out.push_str(&line[end..]);
            }
            None => out.push_str(line),
        }
    }
    out
}
