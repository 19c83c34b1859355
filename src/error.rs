//! Error types for clgen
//!
//! Uses `thiserror` for library errors; the binary wraps them in `anyhow`.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for clgen operations
pub type ClgenResult<T> = Result<T, ClgenError>;

/// What kind of construct the minifier failed to close
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    String,
    Char,
    BlockComment,
}

impl fmt::Display for LiteralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LiteralKind::String => "string literal",
            LiteralKind::Char => "character literal",
            LiteralKind::BlockComment => "block comment",
        };
        f.write_str(name)
    }
}

/// Main error type for clgen operations
#[derive(Error, Debug)]
pub enum ClgenError {
    /// A file named by the entry or the include set is not on disk
    #[error("file not found: {path}")]
    MissingFile { path: PathBuf },

    /// Recursive resolution revisited a file already on the stack
    #[error("include cycle: {}", chain.join(" -> "))]
    IncludeCycle { chain: Vec<String> },

    /// Literal or comment not closed before end of input
    #[error("unterminated {kind} starting at line {line}")]
    UnterminatedLiteral { kind: LiteralKind, line: usize },

    /// Two items in one header bind the same name
    #[error("duplicate identifier '{identifier}'")]
    DuplicateIdentifier { identifier: String },

    /// Identifier or namespace is not a valid C identifier
    #[error("invalid identifier '{identifier}'")]
    InvalidIdentifier { identifier: String },

    /// Bundle selection names a bundle the manifest does not define
    #[error("unknown bundle '{name}'")]
    UnknownBundle { name: String },

    /// Two bundles in one manifest share a name
    #[error("duplicate bundle '{name}' in manifest")]
    DuplicateBundle { name: String },

    /// Manifest could not be parsed or failed validation
    #[error("invalid manifest {file}: {message}")]
    InvalidManifest { file: PathBuf, message: String },

    /// Existing header on disk is not in the generated format
    #[error("malformed header: {message}")]
    MalformedHeader { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
