//! clgen - OpenCL kernel to C++ header build pipeline
//!
//! Kernel sources are stitched together from a fixed set of known include
//! files, minified, and embedded in C++ headers as NUL-terminated byte
//! arrays so the host program can compile them at runtime.
//!
//! Stages, each usable on its own:
//! - [`resolver`]: inline `#include "name"` directives for known files
//! - [`minify()`]: strip comments and redundant whitespace
//! - [`encoder`]: render byte arrays inside a C++ namespace
//! - [`pipeline`]: drive all three for every bundle of a [`Manifest`]

pub mod config;
pub mod encoder;
pub mod error;
pub mod fs;
pub mod hash;
pub mod minify;
pub mod pipeline;
pub mod resolver;

// Re-exports for convenience
pub use config::{BundleConfig, ItemConfig, Manifest};
pub use encoder::{decode, encode_many, encode_one, EncodeOptions, HeaderBundle};
pub use error::{ClgenError, ClgenResult, LiteralKind};
pub use fs::{FileSystem, LocalFs};
pub use hash::ContentHash;
pub use minify::minify;
pub use pipeline::{check, generate, write_headers, GeneratedHeader, WriteOptions};
pub use resolver::{apply_substitutions, resolve};
