//! Common test utilities for clgen CLI tests.
//!
//! Provides `TestEnv`: an isolated project directory plus helpers to write
//! kernel sources and run the `clgen` binary against it.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Result of running a clgen CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    /// Parse stdout as NDJSON events
    pub fn events(&self) -> Vec<serde_json::Value> {
        self.stdout
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).unwrap_or_else(|e| panic!("bad event {l:?}: {e}")))
            .collect()
    }
}

/// Manifest with one single-item and one two-item bundle
pub const MANIFEST: &str = r#"
namespace = "xmrig"
banner = false

[[bundle]]
name = "kawpow"
dir = "cl/kawpow"
output = "kawpow_cl.h"

[[bundle.item]]
identifier = "kawpow_cl"
entry = "kawpow.cl"
includes = ["defs.h"]

[[bundle]]
name = "cn_r"
dir = "cl/cn"
output = "cryptonight_r_cl.h"

[[bundle.item]]
identifier = "cryptonight_r_defines_cl"
entry = "cryptonight_r_defines.cl"

[[bundle.item]]
identifier = "cryptonight_r_cl"
entry = "cryptonight_r.cl"
"#;

/// Isolated project directory
pub struct TestEnv {
    pub project_root: TempDir,
}

impl TestEnv {
    /// Empty project
    pub fn new() -> Self {
        Self {
            project_root: tempfile::tempdir().unwrap(),
        }
    }

    /// Project with [`MANIFEST`] and the sources it names
    pub fn with_kernels() -> Self {
        let env = Self::new();
        env.write("clgen.toml", MANIFEST);
        env.write(
            "cl/kawpow/kawpow.cl",
            "kernel main\n#include \"defs.h\"\nvoid run(){}\n",
        );
        env.write("cl/kawpow/defs.h", "#define N 4\n");
        env.write(
            "cl/cn/cryptonight_r_defines.cl",
            "// defines\n#define VARIANT 4\n",
        );
        env.write(
            "cl/cn/cryptonight_r.cl",
            "__kernel void cn_r(__global uint *out)\n{\n    out[0] = VARIANT; /* r */\n}\n",
        );
        env
    }

    pub fn root(&self) -> &Path {
        self.project_root.path()
    }

    /// Get path relative to project root
    pub fn project_path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.project_path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.project_path(relative)).unwrap()
    }

    /// Run clgen with `--root` set to this project
    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_env(args, &[])
    }

    /// Run clgen with extra environment variables
    pub fn run_with_env(&self, args: &[&str], envs: &[(&str, &str)]) -> TestResult {
        let output = Command::new(env!("CARGO_BIN_EXE_clgen"))
            .args(args)
            .arg("--root")
            .arg(self.root())
            .env_remove("CLGEN_LOG")
            .env_remove("CLGEN_NAMESPACE")
            .env_remove("CLGEN_SIZE_CONSTANTS")
            .envs(envs.iter().copied())
            .output()
            .unwrap();

        TestResult {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}
