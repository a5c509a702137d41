//! flags/pkgconfig.rs
//! `pkg-config` backed resolver.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::constants::DEFAULT_PKG_CONFIG;
use crate::flags::FlagResolver;
use crate::types::{JitError, JitResult};

/// Queries `pkg-config --cflags --libs` for each package.
#[derive(Clone, Debug)]
pub struct PkgConfigResolver {
    program: String,
}

impl Default for PkgConfigResolver {
    fn default() -> Self {
        Self { program: DEFAULT_PKG_CONFIG.to_string() }
    }
}

impl PkgConfigResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use another executable (name looked up on `PATH`, or a path).
    pub fn with_program(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn locate(&self) -> JitResult<PathBuf> {
        which::which(&self.program).map_err(|e| JitError::Resolution {
            tool: self.program.clone(),
            msg: format!("not found on PATH: {}", e),
        })
    }
}

impl FlagResolver for PkgConfigResolver {
    fn resolve(&self, package_id: &str) -> JitResult<Vec<String>> {
        let tool = self.locate()?;
        tracing::debug!(tool = %tool.display(), package = %package_id, "querying build flags");

        let output = Command::new(&tool)
            .args(["--cflags", "--libs", package_id])
            .stdin(Stdio::null())
            .output()
            .map_err(|e| JitError::Resolution {
                tool: tool.display().to_string(),
                msg: e.to_string(),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() && stdout.trim().is_empty() {
            tracing::warn!(
                package = %package_id,
                status = ?output.status.code(),
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "pkg-config produced no flags"
            );
        }

        Ok(split_first_line(&stdout))
    }
}

/// First line of `output`, split on runs of whitespace; blank → empty list.
pub fn split_first_line(output: &str) -> Vec<String> {
    output
        .lines()
        .next()
        .map(|line| line.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}
