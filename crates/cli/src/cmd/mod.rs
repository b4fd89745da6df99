pub mod check;
pub mod validate;

use anyhow::{Context, Result, bail};
use required_approvals_core::config::{Requirement, parse_requirements};
use typed_path::Utf8NativePathBuf;

use crate::util::arg_or_env;

/// Loads requirements from inline YAML, a file, or `INPUT_REQUIREMENTS`.
pub fn load_requirements(
    inline: Option<String>,
    file: Option<&Utf8NativePathBuf>,
) -> Result<Vec<Requirement>> {
    let source = match (inline, file) {
        (Some(_), Some(_)) => bail!("Pass either --requirements or --requirements-file, not both"),
        (None, Some(path)) => std::fs::read_to_string(path.with_platform_encoding())
            .with_context(|| format!("Failed to read {path}"))?,
        (inline, None) => arg_or_env(inline, &["INPUT_REQUIREMENTS"])
            .context("No requirements given (--requirements or INPUT_REQUIREMENTS)")?,
    };
    parse_requirements(&source)
}
