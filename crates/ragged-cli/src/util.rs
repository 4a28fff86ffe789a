use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ragged_array::io::Keys;
use ragged_array::RaggedConfig;

pub fn validate_npz_file(path: &str) -> Result<()> {
    let pb = PathBuf::from(path);

    let ext = pb
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());
    if ext.as_deref() != Some("npz") {
        anyhow::bail!("File must have a .npz extension: {}", path);
    }

    if !pb.exists() {
        anyhow::bail!("File does not exist: {}", path);
    }

    Ok(())
}

/// Read a JSON [`RaggedConfig`]; missing fields take their defaults.
pub fn load_config(path: &Path) -> Result<RaggedConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: RaggedConfig = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    Ok(config)
}

/// `--keys a,b` or `--all-keys`; `None` when neither was given.
pub fn parse_keys(keys: Option<&str>, all: bool) -> Option<Keys> {
    if all {
        return Some(Keys::All);
    }
    keys.map(|list| {
        Keys::named(
            list.split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty()),
        )
    })
}
