//! Output helpers: model export as YAML or JSON, and writing documents to disk.

use crate::error::Result;
use crate::module_info::ModuleInfo;
use anyhow::Context;
use log::debug;
use std::fs;
use std::path::Path;

/// Serializes an extracted module model to YAML.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_yaml(info: &ModuleInfo) -> Result<String> {
    debug!("Serializing module model {} to YAML", info.name);
    Ok(serde_yaml::to_string(info)?)
}

/// Serializes an extracted module model to pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_json(info: &ModuleInfo) -> Result<String> {
    debug!("Serializing module model {} to JSON", info.name);
    Ok(serde_json::to_string_pretty(info)?)
}

/// Writes string content to a file, overwriting it if it exists.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written to.
pub fn write_to_file(content: &str, path: &Path) -> anyhow::Result<()> {
    debug!("Writing content to file: {}", path.display());

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
