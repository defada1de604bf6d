//! JSON writing operations.

use std::{fs::File, io::{BufWriter, Write}, path::Path};

use anyhow::{Context, Result};
use serde::Serialize;

/// Serialize `value` as pretty JSON to `path`.
pub(crate) fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("[io::json] Failed to create JSON file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("[io::json] Failed to write JSON to {:?}", path))?;
    writer.flush()?;
    Ok(())
}

/// Serialize `value` as a pretty JSON string.
pub(crate) fn write_json_string<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("[io::json] Failed to serialize JSON")
}
