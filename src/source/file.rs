use serde_json::Value;
use std::path::Path;

use crate::core::{Error, Result, ResultExt};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parse an uploaded or saved dashboard document (`.dash` / `.json`).
pub fn load_from_bytes(bytes: &[u8]) -> Result<Value> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    Ok(serde_json::from_slice(bytes)?)
}

/// Read and parse a dashboard document from disk.
pub fn load_from_file(path: &Path) -> Result<Value> {
    let bytes = std::fs::read(path).map_err(|e| Error::FileSystemAt {
        path: path.to_path_buf(),
        source: e,
    })?;
    log::debug!("Read {} bytes from {}", bytes.len(), path.display());
    load_from_bytes(&bytes).context(format!("Parsing dashboard file {}", path.display()))
}
