//! JSON document loading and saving
//!
//! Configuration documents are read leniently (a missing file is not an error)
//! and written atomically so a crash never leaves half a document on disk.

use serde::Serialize;
use serde_json::Value;
use std::path::Path;

use crate::{Error, Result, io};

/// Load a JSON document.
///
/// Returns `Ok(None)` when the file does not exist.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file exists but cannot be read, and
/// [`Error::Parse`] if its content is not valid JSON.
pub fn load_json(path: &Path) -> Result<Option<Value>> {
    let content = match io::read_text(path) {
        Ok(content) => content,
        Err(e) if e.is_not_found() => return Ok(None),
        Err(e) => return Err(e),
    };

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| Error::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Save a value as pretty-printed JSON with a trailing newline.
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut content = serde_json::to_string_pretty(value).map_err(|e| Error::Serialize {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    content.push('\n');

    io::write_atomic(path, content.as_bytes())
}
