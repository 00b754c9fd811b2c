//! JSON persistence of a decoded model
//!
//! Entity ids are map keys and therefore written as numeric strings; they
//! are parsed back into integers on read.

use std::fs;
use std::path::Path;

use crate::error::{CdbError, CdbResult};
use crate::model::CdbModel;

/// Expected extension of exported model files
pub const JSON_EXTENSION: &str = "json";

/// Serialize a model to pretty-printed JSON
pub fn to_json(model: &CdbModel) -> CdbResult<String> {
    Ok(serde_json::to_string_pretty(model)?)
}

/// Parse a model from JSON
pub fn from_json(text: &str) -> CdbResult<CdbModel> {
    Ok(serde_json::from_str(text)?)
}

/// Write a model to `path`
pub fn write_json(model: &CdbModel, path: impl AsRef<Path>) -> CdbResult<()> {
    let path = path.as_ref();
    fs::write(path, to_json(model)?)?;
    log::info!("Model written to {}", path.display());
    Ok(())
}

/// Read a model from a `.json` file
pub fn read_json(path: impl AsRef<Path>) -> CdbResult<CdbModel> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(JSON_EXTENSION));
    if !is_json {
        return Err(CdbError::InvalidInput(format!(
            "{} is not a .{JSON_EXTENSION} file",
            path.display()
        )));
    }
    from_json(&fs::read_to_string(path)?)
}
