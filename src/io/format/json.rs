use std::io::Read;

use serde_json::Value;

use crate::io::IoError;

pub fn read_json<R: Read>(reader: R) -> Result<Vec<Value>, IoError> {
    let document: Value = serde_json::from_reader(reader)?;
    Ok(flatten_top_level(document))
}

pub(crate) fn flatten_top_level(document: Value) -> Vec<Value> {
    match document {
        Value::Array(items) => items,
        single => vec![single],
    }
}
