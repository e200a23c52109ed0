use std::io::Read;

use serde_json::Value;

use crate::io::IoError;
use crate::io::format::json::flatten_top_level;

pub fn read_yaml<R: Read>(reader: R) -> Result<Vec<Value>, IoError> {
    let document: serde_yaml::Value = serde_yaml::from_reader(reader)?;
    Ok(flatten_top_level(serde_json::to_value(document)?))
}
