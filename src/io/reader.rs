use std::io::Read;

use serde_json::Value;

use crate::io::format::{json, jsonl, yaml};
use crate::io::{Format, IoError};

/// Reads every top-level document of `reader`. A top-level array in JSON or
/// YAML is flattened into its items.
pub fn read_values<R: Read>(reader: R, format: Format) -> Result<Vec<Value>, IoError> {
    match format {
        Format::Json => json::read_json(reader),
        Format::Yaml => yaml::read_yaml(reader),
        Format::Jsonl => jsonl::read_jsonl(reader),
    }
}
