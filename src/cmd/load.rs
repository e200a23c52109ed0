use std::fs::File;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::domain::error::{MappingError, ValidateError};
use crate::domain::mapping::Mapping;
use crate::io::{self, Format};

const COMPONENT_EXTENSIONS: [&str; 2] = ["mapping", "json"];

// Envelopes tried in order before falling back to a bare field map.
const PROPERTIES_POINTERS: [&str; 3] = [
    "/template/mappings/properties",
    "/mappings/properties",
    "/properties",
];

// Index template keys; a document carrying any of them is never a bare field map.
const ENVELOPE_KEYS: [&str; 6] = [
    "template",
    "mappings",
    "composed_of",
    "index_patterns",
    "priority",
    "_meta",
];

/// Loads and decodes a mapping file.
///
/// Components listed in a top-level `composed_of` array are read from sibling
/// files and merged first; the document's own fields win on name clashes. A
/// document with neither properties nor components is rejected.
pub fn load_mapping(path: &Path) -> Result<Mapping, MappingError> {
    let document = read_mapping_document(path)?;

    let components = composed_of(&document, path)?;
    let own = properties_of(&document);
    if own.is_none() && components.is_empty() {
        return Err(MappingError::NoProperties {
            path: path.display().to_string(),
        });
    }

    let mut merged = Map::new();
    for name in components {
        let component_path = find_component(path, &name)?;
        let component = read_mapping_document(&component_path)?;
        merged.extend(properties_of(&component).unwrap_or_default());
    }
    merged.extend(own.unwrap_or_default());

    Mapping::from_properties(&merged)
}

/// Loads every data record from `path`. Record shape is not checked here.
pub fn load_records(path: &Path, explicit: Option<Format>) -> Result<Vec<Value>, ValidateError> {
    let format = io::resolve_format(explicit, path, "data")
        .map_err(|source| ValidateError::ResolveData { source })?;
    let file = File::open(path).map_err(|source| ValidateError::OpenData {
        path: path.display().to_string(),
        source,
    })?;
    io::reader::read_values(file, format)
        .map_err(|source| ValidateError::ReadData { format, source })
}

fn read_mapping_document(path: &Path) -> Result<Value, MappingError> {
    let display = path.display().to_string();
    let format = io::resolve_format(None, path, "mapping").map_err(|source| {
        MappingError::ResolveFormat {
            path: display.clone(),
            source,
        }
    })?;
    let file = File::open(path).map_err(|source| MappingError::OpenFile {
        path: display.clone(),
        source,
    })?;
    let values =
        io::reader::read_values(file, format).map_err(|source| MappingError::ReadFile {
            path: display.clone(),
            source,
        })?;
    if values.len() != 1 || !values[0].is_object() {
        return Err(MappingError::NotSingleDocument { path: display });
    }
    Ok(values.into_iter().next().unwrap_or(Value::Null))
}

fn properties_of(document: &Value) -> Option<Map<String, Value>> {
    for pointer in PROPERTIES_POINTERS {
        if let Some(Value::Object(properties)) = document.pointer(pointer) {
            return Some(properties.clone());
        }
    }
    match document {
        Value::Object(fields)
            if !fields
                .keys()
                .any(|key| ENVELOPE_KEYS.contains(&key.as_str())) =>
        {
            Some(fields.clone())
        }
        _ => None,
    }
}

fn composed_of(document: &Value, path: &Path) -> Result<Vec<String>, MappingError> {
    let Some(raw) = document.get("composed_of") else {
        return Ok(Vec::new());
    };
    let invalid = || MappingError::InvalidComposedOf {
        path: path.display().to_string(),
    };
    raw.as_array()
        .ok_or_else(invalid)?
        .iter()
        .map(|name| name.as_str().map(ToOwned::to_owned).ok_or_else(invalid))
        .collect()
}

fn find_component(path: &Path, name: &str) -> Result<PathBuf, MappingError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    COMPONENT_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{name}.{ext}")))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| MappingError::ComponentNotFound {
            name: name.to_string(),
            path: path.display().to_string(),
        })
}
