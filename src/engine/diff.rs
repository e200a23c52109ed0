use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::domain::error::DiffError;
use crate::domain::mapping::{AliasPath, FieldMapping, FieldType, Mapping};
use crate::domain::report::{DiffEntry, DiffReport, DiffWarning, LeafDiff};
use crate::engine::classify::{Classification, classify};

/// Report plus the non-fatal warnings raised while producing it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiffOutcome {
    pub report: DiffReport,
    pub warnings: Vec<DiffWarning>,
}

impl DiffOutcome {
    pub fn conforms(&self) -> bool {
        self.report.is_empty()
    }
}

/// Compares one data record against `mapping`.
///
/// Alias fields are resolved first at every nesting level: the aliased value
/// is copied into `record` at the alias path, relative to the object that
/// holds the alias. The record is therefore mutated and must not be shared
/// with another call.
pub fn diff(
    mapping: &Mapping,
    record: &mut Map<String, Value>,
    include_missing: bool,
) -> Result<DiffOutcome, DiffError> {
    let mut warnings = Vec::new();
    let report = diff_level(mapping.fields(), record, include_missing, "", &mut warnings)?;
    Ok(DiffOutcome { report, warnings })
}

fn diff_level(
    fields: &BTreeMap<String, FieldMapping>,
    data: &mut Map<String, Value>,
    include_missing: bool,
    prefix: &str,
    warnings: &mut Vec<DiffWarning>,
) -> Result<DiffReport, DiffError> {
    resolve_aliases(fields, data, prefix)?;

    let mut report = DiffReport::new();
    for (name, field) in fields {
        let field_path = join_path(prefix, name);
        let Some(value) = data.get_mut(name) else {
            if include_missing && !field.is_alias() {
                report.insert(name.as_str(), DiffEntry::Leaf(LeafDiff::missing(field.shape())));
            }
            continue;
        };

        match field {
            FieldMapping::Alias { .. } => {}
            FieldMapping::Object {
                properties,
                declared,
            } => match value {
                Value::Object(nested) => {
                    let nested_report =
                        diff_level(properties, nested, include_missing, &field_path, warnings)?;
                    if !nested_report.is_empty() {
                        report.insert(name.as_str(), DiffEntry::Nested(nested_report));
                    }
                }
                // Arrays, nulls and scalars under an object mapping are not compared.
                other => {
                    if let Some(field_type) = declared {
                        check_scalar(field_type, other, name, field_path, &mut report, warnings);
                    }
                }
            },
            FieldMapping::Scalar(field_type) => {
                check_scalar(field_type, value, name, field_path, &mut report, warnings);
            }
        }
    }

    for (name, value) in data.iter() {
        if !fields.contains_key(name) {
            report.insert(name.as_str(), DiffEntry::Leaf(LeafDiff::unexpected(value.clone())));
        }
    }

    Ok(report)
}

fn check_scalar(
    field_type: &FieldType,
    value: &Value,
    name: &str,
    field_path: String,
    report: &mut DiffReport,
    warnings: &mut Vec<DiffWarning>,
) {
    match classify(field_type, value) {
        Classification::Match => {}
        Classification::Mismatch(leaf) => report.insert(name, DiffEntry::Leaf(leaf)),
        Classification::UnknownType(type_name) => {
            warnings.push(DiffWarning::unknown_type(field_path, type_name));
        }
    }
}

fn resolve_aliases(
    fields: &BTreeMap<String, FieldMapping>,
    data: &mut Map<String, Value>,
    prefix: &str,
) -> Result<(), DiffError> {
    for (name, field) in fields {
        let FieldMapping::Alias { path } = field else {
            continue;
        };
        let Some(value) = data.get(name).cloned() else {
            continue;
        };
        write_at_path(data, path, value).map_err(|segment| DiffError::AliasTargetNotObject {
            alias: join_path(prefix, name),
            path: path.to_string(),
            segment,
        })?;
    }
    Ok(())
}

/// Writes `value` at `path`, creating empty objects for absent intermediate
/// segments. Returns the blocking segment when an intermediate value exists
/// but is not an object.
fn write_at_path(
    data: &mut Map<String, Value>,
    path: &AliasPath,
    value: Value,
) -> Result<(), String> {
    let Some((last, parents)) = path.segments().split_last() else {
        return Ok(());
    };

    let mut current = data;
    for segment in parents {
        current = match current
            .entry(segment.as_str())
            .or_insert_with(|| Value::Object(Map::new()))
        {
            Value::Object(next) => next,
            _ => return Err(segment.clone()),
        };
    }
    current.insert(last.clone(), value);
    Ok(())
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}
