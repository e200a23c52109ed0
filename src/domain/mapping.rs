use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};

use crate::domain::error::MappingError;
use crate::domain::report::ExpectedShape;

/// Scalar field type vocabulary understood by the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    Text,
    Keyword,
    Long,
    Integer,
    Short,
    Double,
    Float,
    HalfFloat,
    Boolean,
    Date,
    Ip,
    Alias,
    /// Any type name outside the vocabulary, kept verbatim for warnings.
    Unknown(String),
}

impl FieldType {
    pub fn parse(name: &str) -> Self {
        match name {
            "text" => Self::Text,
            "keyword" => Self::Keyword,
            "long" => Self::Long,
            "integer" => Self::Integer,
            "short" => Self::Short,
            "double" => Self::Double,
            "float" => Self::Float,
            "half_float" => Self::HalfFloat,
            "boolean" => Self::Boolean,
            "date" => Self::Date,
            "ip" => Self::Ip,
            "alias" => Self::Alias,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Keyword => "keyword",
            Self::Long => "long",
            Self::Integer => "integer",
            Self::Short => "short",
            Self::Double => "double",
            Self::Float => "float",
            Self::HalfFloat => "half_float",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Ip => "ip",
            Self::Alias => "alias",
            Self::Unknown(name) => name.as_str(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dot-delimited redirect target of an alias field. Never empty and never
/// contains an empty segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasPath {
    segments: Vec<String>,
}

impl AliasPath {
    pub fn parse(input: &str) -> Option<Self> {
        if input.is_empty() || input.split('.').any(str::is_empty) {
            return None;
        }
        Some(Self {
            segments: input.split('.').map(ToOwned::to_owned).collect(),
        })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for AliasPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

/// One declared field of a mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldMapping {
    Scalar(FieldType),
    Alias { path: AliasPath },
    /// Nested field. `declared` keeps an explicit `type` such as `object` or
    /// `nested`; it is consulted only when the data value is not an object.
    Object {
        properties: BTreeMap<String, FieldMapping>,
        declared: Option<FieldType>,
    },
}

impl FieldMapping {
    pub fn is_alias(&self) -> bool {
        matches!(self, Self::Alias { .. })
    }

    /// Shape rendered as the `expected` side of a difference: the type name
    /// for scalar and alias fields, the nested shape for object fields.
    pub fn shape(&self) -> ExpectedShape {
        match self {
            Self::Scalar(field_type) => ExpectedShape::Type(field_type.as_str().to_string()),
            Self::Alias { .. } => ExpectedShape::Type(FieldType::Alias.as_str().to_string()),
            Self::Object { properties, .. } => ExpectedShape::Object(
                properties
                    .iter()
                    .map(|(name, field)| (name.clone(), field.shape()))
                    .collect(),
            ),
        }
    }

    fn decode(field: &str, raw: &Value) -> Result<Self, MappingError> {
        let Value::Object(raw) = raw else {
            return Err(MappingError::FieldNotObject {
                field: field.to_string(),
            });
        };

        if let Some(properties) = raw.get("properties") {
            let Value::Object(properties) = properties else {
                return Err(MappingError::InvalidProperties {
                    field: field.to_string(),
                });
            };
            return Ok(Self::Object {
                properties: decode_properties(Some(field), properties)?,
                declared: raw.get("type").and_then(Value::as_str).map(FieldType::parse),
            });
        }

        let type_name = match raw.get("type") {
            Some(Value::String(name)) => name,
            Some(_) => {
                return Err(MappingError::InvalidType {
                    field: field.to_string(),
                });
            }
            None => {
                return Err(MappingError::Untyped {
                    field: field.to_string(),
                });
            }
        };

        match FieldType::parse(type_name) {
            FieldType::Alias => {
                let Some(raw_path) = raw.get("path").and_then(Value::as_str) else {
                    return Err(MappingError::AliasWithoutPath {
                        field: field.to_string(),
                    });
                };
                let path = AliasPath::parse(raw_path).ok_or_else(|| {
                    MappingError::InvalidAliasPath {
                        field: field.to_string(),
                        path: raw_path.to_string(),
                    }
                })?;
                Ok(Self::Alias { path })
            }
            field_type => Ok(Self::Scalar(field_type)),
        }
    }
}

/// Typed top-level field mapping, decoded once from the serialized form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mapping {
    fields: BTreeMap<String, FieldMapping>,
}

impl Mapping {
    /// Decodes a `properties` object (field name to field mapping).
    pub fn from_properties(properties: &Map<String, Value>) -> Result<Self, MappingError> {
        Ok(Self {
            fields: decode_properties(None, properties)?,
        })
    }

    pub fn fields(&self) -> &BTreeMap<String, FieldMapping> {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldMapping> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn decode_properties(
    parent: Option<&str>,
    properties: &Map<String, Value>,
) -> Result<BTreeMap<String, FieldMapping>, MappingError> {
    let mut fields = BTreeMap::new();
    for (name, raw) in properties {
        let field = match parent {
            Some(parent) => format!("{parent}.{name}"),
            None => name.clone(),
        };
        fields.insert(name.clone(), FieldMapping::decode(&field, raw)?);
    }
    Ok(fields)
}
