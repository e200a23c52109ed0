use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::domain::mapping::FieldType;
use crate::domain::report::{ExpectedShape, LeafDiff};

// Prefix match only: trailing text after the fourth octet is accepted.
static IP_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,3}\.){3}\d{1,3}").expect("ip prefix pattern is valid")
});

/// Result of checking one observed value against its declared type.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Match,
    Mismatch(LeafDiff),
    /// Declared type is outside the vocabulary; treated as compatible.
    UnknownType(String),
}

/// Decides whether `value` is compatible with `field_type`.
pub fn classify(field_type: &FieldType, value: &Value) -> Classification {
    let compatible = match field_type {
        FieldType::Text | FieldType::Keyword => value.is_string(),
        FieldType::Long | FieldType::Integer | FieldType::Short => is_integer(value),
        FieldType::Double | FieldType::Float | FieldType::HalfFloat => is_float(value),
        FieldType::Boolean => value.is_boolean(),
        FieldType::Date => value.is_string() || is_integer(value),
        FieldType::Ip => value.as_str().is_some_and(|text| IP_PREFIX.is_match(text)),
        FieldType::Alias => true,
        FieldType::Unknown(name) => return Classification::UnknownType(name.clone()),
    };

    if compatible {
        Classification::Match
    } else {
        Classification::Mismatch(LeafDiff::mismatch(
            ExpectedShape::Type(field_type.as_str().to_string()),
            value.clone(),
        ))
    }
}

fn is_integer(value: &Value) -> bool {
    matches!(value, Value::Number(number) if number.is_i64() || number.is_u64())
}

fn is_float(value: &Value) -> bool {
    matches!(value, Value::Number(number) if number.is_f64())
}
