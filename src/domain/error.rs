use thiserror::Error;

use crate::io::{Format, IoError};

/// Errors produced while loading or decoding a field mapping.
///
/// A malformed mapping is a configuration error, so every variant is fatal to
/// the validation call.
#[derive(Debug, Error)]
pub enum MappingError {
    /// Mapping format could not be resolved from the file name.
    #[error("unable to resolve mapping format from `{path}`: {source}")]
    ResolveFormat {
        path: String,
        #[source]
        source: IoError,
    },

    /// Mapping file could not be opened.
    #[error("failed to open mapping file `{path}`: {source}")]
    OpenFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Mapping file could not be parsed.
    #[error("failed to read mapping file `{path}`: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: IoError,
    },

    #[error("mapping file `{path}` must contain exactly one object")]
    NotSingleDocument { path: String },

    #[error("mapping file `{path}` has no field properties")]
    NoProperties { path: String },

    #[error("`composed_of` in `{path}` must be an array of component names")]
    InvalidComposedOf { path: String },

    #[error("component mapping `{name}` referenced by `{path}` was not found")]
    ComponentNotFound { name: String, path: String },

    #[error("mapping for field `{field}` must be an object")]
    FieldNotObject { field: String },

    #[error("mapping for field `{field}` has neither `type` nor `properties`")]
    Untyped { field: String },

    #[error("mapping for field `{field}` has a non-string `type`")]
    InvalidType { field: String },

    #[error("`properties` of field `{field}` must be an object")]
    InvalidProperties { field: String },

    #[error("alias field `{field}` has no `path`")]
    AliasWithoutPath { field: String },

    #[error("alias field `{field}` has invalid path `{path}`")]
    InvalidAliasPath { field: String, path: String },
}

/// Errors raised by the schema differ itself.
///
/// Data non-conformance is never an error; only an alias that cannot be
/// written into the record is.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiffError {
    #[error("alias `{alias}` cannot be resolved to `{path}`: `{segment}` is not an object")]
    AliasTargetNotObject {
        alias: String,
        path: String,
        segment: String,
    },
}

/// Errors produced by the `diff` command boundary.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// Data format could not be resolved from flags or file name.
    #[error("failed to resolve data format: {source}")]
    ResolveData {
        #[source]
        source: IoError,
    },

    /// Data file could not be opened.
    #[error("failed to open data file `{path}`: {source}")]
    OpenData {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Data could not be parsed in the declared format.
    #[error("failed to read {format} data: {source}")]
    ReadData {
        format: Format,
        #[source]
        source: IoError,
    },

    #[error("data record {record} must be an object")]
    RecordNotObject { record: usize },

    #[error("record {record}: {source}")]
    Diff {
        record: usize,
        #[source]
        source: DiffError,
    },

    /// Report could not be serialized.
    #[error("failed to serialize diff report: {source}")]
    SerializeReport {
        #[source]
        source: serde_json::Error,
    },
}

impl ValidateError {
    /// Process exit code for this failure: `1` for internal errors, `3` for
    /// input and usage errors.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::SerializeReport { .. } => 1,
            _ => 3,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::SerializeReport { .. } => "internal_error",
            _ => "input_usage_error",
        }
    }
}
