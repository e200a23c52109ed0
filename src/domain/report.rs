use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::Serialize;
use serde_json::Value;

/// Expected side of a difference: a declared type name, or the nested shape
/// of an object mapping.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ExpectedShape {
    Type(String),
    Object(BTreeMap<String, ExpectedShape>),
}

/// Leaf difference for a single field.
///
/// `expected: None` marks an unexpected field, `actual: null` a missing one;
/// both set is a type mismatch.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LeafDiff {
    pub actual: Value,
    pub expected: Option<ExpectedShape>,
}

/// Classification of a leaf difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafKind {
    Mismatch,
    Missing,
    Unexpected,
}

impl LeafDiff {
    pub fn mismatch(expected: ExpectedShape, actual: Value) -> Self {
        Self {
            actual,
            expected: Some(expected),
        }
    }

    pub fn missing(expected: ExpectedShape) -> Self {
        Self {
            actual: Value::Null,
            expected: Some(expected),
        }
    }

    pub fn unexpected(actual: Value) -> Self {
        Self {
            actual,
            expected: None,
        }
    }

    /// A present field whose value is JSON `null` reads as missing here, the
    /// same way it renders.
    pub fn kind(&self) -> LeafKind {
        match (&self.expected, &self.actual) {
            (None, _) => LeafKind::Unexpected,
            (Some(_), Value::Null) => LeafKind::Missing,
            (Some(_), _) => LeafKind::Mismatch,
        }
    }
}

/// One entry of a difference report.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum DiffEntry {
    Leaf(LeafDiff),
    Nested(DiffReport),
}

/// Tree-shaped difference report keyed by field name. Empty means the record
/// conforms.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(transparent)]
pub struct DiffReport {
    entries: BTreeMap<String, DiffEntry>,
}

impl DiffReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, entry: DiffEntry) {
        self.entries.insert(field.into(), entry);
    }

    pub fn get(&self, field: &str) -> Option<&DiffEntry> {
        self.entries.get(field)
    }

    /// Looks up a leaf by dotted path, descending through nested entries.
    pub fn leaf(&self, dotted_path: &str) -> Option<&LeafDiff> {
        let mut current = self;
        let mut segments = dotted_path.split('.').peekable();
        while let Some(segment) = segments.next() {
            match current.entries.get(segment)? {
                DiffEntry::Leaf(leaf) if segments.peek().is_none() => return Some(leaf),
                DiffEntry::Nested(nested) => current = nested,
                DiffEntry::Leaf(_) => return None,
            }
        }
        None
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, DiffEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a DiffReport {
    type Item = (&'a String, &'a DiffEntry);
    type IntoIter = btree_map::Iter<'a, String, DiffEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Non-fatal diagnostic raised while walking a record.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct DiffWarning {
    pub path: String,
    pub type_name: String,
}

impl DiffWarning {
    pub fn unknown_type(path: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            type_name: type_name.into(),
        }
    }

    pub fn message(&self) -> String {
        format!("unknown type '{}' at {}", self.type_name, self.path)
    }
}
