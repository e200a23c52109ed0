use std::io::Cursor;
use std::path::Path;

use mapdiff::io::reader::read_values;
use mapdiff::io::{Format, IoError, resolve_format};
use serde_json::json;

#[test]
fn explicit_format_takes_priority() {
    let format = resolve_format(Some(Format::Yaml), Path::new("sample.json"), "data")
        .expect("explicit format");
    assert_eq!(format, Format::Yaml);
}

#[test]
fn extension_fallback_covers_mapping_files() {
    let cases = [
        ("logs.mapping", Format::Json),
        ("sample.JSON", Format::Json),
        ("sample.yml", Format::Yaml),
        ("sample.ndjson", Format::Jsonl),
    ];
    for (path, expected) in cases {
        assert_eq!(
            resolve_format(None, Path::new(path), "data").expect("format"),
            expected,
            "{path}"
        );
    }
}

#[test]
fn unknown_extension_names_the_input_kind() {
    let err = resolve_format(None, Path::new("sample.csv"), "data").expect_err("must fail");
    match err {
        IoError::UnsupportedPathExtension { kind, path } => {
            assert_eq!(kind, "data");
            assert_eq!(path, "sample.csv");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn json_array_is_flattened_into_records() {
    let values = read_values(Cursor::new(r#"[{"a":1},{"a":2}]"#), Format::Json).expect("read");
    assert_eq!(values, vec![json!({"a": 1}), json!({"a": 2})]);
}

#[test]
fn yaml_document_keeps_number_kinds() {
    let values = read_values(
        Cursor::new("count: 3\nratio: 0.5\nflag: true\nhost: 10.0.0.1\n"),
        Format::Yaml,
    )
    .expect("read yaml");
    assert_eq!(
        values,
        vec![json!({"count": 3, "ratio": 0.5, "flag": true, "host": "10.0.0.1"})]
    );
    assert!(values[0]["count"].is_i64());
    assert!(values[0]["ratio"].is_f64());
}
