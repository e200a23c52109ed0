use std::fs;
use std::path::{Path, PathBuf};

use predicates::prelude::*;
use serde_json::Value;
use tempfile::{TempDir, tempdir};

const MAPPING: &str = r#"{
    "template": {"mappings": {"properties": {
        "body": {"type": "text"},
        "severity": {"properties": {"number": {"type": "long"}, "text": {"type": "keyword"}}},
        "client_ip": {"type": "ip"},
        "old_level": {"type": "alias", "path": "severity.text"}
    }}}
}"#;

fn write_fixture(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

fn mapdiff(mapping: &Path, data: &Path) -> assert_cmd::Command {
    let mut command = assert_cmd::cargo::cargo_bin_cmd!("mapdiff");
    command
        .arg("diff")
        .arg("--mapping")
        .arg(mapping)
        .arg("--data")
        .arg(data);
    command
}

#[test]
fn conforming_record_exits_zero_without_output() {
    let dir = tempdir().expect("tempdir");
    let mapping = write_fixture(&dir, "logs.mapping", MAPPING);
    let data = write_fixture(
        &dir,
        "sample.json",
        r#"{"body": "ok", "severity": {"number": 9}, "client_ip": "10.0.0.1", "old_level": "INFO"}"#,
    );

    mapdiff(&mapping, &data)
        .assert()
        .code(0)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_empty());
}

#[test]
fn diff_output_lists_removed_and_added_lines() {
    let dir = tempdir().expect("tempdir");
    let mapping = write_fixture(&dir, "logs.mapping", MAPPING);
    let data = write_fixture(
        &dir,
        "sample.json",
        r#"{"body": 1, "severity": {"number": 2.5}, "client_ip": "abc", "extra": "x"}"#,
    );

    let output = mapdiff(&mapping, &data).output().expect("run mapdiff");

    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8(output.stdout).expect("stdout utf8");
    assert_eq!(
        stdout.lines().collect::<Vec<_>>(),
        vec![
            "- body: 1",
            "+ body: \"text\"",
            "- client_ip: \"abc\"",
            "+ client_ip: \"ip\"",
            "- extra: \"x\"",
            "- severity.number: 2.5",
            "+ severity.number: \"long\"",
        ]
    );
}

#[test]
fn json_output_with_show_missing_is_sorted() {
    let dir = tempdir().expect("tempdir");
    let mapping = write_fixture(&dir, "logs.mapping", MAPPING);
    let data = write_fixture(&dir, "sample.json", r#"{"body": "ok"}"#);

    let output = mapdiff(&mapping, &data)
        .args(["--json", "--show-missing"])
        .output()
        .expect("run mapdiff");

    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8(output.stdout).expect("stdout utf8");
    assert_eq!(
        stdout.trim_end(),
        concat!(
            r#"{"client_ip":{"actual":null,"expected":"ip"},"#,
            r#""severity":{"actual":null,"expected":{"number":"long","text":"keyword"}}}"#
        )
    );
}

#[test]
fn check_all_reports_first_failing_record() {
    let dir = tempdir().expect("tempdir");
    let mapping = write_fixture(&dir, "logs.mapping", MAPPING);
    let data = write_fixture(
        &dir,
        "records.jsonl",
        "{\"body\":\"a\"}\n{\"body\":\"b\",\"client_ip\":7}\n{\"body\":3}\n",
    );

    let output = mapdiff(&mapping, &data)
        .arg("--check-all")
        .output()
        .expect("run mapdiff");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr).expect("stderr utf8");
    assert!(stderr.contains("Validation errors found in record 2"));
    let stdout = String::from_utf8(output.stdout).expect("stdout utf8");
    assert_eq!(
        stdout.lines().collect::<Vec<_>>(),
        vec!["- client_ip: 7", "+ client_ip: \"ip\""]
    );
}

#[test]
fn without_check_all_later_records_are_ignored() {
    let dir = tempdir().expect("tempdir");
    let mapping = write_fixture(&dir, "logs.mapping", MAPPING);
    let data = write_fixture(&dir, "records.json", r#"[{"body": "a"}, {"body": 3}]"#);

    mapdiff(&mapping, &data).assert().code(0);
}

#[test]
fn unknown_type_warns_but_passes() {
    let dir = tempdir().expect("tempdir");
    let mapping = write_fixture(
        &dir,
        "geo.mapping",
        r#"{"properties": {"location": {"type": "geo_point"}}}"#,
    );
    let data = write_fixture(&dir, "sample.json", r#"{"location": [1.0, 2.0]}"#);

    mapdiff(&mapping, &data)
        .assert()
        .code(0)
        .stderr(predicate::str::contains(
            "warning: unknown type 'geo_point' at location",
        ));
}

#[test]
fn unknown_type_warning_is_json_in_json_mode() {
    let dir = tempdir().expect("tempdir");
    let mapping = write_fixture(
        &dir,
        "geo.mapping",
        r#"{"properties": {"location": {"type": "geo_point"}}}"#,
    );
    let data = write_fixture(&dir, "sample.json", r#"{"location": "1,2"}"#);

    let output = mapdiff(&mapping, &data)
        .arg("--json")
        .output()
        .expect("run mapdiff");

    assert_eq!(output.status.code(), Some(0));
    let warning: Value = serde_json::from_slice(&output.stderr).expect("stderr json");
    assert_eq!(warning["warning"], Value::from("unknown_type"));
    assert_eq!(warning["details"]["type"], Value::from("geo_point"));
}

#[test]
fn alias_without_path_is_input_usage_error() {
    let dir = tempdir().expect("tempdir");
    let mapping = write_fixture(
        &dir,
        "bad.mapping",
        r#"{"properties": {"old": {"type": "alias"}}}"#,
    );
    let data = write_fixture(&dir, "sample.json", r#"{"old": 1}"#);

    let output = mapdiff(&mapping, &data).output().expect("run mapdiff");

    assert_eq!(output.status.code(), Some(3));
    let error: Value = serde_json::from_slice(&output.stderr).expect("stderr json");
    assert_eq!(error["error"], Value::from("input_usage_error"));
    assert!(
        error["message"]
            .as_str()
            .expect("message")
            .contains("alias field `old` has no `path`")
    );
}

#[test]
fn explicit_data_format_overrides_extension() {
    let dir = tempdir().expect("tempdir");
    let mapping = write_fixture(&dir, "logs.mapping", MAPPING);
    let data = write_fixture(&dir, "sample.txt", "body: 12\n");

    mapdiff(&mapping, &data)
        .args(["--data-format", "yaml"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("- body: 12"));
}

#[test]
fn array_under_object_mapping_passes_with_warning() {
    let dir = tempdir().expect("tempdir");
    let mapping = write_fixture(
        &dir,
        "tags.mapping",
        r#"{"properties": {"tags": {"type": "object", "properties": {"name": {"type": "keyword"}}}}}"#,
    );
    let data = write_fixture(&dir, "sample.json", r#"{"tags": [{"name": "x"}]}"#);

    mapdiff(&mapping, &data)
        .assert()
        .code(0)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "warning: unknown type 'object' at tags",
        ));
}

#[test]
fn misspelled_template_envelope_is_input_usage_error() {
    let dir = tempdir().expect("tempdir");
    let mapping = write_fixture(
        &dir,
        "typo.mapping",
        r#"{"template": {"mapping": {"properties": {"id": {"type": "long"}}}}}"#,
    );
    let data = write_fixture(&dir, "sample.json", r#"{"id": 1}"#);

    mapdiff(&mapping, &data)
        .assert()
        .code(3)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("has no field properties"));
}
