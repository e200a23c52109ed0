use std::collections::BTreeSet;
use std::path::PathBuf;

use serde_json::{Map, Value, json};

use crate::cmd::load;
use crate::domain::error::ValidateError;
use crate::domain::mapping::Mapping;
use crate::domain::report::DiffWarning;
use crate::engine::diff::{self, DiffOutcome};
use crate::engine::render;
use crate::io::Format;

/// How a failing report is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Diff,
    Json,
}

/// Validation switches shared by every record of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidateOptions {
    /// Report declared fields absent from the record.
    pub include_missing: bool,
    /// Check every record instead of only the first one.
    pub check_all: bool,
}

/// Input arguments for `diff` command execution.
#[derive(Debug, Clone)]
pub struct DiffCommandArgs {
    pub mapping: PathBuf,
    pub data: PathBuf,
    pub data_format: Option<Format>,
    pub output: OutputMode,
    pub options: ValidateOptions,
}

/// Exit code plus the lines the binary writes to stdout and stderr.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffCommandResponse {
    pub exit_code: i32,
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
}

/// First record whose report was non-empty, numbered from 1.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordFailure {
    pub record: usize,
    pub outcome: DiffOutcome,
}

/// Result of iterating records until the first failure.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordScan {
    pub checked: usize,
    pub failure: Option<RecordFailure>,
    /// Distinct unknown-type warnings across all checked records, sorted.
    pub warnings: Vec<DiffWarning>,
}

pub fn run(args: &DiffCommandArgs) -> DiffCommandResponse {
    match execute(args) {
        Ok(scan) => scan_response(args, scan),
        Err(error) => error_response(&error),
    }
}

fn execute(args: &DiffCommandArgs) -> Result<RecordScan, ValidateError> {
    let mapping = load::load_mapping(&args.mapping)?;
    let records = load::load_records(&args.data, args.data_format)?;
    check_records(&mapping, records, args.options)
}

/// Diffs records in order and stops at the first one with a non-empty
/// report. Without `check_all` only the first record is looked at. Failures
/// are never aggregated across records.
pub fn check_records(
    mapping: &Mapping,
    records: Vec<Value>,
    options: ValidateOptions,
) -> Result<RecordScan, ValidateError> {
    let limit = if options.check_all { records.len() } else { 1 };
    let mut warnings = BTreeSet::new();
    let mut scan = RecordScan::default();

    for (index, record) in records.into_iter().take(limit).enumerate() {
        let number = index + 1;
        let mut record: Map<String, Value> = match record {
            Value::Object(map) => map,
            _ => return Err(ValidateError::RecordNotObject { record: number }),
        };
        let outcome = diff::diff(mapping, &mut record, options.include_missing).map_err(
            |source| ValidateError::Diff {
                record: number,
                source,
            },
        )?;
        scan.checked = number;
        warnings.extend(outcome.warnings.iter().cloned());
        if !outcome.conforms() {
            scan.failure = Some(RecordFailure {
                record: number,
                outcome,
            });
            break;
        }
    }

    scan.warnings = warnings.into_iter().collect();
    Ok(scan)
}

fn scan_response(args: &DiffCommandArgs, scan: RecordScan) -> DiffCommandResponse {
    let mut stderr: Vec<String> = scan
        .warnings
        .iter()
        .map(|warning| warning_line(args.output, warning))
        .collect();

    let Some(failure) = scan.failure else {
        return DiffCommandResponse {
            exit_code: 0,
            stdout: Vec::new(),
            stderr,
        };
    };

    if args.options.check_all {
        stderr.push(match args.output {
            OutputMode::Diff => format!("Validation errors found in record {}", failure.record),
            OutputMode::Json => json!({
                "record": failure.record,
                "message": format!("validation errors found in record {}", failure.record),
            })
            .to_string(),
        });
    }

    let stdout = match args.output {
        OutputMode::Diff => render::render_diff_lines(&failure.outcome.report),
        OutputMode::Json => match render::render_json(&failure.outcome.report) {
            Ok(line) => vec![line],
            Err(source) => {
                let mut response = error_response(&ValidateError::SerializeReport { source });
                stderr.append(&mut response.stderr);
                response.stderr = stderr;
                return response;
            }
        },
    };

    DiffCommandResponse {
        exit_code: 2,
        stdout,
        stderr,
    }
}

fn warning_line(output: OutputMode, warning: &DiffWarning) -> String {
    match output {
        OutputMode::Diff => format!("warning: {}", warning.message()),
        OutputMode::Json => json!({
            "warning": "unknown_type",
            "message": warning.message(),
            "details": {"path": warning.path, "type": warning.type_name},
        })
        .to_string(),
    }
}

fn error_response(error: &ValidateError) -> DiffCommandResponse {
    let code = error.exit_code();
    let payload = json!({
        "error": error.kind(),
        "message": error.to_string(),
        "code": code,
        "details": {"command": "diff"},
    });
    DiffCommandResponse {
        exit_code: code,
        stdout: Vec::new(),
        stderr: vec![payload.to_string()],
    }
}
