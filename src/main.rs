use std::path::PathBuf;
use std::process;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand, ValueEnum};
use mapdiff::cmd::validate::{self, DiffCommandArgs, OutputMode, ValidateOptions};
use mapdiff::io::Format;
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Debug, Parser)]
#[command(
    name = "mapdiff",
    version,
    about = "Utilities for checking integration data against index field mappings"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Type check a sample data record against its field mapping.
    Diff(DiffArgs),
}

#[derive(Debug, clap::Args)]
struct DiffArgs {
    /// The mapping for the format the data should have.
    #[arg(long)]
    mapping: PathBuf,

    /// The location of data to validate.
    #[arg(long)]
    data: PathBuf,

    /// Data format; inferred from the file extension when omitted.
    #[arg(long, value_enum)]
    data_format: Option<CliDataFormat>,

    /// Output machine-readable JSON instead of the default diff format.
    #[arg(long = "json", default_value_t = false)]
    output_json: bool,

    /// Output fields that are expected in the mapping but missing in the data.
    #[arg(long, default_value_t = false)]
    show_missing: bool,

    /// Check every data record and report the first one with errors.
    #[arg(long, default_value_t = false)]
    check_all: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliDataFormat {
    Json,
    Yaml,
    Jsonl,
}

impl From<CliDataFormat> for Format {
    fn from(value: CliDataFormat) -> Self {
        match value {
            CliDataFormat::Json => Self::Json,
            CliDataFormat::Yaml => Self::Yaml,
            CliDataFormat::Jsonl => Self::Jsonl,
        }
    }
}

impl From<DiffArgs> for DiffCommandArgs {
    fn from(args: DiffArgs) -> Self {
        Self {
            mapping: args.mapping,
            data: args.data,
            data_format: args.data_format.map(Into::into),
            output: if args.output_json {
                OutputMode::Json
            } else {
                OutputMode::Diff
            },
            options: ValidateOptions {
                include_missing: args.show_missing,
                check_all: args.check_all,
            },
        }
    }
}

#[derive(Serialize)]
struct CliError<'a> {
    error: &'a str,
    message: String,
    code: i32,
    details: Value,
}

fn main() {
    process::exit(run());
}

fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => return handle_parse_error(error),
    };

    match cli.command {
        Commands::Diff(args) => run_diff(args),
    }
}

fn handle_parse_error(error: clap::Error) -> i32 {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            print!("{error}");
            0
        }
        _ => {
            emit_error(
                "input_usage_error",
                error.to_string(),
                json!({"kind": "cli_parse_error"}),
                3,
            );
            3
        }
    }
}

fn run_diff(args: DiffArgs) -> i32 {
    let args: DiffCommandArgs = args.into();
    let response = validate::run(&args);
    for line in &response.stderr {
        eprintln!("{line}");
    }
    for line in &response.stdout {
        println!("{line}");
    }
    response.exit_code
}

fn emit_error(error: &'static str, message: String, details: Value, code: i32) {
    let payload = CliError {
        error,
        message,
        code,
        details,
    };
    match serde_json::to_string(&payload) {
        Ok(serialized) => eprintln!("{serialized}"),
        Err(_) => eprintln!(
            "{{\"error\":\"internal_error\",\"message\":\"failed to serialize error\",\"code\":1}}"
        ),
    }
}
