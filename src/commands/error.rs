use clap::{Args, Subcommand};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use utilbox::codes;
use utilbox::defaults::Defaults;
use utilbox::{Ensurer, ErrorInfo, ExceptionSpec};

use super::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct ErrorArgs {
    #[command(subcommand)]
    command: ErrorCommand,
}

#[derive(Subcommand)]
enum ErrorCommand {
    /// List error type identifiers
    Codes,
    /// Build an error from a type identifier or configured alias
    Build {
        /// Type identifier or alias (example: `http`)
        type_id: String,
        /// Constructor arguments as a JSON array (inline, @file, or - for stdin)
        args: Option<String>,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorCodesOutput {
    command: String,
    codes: Vec<&'static str>,
    aliases: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBuildOutput {
    command: String,
    resolved: String,
    error: ErrorInfo,
}

pub fn run(args: ErrorArgs, global: &GlobalArgs) -> CmdResult<Value> {
    let value = match args.command {
        ErrorCommand::Codes => to_json(ErrorCodesOutput {
            command: "error.codes".to_string(),
            codes: codes::all_codes().iter().map(|c| c.as_str()).collect(),
            aliases: global.defaults.exception_aliases.clone(),
        })?,
        ErrorCommand::Build { type_id, args } => {
            let args = match args {
                Some(raw) => super::read_json_arg(&raw, "args")?,
                None => Value::Array(Vec::new()),
            };
            to_json(build(&global.defaults, &type_id, args)?)?
        }
    };

    Ok((value, 0))
}

fn build(defaults: &Defaults, type_id: &str, args: Value) -> utilbox::Result<ErrorBuildOutput> {
    let Value::Array(args) = args else {
        return Err(utilbox::Error::validation_invalid_argument(
            "args",
            "args must be a JSON array",
            None,
            None,
        ));
    };

    let ensurer = Ensurer::from_defaults(defaults);
    let resolved = ensurer.resolve(type_id).to_string();
    let err = ensurer.build_error(ExceptionSpec::construct(type_id, args));

    Ok(ErrorBuildOutput {
        command: "error.build".to_string(),
        resolved,
        error: err.info(),
    })
}

fn to_json<T: Serialize>(output: T) -> utilbox::Result<Value> {
    serde_json::to_value(output).map_err(|e| utilbox::Error::internal_json(e.to_string(), None))
}
