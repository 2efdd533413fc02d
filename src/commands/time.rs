use clap::{Args, Subcommand};
use serde::Serialize;

use utilbox::time;

use super::CmdResult;

#[derive(Args)]
pub struct TimeArgs {
    #[command(subcommand)]
    command: TimeCommand,
}

#[derive(Subcommand)]
enum TimeCommand {
    /// ANSI SQL timestamp literal in the local timezone (default: now)
    SqlTimestamp {
        #[arg(allow_hyphen_values = true)]
        unix: Option<i64>,
    },
    /// Current unix time in milliseconds
    Millis,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum TimeValue {
    Literal(String),
    Millis(i64),
}

#[derive(Debug, Serialize)]
pub struct TimeOutput {
    command: String,
    value: TimeValue,
}

pub fn run(args: TimeArgs) -> CmdResult<TimeOutput> {
    let (command, value) = match args.command {
        TimeCommand::SqlTimestamp { unix } => {
            let unix = unix.unwrap_or_else(|| time::in_millis() / 1000);
            ("time.sql_timestamp", TimeValue::Literal(time::ansi_sql_timestamp(unix)?))
        }
        TimeCommand::Millis => ("time.millis", TimeValue::Millis(time::in_millis())),
    };

    Ok((
        TimeOutput {
            command: command.to_string(),
            value,
        },
        0,
    ))
}
