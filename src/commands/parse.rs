use clap::{Args, Subcommand};
use serde::Serialize;
use serde_json::Value;

use utilbox::{boolean, float, integer};

use super::CmdResult;

#[derive(Args)]
pub struct ParseArgs {
    #[command(subcommand)]
    command: ParseCommand,

    /// Report null instead of failing on unparseable input
    #[arg(long = "try", global = true)]
    lenient: bool,
}

#[derive(Subcommand)]
enum ParseCommand {
    /// Parse "true" or "false", ignoring case and surrounding whitespace
    Bool { input: String },
    /// Parse a signed decimal integer
    Int {
        #[arg(allow_hyphen_values = true)]
        input: String,
    },
    /// Parse a decimal float (no hex)
    Float {
        #[arg(allow_hyphen_values = true)]
        input: String,
    },
}

#[derive(Debug, Serialize)]
pub struct ParseOutput {
    command: String,
    input: String,
    value: Value,
}

pub fn run(args: ParseArgs) -> CmdResult<ParseOutput> {
    let (command, input, parsed) = match args.command {
        ParseCommand::Bool { input } => {
            let parsed = boolean::parse(&input).map(Value::from);
            ("parse.bool", input, parsed)
        }
        ParseCommand::Int { input } => {
            let parsed = integer::parse(&input).map(Value::from);
            ("parse.int", input, parsed)
        }
        ParseCommand::Float { input } => {
            let parsed = float::parse(&input).map(Value::from);
            ("parse.float", input, parsed)
        }
    };

    let value = match parsed {
        Ok(value) => value,
        Err(_) if args.lenient => Value::Null,
        Err(err) => return Err(err),
    };

    Ok((
        ParseOutput {
            command: command.to_string(),
            input,
            value,
        },
        0,
    ))
}
