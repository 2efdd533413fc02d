use clap::{Args, Subcommand};
use serde::Serialize;
use std::fmt::Display;

use utilbox::string;

use super::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct StringArgs {
    #[command(subcommand)]
    command: StringCommand,
}

#[derive(Subcommand)]
enum StringCommand {
    /// Replace {0}, {1}, ... with the given arguments
    Format {
        format: String,
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Check a suffix and report the text before it
    EndsWith { subject: String, suffix: String },
    /// Truncate to a maximum character count, marking the cut
    Ellipsize {
        input: String,
        max_length: usize,
        /// Marker for truncated text (default from config, "...")
        #[arg(long)]
        suffix: Option<String>,
    },
    /// Uppercase the first letter of every word
    Ucwords {
        input: String,
        /// Characters separating words (default from config)
        #[arg(long)]
        delimiters: Option<String>,
    },
}

#[derive(Debug, Serialize)]
pub struct StringOutput {
    command: String,
    result: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    matched: Option<bool>,
}

fn output(command: &str, result: String, matched: Option<bool>) -> CmdResult<StringOutput> {
    Ok((
        StringOutput {
            command: command.to_string(),
            result,
            matched,
        },
        0,
    ))
}

pub fn run(args: StringArgs, global: &GlobalArgs) -> CmdResult<StringOutput> {
    let strings = &global.defaults.strings;

    match args.command {
        StringCommand::Format { format, args } => {
            let refs: Vec<&dyn Display> = args.iter().map(|a| a as &dyn Display).collect();
            output("string.format", string::format(&format, &refs)?, None)
        }
        StringCommand::EndsWith { subject, suffix } => {
            let (matched, rest) = string::ends_with(&subject, &suffix);
            output("string.ends_with", rest.to_string(), Some(matched))
        }
        StringCommand::Ellipsize {
            input,
            max_length,
            suffix,
        } => {
            let suffix = suffix.as_deref().unwrap_or(&strings.ellipsis);
            output(
                "string.ellipsize",
                string::ellipsize(&input, max_length, suffix),
                None,
            )
        }
        StringCommand::Ucwords { input, delimiters } => {
            let delimiters = delimiters
                .as_deref()
                .unwrap_or(&strings.ucwords_delimiters);
            output("string.ucwords", string::ucwords(&input, delimiters), None)
        }
    }
}
