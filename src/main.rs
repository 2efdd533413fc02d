use clap::{Parser, Subcommand};

use commands::GlobalArgs;

mod commands;
mod output;
mod tty;

use commands::{config, error, file, http, parse, string, time};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "utilbox")]
#[command(version = VERSION)]
#[command(about = "Parsing, string, HTTP, file and time helpers with JSON output")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Strict boolean, integer and float parsing
    Parse(parse::ParseArgs),
    /// Formatting, suffix checks, truncation and word casing
    String(string::StringArgs),
    /// Header parsing and query string building/parsing
    Http(http::HttpArgs),
    /// Delete files and directory contents, create temp files
    File(file::FileArgs),
    /// SQL timestamp literals and the millisecond clock
    Time(time::TimeArgs),
    /// Manage utilbox.json
    Config(config::ConfigArgs),
    /// List error types and build errors through configured aliases
    Error(error::ErrorArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let global = GlobalArgs::load();

    let (json_result, exit_code) = commands::run_json(cli.command, &global);
    output::print_json_result(json_result);

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
