use serde_json::Value;
use std::io::Read;
use std::path::Path;

pub type CmdResult<T> = utilbox::Result<(T, i32)>;

pub(crate) struct GlobalArgs {
    pub defaults: utilbox::defaults::Defaults,
}

impl GlobalArgs {
    pub fn load() -> Self {
        Self {
            defaults: utilbox::defaults::load_defaults(),
        }
    }
}

// ============================================================================
// Input (CLI layer)
// ============================================================================

/// Read text from an argument, a file (`@path`), or stdin (`-`).
pub fn read_text_arg(arg: &str, field: &str) -> utilbox::Result<String> {
    if arg.trim() == "-" {
        if crate::tty::is_stdin_tty() {
            return Err(utilbox::Error::validation_invalid_argument(
                field,
                format!("Cannot read {} from stdin when stdin is a TTY", field),
                None,
                None,
            ));
        }
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).map_err(|e| {
            utilbox::Error::internal_io(e.to_string(), Some("read stdin".to_string()))
        })?;
        return Ok(buf);
    }

    if let Some(path) = arg.strip_prefix('@') {
        if path.trim().is_empty() {
            return Err(utilbox::Error::validation_invalid_argument(
                field,
                format!("Invalid {} '@' (missing file path)", field),
                None,
                None,
            ));
        }
        return std::fs::read_to_string(Path::new(path)).map_err(|e| {
            utilbox::Error::internal_io(e.to_string(), Some(format!("read {}", path)))
        });
    }

    Ok(arg.to_string())
}

/// Parse a JSON argument (inline, `@path`, or `-`).
pub fn read_json_arg(arg: &str, field: &str) -> utilbox::Result<Value> {
    let raw = read_text_arg(arg, field)?;
    serde_json::from_str(&raw)
        .map_err(|e| utilbox::Error::internal_json(e.to_string(), Some(format!("parse {}", field))))
}

pub mod config;
pub mod error;
pub mod file;
pub mod http;
pub mod parse;
pub mod string;
pub mod time;

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args))
    };
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (utilbox::Result<serde_json::Value>, i32) {
    match command {
        // Commands without global context
        crate::Commands::Parse(args) => dispatch!(args, parse),
        crate::Commands::Http(args) => dispatch!(args, http),
        crate::Commands::Time(args) => dispatch!(args, time),
        crate::Commands::Config(args) => dispatch!(args, config),

        // Commands reading configured defaults
        crate::Commands::String(args) => dispatch!(args, global, string),
        crate::Commands::Error(args) => dispatch!(args, global, error),
        crate::Commands::File(args) => {
            crate::tty::status("utilbox is working...");
            dispatch!(args, global, file)
        }
    }
}
