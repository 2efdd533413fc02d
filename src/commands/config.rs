use clap::{Args, Subcommand};
use serde::Serialize;
use serde_json::Value;

use utilbox::defaults::{self, Defaults, UtilboxConfig};

use super::CmdResult;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Display configuration (merged defaults + file)
    Show {
        /// Show only built-in defaults (ignore utilbox.json)
        #[arg(long)]
        builtin: bool,
    },
    /// Set a configuration value at a JSON pointer path
    Set {
        /// JSON pointer path (e.g., /defaults/temp_file/timeout_ms)
        pointer: String,
        /// Value to set (JSON)
        value: String,
    },
    /// Reset configuration to built-in defaults (deletes utilbox.json)
    Reset,
    /// Show the path to utilbox.json
    Path,
}

#[derive(Debug, Serialize, Default)]
pub struct ConfigOutput {
    command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<UtilboxConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    defaults: Option<Defaults>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exists: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pointer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    deleted: Option<bool>,
}

pub fn run(args: ConfigArgs) -> CmdResult<ConfigOutput> {
    match args.command {
        ConfigCommand::Show { builtin } => show(builtin),
        ConfigCommand::Set { pointer, value } => set(&pointer, &value),
        ConfigCommand::Reset => reset(),
        ConfigCommand::Path => path(),
    }
}

fn show(builtin: bool) -> CmdResult<ConfigOutput> {
    let output = if builtin {
        ConfigOutput {
            command: "config.show".to_string(),
            defaults: Some(defaults::builtin_defaults()),
            ..Default::default()
        }
    } else {
        ConfigOutput {
            command: "config.show".to_string(),
            config: Some(defaults::try_load_config()?),
            ..Default::default()
        }
    };

    Ok((output, 0))
}

/// Set `value` at `pointer`, creating intermediate objects as needed.
fn set_json_pointer(target: &mut Value, pointer: &str, value: Value) -> utilbox::Result<()> {
    let tokens: Vec<String> = pointer
        .split('/')
        .skip(1)
        .map(|t| t.replace("~1", "/").replace("~0", "~"))
        .collect();

    let Some((last, parents)) = tokens.split_last() else {
        return Err(utilbox::Error::validation_invalid_argument(
            "pointer",
            "JSON pointer must name a field",
            Some(pointer.to_string()),
            None,
        ));
    };

    let mut current = target;
    for token in parents {
        let Value::Object(map) = current else {
            return Err(utilbox::Error::validation_invalid_argument(
                "pointer",
                format!("'{}' does not address an object", token),
                Some(pointer.to_string()),
                None,
            ));
        };
        current = map
            .entry(token.clone())
            .or_insert_with(|| Value::Object(serde_json::Map::new()));
    }

    match current {
        Value::Object(map) => {
            map.insert(last.clone(), value);
            Ok(())
        }
        _ => Err(utilbox::Error::validation_invalid_argument(
            "pointer",
            format!("'{}' does not address an object", last),
            Some(pointer.to_string()),
            None,
        )),
    }
}

fn set(pointer: &str, value_str: &str) -> CmdResult<ConfigOutput> {
    if !pointer.starts_with('/') {
        return Err(utilbox::Error::validation_invalid_argument(
            "pointer",
            "JSON pointer must start with '/'",
            None,
            None,
        ));
    }

    let value: Value = serde_json::from_str(value_str).map_err(|e| {
        utilbox::Error::internal_json(e.to_string(), Some("parse value".to_string()))
    })?;

    let config = defaults::load_config();

    let mut config_json = serde_json::to_value(&config).map_err(|e| {
        utilbox::Error::internal_unexpected(format!("Failed to serialize config: {}", e))
    })?;

    set_json_pointer(&mut config_json, pointer, value.clone())?;

    let config: UtilboxConfig = serde_json::from_value(config_json).map_err(|e| {
        utilbox::Error::config_invalid_json(defaults::config_path().unwrap_or_default(), e)
            .with_hint(format!("Check the type of the value at {}", pointer))
    })?;

    defaults::save_config(&config)?;

    Ok((
        ConfigOutput {
            command: "config.set".to_string(),
            config: Some(config),
            pointer: Some(pointer.to_string()),
            value: Some(value),
            ..Default::default()
        },
        0,
    ))
}

fn reset() -> CmdResult<ConfigOutput> {
    let deleted = defaults::reset_config()?;

    Ok((
        ConfigOutput {
            command: "config.reset".to_string(),
            path: Some(defaults::config_path()?),
            deleted: Some(deleted),
            ..Default::default()
        },
        0,
    ))
}

fn path() -> CmdResult<ConfigOutput> {
    Ok((
        ConfigOutput {
            command: "config.path".to_string(),
            path: Some(defaults::config_path()?),
            exists: Some(defaults::config_exists()),
            ..Default::default()
        },
        0,
    ))
}
