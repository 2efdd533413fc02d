use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;

use crate::paths;

/// Root configuration structure for utilbox.json
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UtilboxConfig {
    #[serde(default)]
    pub defaults: Defaults,
}

/// All configurable defaults that can be overridden via utilbox.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Defaults {
    /// Short names accepted in place of a registered type id by an
    /// [`Ensurer`](crate::Ensurer) built with `Ensurer::from_defaults` (and
    /// by `utilbox error build`). The free `ensure*` functions keep the
    /// built-in table.
    #[serde(default = "default_exception_aliases")]
    pub exception_aliases: BTreeMap<String, String>,

    #[serde(default = "default_temp_file")]
    pub temp_file: TempFileConfig,

    #[serde(default = "default_strings")]
    pub strings: StringsConfig,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            exception_aliases: default_exception_aliases(),
            temp_file: default_temp_file(),
            strings: default_strings(),
        }
    }
}

/// Temp file creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TempFileConfig {
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Octal mode for directories created on demand (unix only).
    #[serde(default = "default_dir_mode")]
    pub dir_mode: String,
}

impl TempFileConfig {
    /// Parsed `dir_mode`, falling back to 0775 when it is not valid octal.
    pub fn dir_mode_bits(&self) -> u32 {
        u32::from_str_radix(self.dir_mode.trim_start_matches("0o"), 8).unwrap_or(0o775)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StringsConfig {
    #[serde(default = "default_ellipsis")]
    pub ellipsis: String,

    #[serde(default = "default_ucwords_delimiters")]
    pub ucwords_delimiters: String,
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_exception_aliases() -> BTreeMap<String, String> {
    crate::ensure::default_aliases()
}

fn default_temp_file() -> TempFileConfig {
    TempFileConfig {
        timeout_ms: default_timeout_ms(),
        poll_interval_ms: default_poll_interval_ms(),
        dir_mode: default_dir_mode(),
    }
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_dir_mode() -> String {
    "0775".to_string()
}

fn default_strings() -> StringsConfig {
    StringsConfig {
        ellipsis: default_ellipsis(),
        ucwords_delimiters: default_ucwords_delimiters(),
    }
}

fn default_ellipsis() -> String {
    crate::string::DEFAULT_ELLIPSIS.to_string()
}

fn default_ucwords_delimiters() -> String {
    crate::string::DEFAULT_UCWORDS_DELIMITERS.to_string()
}

// =============================================================================
// Loading functions
// =============================================================================

/// Load defaults, merging file config with built-in defaults.
/// If utilbox.json is missing or invalid, silently returns built-in defaults.
pub fn load_defaults() -> Defaults {
    load_config().defaults
}

/// Load the full utilbox.json config, falling back to defaults on any error.
pub fn load_config() -> UtilboxConfig {
    load_config_from_file().unwrap_or_default()
}

/// Strict load: missing file yields defaults, unreadable or invalid JSON is
/// an error.
pub fn try_load_config() -> crate::Result<UtilboxConfig> {
    let path = paths::utilbox_json()?;
    if !path.exists() {
        return Ok(UtilboxConfig::default());
    }
    load_config_from_file()
}

fn load_config_from_file() -> crate::Result<UtilboxConfig> {
    let path = paths::utilbox_json()?;

    if !path.exists() {
        return Err(crate::Error::other("utilbox.json not found"));
    }

    let content = fs::read_to_string(&path).map_err(|e| {
        crate::Error::internal_io(e.to_string(), Some(format!("read {}", path.display())))
    })?;

    serde_json::from_str(&content)
        .map_err(|e| crate::Error::config_invalid_json(path.display().to_string(), e))
}

/// Save config to utilbox.json (creates the config directory if missing).
pub fn save_config(config: &UtilboxConfig) -> crate::Result<()> {
    let path = paths::utilbox_json()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            crate::Error::internal_io(e.to_string(), Some(format!("create {}", parent.display())))
        })?;
    }

    let content = serde_json::to_string_pretty(config).map_err(|e| {
        crate::Error::internal_json(e.to_string(), Some("serialize utilbox.json".to_string()))
    })?;

    fs::write(&path, content).map_err(|e| {
        crate::Error::internal_io(e.to_string(), Some(format!("write {}", path.display())))
    })?;

    crate::log_status!("config", "Wrote {}", path.display());
    Ok(())
}

pub fn config_exists() -> bool {
    paths::utilbox_json()
        .map(|p| p.exists())
        .unwrap_or(false)
}

/// Delete utilbox.json. Returns whether a file was removed.
pub fn reset_config() -> crate::Result<bool> {
    let path = paths::utilbox_json()?;

    if path.exists() {
        fs::remove_file(&path).map_err(|e| {
            crate::Error::internal_io(e.to_string(), Some(format!("delete {}", path.display())))
        })?;
        Ok(true)
    } else {
        Ok(false)
    }
}

pub fn config_path() -> crate::Result<String> {
    Ok(paths::utilbox_json()?.display().to_string())
}

/// Built-in defaults (ignoring any file config)
pub fn builtin_defaults() -> Defaults {
    Defaults::default()
}
