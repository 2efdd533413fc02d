use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Base utilbox config directory (~/.config/utilbox/, %APPDATA%\utilbox on Windows)
pub fn utilbox() -> Result<PathBuf> {
    #[cfg(windows)]
    {
        let appdata = env::var("APPDATA").map_err(|_| {
            Error::internal_unexpected("APPDATA environment variable not set on Windows")
        })?;
        Ok(PathBuf::from(appdata).join("utilbox"))
    }

    #[cfg(not(windows))]
    {
        let home = env::var("HOME").map_err(|_| {
            Error::internal_unexpected("HOME environment variable not set on Unix-like system")
        })?;
        Ok(PathBuf::from(home).join(".config").join("utilbox"))
    }
}

/// Global utilbox.json config file path
pub fn utilbox_json() -> Result<PathBuf> {
    Ok(utilbox()?.join("utilbox.json"))
}

#[cfg(all(test, not(windows)))]
mod tests {
    use super::*;

    #[test]
    fn config_file_lives_under_config_dir() {
        let dir = utilbox().unwrap();
        let file = utilbox_json().unwrap();
        assert!(dir.ends_with(".config/utilbox"));
        assert_eq!(file.parent(), Some(dir.as_path()));
        assert_eq!(file.file_name().and_then(|n| n.to_str()), Some("utilbox.json"));
    }
}
