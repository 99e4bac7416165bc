use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Base blendrun config directory (~/.config/blendrun/, %APPDATA%\blendrun\ on Windows)
pub fn blendrun() -> Result<PathBuf> {
    #[cfg(windows)]
    {
        let appdata = env::var("APPDATA").map_err(|_| {
            Error::internal_unexpected("APPDATA environment variable not set on Windows")
        })?;
        Ok(PathBuf::from(appdata).join("blendrun"))
    }

    #[cfg(not(windows))]
    {
        let home = env::var("HOME").map_err(|_| {
            Error::internal_unexpected("HOME environment variable not set on Unix-like system")
        })?;
        Ok(PathBuf::from(home).join(".config").join("blendrun"))
    }
}

/// Global blendrun.json config file path
pub fn blendrun_json() -> Result<PathBuf> {
    Ok(blendrun()?.join("blendrun.json"))
}
