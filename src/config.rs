//! Run configuration.
//!
//! Built-in defaults, then an optional JSON file, then command-line flags.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, VerifyError};

pub const DEFAULT_MAP_FILE: &str = "test/maps.tmx";
pub const DEFAULT_BIN_PATTERN: &str = "test/maps*_*.bin";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct VerifyConfig {
    /// Tiled map the screens were exported from.
    pub map_file: PathBuf,
    /// Glob selecting the exported screen files.
    pub bin_pattern: String,
    /// Treat files without a screen index as failures.
    pub strict_names: bool,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            map_file: PathBuf::from(DEFAULT_MAP_FILE),
            bin_pattern: DEFAULT_BIN_PATTERN.to_string(),
            strict_names: false,
        }
    }
}

impl VerifyConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| VerifyError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| VerifyError::io(path, e))?;
        serde_json::from_str(&json)
            .map_err(|e| VerifyError::Config(format!("{}: {e}", path.display())))
    }
}
