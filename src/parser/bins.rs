//! Discovery of exported screen files.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::error::{Result, VerifyError};

/// Every regular file matching `pattern`, in lexical order.
///
/// An invalid pattern is a configuration problem; a pattern that matches
/// nothing means there is nothing to verify.
pub fn discover(pattern: &str) -> Result<Vec<PathBuf>> {
    let entries = glob::glob(pattern)
        .map_err(|e| VerifyError::Config(format!("bad binary pattern `{pattern}`: {e}")))?;

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => warn!("Skipping unreadable path {}: {}", e.path().display(), e.error()),
        }
    }

    if files.is_empty() {
        return Err(VerifyError::NoBinaries(pattern.to_string()));
    }

    files.sort();
    info!("Found {} binary files.", files.len());
    Ok(files)
}
