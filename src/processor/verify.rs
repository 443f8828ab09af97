//! Export Verifier.
//!
//! Every screen file is compared byte for byte against the tiles of the
//! world rectangle its index points at. The comparison itself
//! ([`check_screen`]) is pure; file handling and the per-file downgrade of
//! errors to a reported FAIL/SKIP live in [`verify_file`] and
//! [`verify_files`].

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};
use tracing::{debug, warn};

use crate::error::{Result, VerifyError};
use crate::model::{Mismatch, ScreenGeometry, TileIndex};

/// Maps a file name to the screen index it holds.
pub type IndexExtractor = dyn Fn(&str) -> Option<u32>;

/// `<anything>_<digits>.<ext>` -> `digits`.
pub fn trailing_index(file_name: &str) -> Option<u32> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    let (_, digits) = stem.rsplit_once('_')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Byte the exporter writes for a GID: 0 stays empty, the rest become
/// 0-based tile ids.
pub fn export_value(gid: u32) -> u32 {
    gid.saturating_sub(1)
}

/// Inverse of [`export_value`] for non-empty tiles. Byte 0 cannot tell
/// GID 0 from GID 1.
pub fn gid_from_byte(byte: u8) -> u32 {
    u32::from(byte) + 1
}

/// Compare one screen's bytes with the map. Stops at the first mismatch.
pub fn check_screen(
    bytes: &[u8],
    index: u32,
    geometry: &ScreenGeometry,
    tiles: &TileIndex,
) -> Result<()> {
    let expected_len = geometry.screen_len();
    if bytes.len() != expected_len {
        return Err(VerifyError::SizeMismatch {
            actual: bytes.len(),
            expected: expected_len,
        });
    }

    let out_of_range = || VerifyError::ScreenOutOfRange { index };
    let (origin_x, origin_y) = geometry.origin(index).ok_or_else(out_of_range)?;
    let width = geometry.screen_width as usize;

    for (i, &actual) in bytes.iter().enumerate() {
        let local_x = (i % width) as u32;
        let local_y = (i / width) as u32;
        let global_x = origin_x
            .checked_add(i64::from(local_x))
            .ok_or_else(out_of_range)?;
        let global_y = origin_y
            .checked_add(i64::from(local_y))
            .ok_or_else(out_of_range)?;

        let raw_gid = tiles.get(global_x, global_y);
        let expected = export_value(raw_gid);

        if u32::from(actual) != expected {
            return Err(VerifyError::ContentMismatch(Mismatch {
                local_x,
                local_y,
                global_x,
                global_y,
                actual,
                expected,
                raw_gid,
            }));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pass,
    Fail,
    Skip,
}

#[derive(Debug, Serialize)]
pub struct FileReport {
    pub file: PathBuf,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "error_message"
    )]
    pub error: Option<VerifyError>,
}

fn error_message<S: Serializer>(
    err: &Option<VerifyError>,
    s: S,
) -> std::result::Result<S::Ok, S::Error> {
    match err {
        Some(e) => s.serialize_str(&e.to_string()),
        None => s.serialize_none(),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub success: bool,
    #[serde(flatten)]
    pub geometry: ScreenGeometry,
    pub files: Vec<FileReport>,
}

pub fn verify_file(
    path: &Path,
    geometry: &ScreenGeometry,
    tiles: &TileIndex,
    extract: &IndexExtractor,
) -> FileReport {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let Some(index) = extract(&name) else {
        return FileReport {
            file: path.to_path_buf(),
            status: Status::Skip,
            index: None,
            error: Some(VerifyError::Naming {
                file: path.display().to_string(),
            }),
        };
    };

    let outcome = std::fs::read(path)
        .map_err(|source| VerifyError::Io {
            path: path.to_path_buf(),
            source,
        })
        .and_then(|bytes| check_screen(&bytes, index, geometry, tiles));

    let (status, error) = match outcome {
        Ok(()) => (Status::Pass, None),
        Err(e) => (Status::Fail, Some(e)),
    };
    debug!("{} (screen {}): {:?}", path.display(), index, status);

    FileReport {
        file: path.to_path_buf(),
        status,
        index: Some(index),
        error,
    }
}

/// Check every file; one failure never stops the others.
///
/// Unnamed files are skipped and only count against the run when
/// `strict_names` is set.
pub fn verify_files(
    files: &[PathBuf],
    geometry: &ScreenGeometry,
    tiles: &TileIndex,
    extract: &IndexExtractor,
    strict_names: bool,
) -> RunReport {
    let files: Vec<FileReport> = files
        .iter()
        .map(|path| verify_file(path, geometry, tiles, extract))
        .collect();

    log_coverage(geometry, &files);

    let success = files.iter().all(|r| match r.status {
        Status::Pass => true,
        Status::Skip => !strict_names,
        Status::Fail => false,
    });

    RunReport {
        success,
        geometry: *geometry,
        files,
    }
}

/// Missing screens named in the coverage warning.
const MISSING_LISTED: usize = 16;

fn log_coverage(geometry: &ScreenGeometry, files: &[FileReport]) {
    let seen: BTreeSet<u64> = files
        .iter()
        .filter_map(|r| r.index)
        .map(u64::from)
        .collect();
    let total = geometry.screen_count();

    let missing = total - seen.range(..total).count() as u64;
    if missing > 0 {
        let first: Vec<u64> = (0..total)
            .filter(|i| !seen.contains(i))
            .take(MISSING_LISTED)
            .collect();
        warn!(
            "{} of {} screens have no exported file, first: {:?}",
            missing, total, first
        );
    }

    for index in seen.range(total..) {
        warn!("Screen {} lies beyond the map extent ({} screens)", index, total);
    }
}
