//! Hex Dump Utility: a screen file as rows of decimal tile ids.

use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::path::Path;

use crate::error::{Result, VerifyError};

pub const DEFAULT_WIDTH: NonZeroUsize = match NonZeroUsize::new(32) {
    Some(width) => width,
    None => unreachable!(),
};

const RULE_LEN: usize = 60;

pub fn read(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| VerifyError::io(path, e))
}

/// `OOOO: ` hex offset, then `width` right-aligned decimal bytes per row.
pub fn write_dump<W: Write>(
    name: &str,
    data: &[u8],
    width: NonZeroUsize,
    mut out: W,
) -> io::Result<()> {
    let width = width.get();
    let rule = "-".repeat(RULE_LEN);

    writeln!(out, "Reading {name}")?;
    writeln!(out, "Size: {} bytes", data.len())?;
    writeln!(out, "{rule}")?;
    for (row, bytes) in data.chunks(width).enumerate() {
        write!(out, "{:04X}: ", row * width)?;
        for byte in bytes {
            write!(out, "{byte:3} ")?;
        }
        writeln!(out)?;
    }
    writeln!(out, "{rule}")
}
