//! Console and JSON rendering of a finished run.

use std::io::{self, Write};

use crate::error::VerifyError;
use crate::processor::verify::{RunReport, Status};

pub fn write_console<W: Write>(report: &RunReport, mut out: W) -> io::Result<()> {
    for file in &report.files {
        let path = file.file.display();
        match (file.status, &file.error) {
            (Status::Pass, _) => writeln!(out, "[PASS] {path} verified.")?,
            (Status::Fail, Some(e @ VerifyError::ContentMismatch(_))) => {
                writeln!(out, "[FAIL] {path} {e}")?
            }
            (Status::Fail, Some(e)) => writeln!(out, "[FAIL] {path}: {e}")?,
            (Status::Fail, None) => writeln!(out, "[FAIL] {path}")?,
            (Status::Skip, Some(e)) => writeln!(out, "[SKIP] {path}: {e}")?,
            (Status::Skip, None) => writeln!(out, "[SKIP] {path}")?,
        }
    }

    writeln!(out)?;
    if report.success {
        writeln!(out, "SUCCESS: All files verified against TMX.")
    } else {
        writeln!(out, "FAILURE: Verification failed.")
    }
}

pub fn write_json<W: Write>(report: &RunReport, mut out: W) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut out, report)?;
    writeln!(out)
}
