//! Output side: the verification report and the standalone hex dump.
pub mod hexdump;
pub mod report;
