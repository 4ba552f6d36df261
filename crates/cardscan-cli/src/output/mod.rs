//! Output formatting for CLI.

mod report;
mod status;

pub use report::ScanReport;
pub use status::ConsoleStatus;
