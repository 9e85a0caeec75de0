//! CLI command handlers, one per output mode.

mod fetch_file;
mod fetch_string;

pub use fetch_file::run_fetch_file;
pub use fetch_string::run_fetch_string;
