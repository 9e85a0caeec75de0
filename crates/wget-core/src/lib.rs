pub mod config;
pub mod logging;

pub mod fetch;
pub mod naming;
pub mod report;
pub mod result;
pub mod staging;
pub mod transfer;

pub use fetch::{get_file, get_string, FileFetch, FileTarget};
pub use report::Console;
pub use result::ResultCode;
pub use transfer::{Credential, TransferConfig, TransferRequest, TransferRunner};
