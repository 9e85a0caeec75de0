//! CLI parse and path tests.

use super::{parse_args, usage_exit_code, Cli};
use clap::Parser;

pub(super) fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

pub(super) fn parse_err_code(args: &[&str]) -> i32 {
    usage_exit_code(&Cli::try_parse_from(args).unwrap_err())
}


#[test]
fn parse_args_returns_usage_code_on_error() {
    assert_eq!(parse_args(["wget"]).unwrap_err(), 1);
    assert!(parse_args(["wget", "https://example.com/"]).is_ok());
}
