//! CLI subcommand implementations.

pub mod init;
pub mod start;
pub mod stop;
pub mod today;
