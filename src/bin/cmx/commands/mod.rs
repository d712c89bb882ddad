//! Command implementations

pub mod build;
pub mod clean;
pub mod cmake;
pub mod completions;
pub mod help;
pub mod init;
pub mod make;
pub mod show;
pub mod status;
