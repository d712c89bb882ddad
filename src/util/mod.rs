//! Shared utilities

pub mod config;
pub mod context;
pub mod errors;
pub mod fs;
pub mod interrupt;
pub mod process;
pub mod shell;

pub use config::Config;
pub use context::GlobalContext;
pub use errors::CmxError;
pub use shell::Shell;
