//! High-level operations.
//!
//! This module contains the implementation of cmx commands. Every operation
//! runs against a [`Session`] built once per invocation.

pub mod cmx_build;
pub mod cmx_clean;
pub mod cmx_configure;
pub mod cmx_init;
pub mod cmx_status;
pub mod session;

pub use cmx_build::{build, make, BuildOptions, MakeOptions};
pub use cmx_clean::{clean, CleanOptions};
pub use cmx_configure::{configure, ensure_configured, ConfigureOptions};
pub use cmx_init::{init_project, InitOptions, Lang};
pub use cmx_status::{cache_entries, format_entry, format_report, status, StatusReport};
pub use cmx_test::{test, TestOptions};
pub use session::Session;
