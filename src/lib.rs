//! cmx - one command-line vocabulary over CMake, CTest and the native builder
//!
//! This crate provides the core library functionality for cmx: reading the
//! CMake cache, discovering generators, classifying the native builder and
//! translating builder-agnostic requests into native flags.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

pub use builder::{BuilderFamily, MakeIntents};
pub use core::{CacheSnapshot, GeneratorCatalog};
pub use ops::Session;
pub use util::context::GlobalContext;
