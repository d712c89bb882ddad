//! Native build tool abstraction.
//!
//! Classifies the builder behind a CMake binary directory and shapes the
//! command lines sent to `cmake`, `ctest` and the native tool.

pub mod cmake;
pub mod family;
pub mod intent;

pub use cmake::CMakeBuilder;
pub use family::BuilderFamily;
pub use intent::{native_flags, MakeArg, MakeIntents, TranslationRule};
