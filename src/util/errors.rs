//! Error types and process exit codes.

use std::path::PathBuf;

use thiserror::Error;

/// Exit codes reported by the `cmx` binary.
///
/// A failing child process is the exception: its own exit code is forwarded
/// unchanged.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    /// A domain operation failed (bad project state, I/O failure, ...)
    pub const OPERATION_FAILED: i32 = 1;
    /// Malformed command-line arguments
    pub const USAGE: i32 = 2;
    /// Unexpected internal error (panic)
    pub const INTERNAL: i32 = 101;
    /// Interrupted by the user (Ctrl-C)
    pub const INTERRUPTED: i32 = 130;
}

/// Errors raised by cmx operations.
#[derive(Debug, Error)]
pub enum CmxError {
    #[error("`{program}` failed with exit code {code}")]
    ProcessFailed { program: String, code: i32 },

    #[error("interrupted")]
    Interrupted,

    #[error("`{}` already exists\n\nhelp: Pass `--force` to overwrite it", .path.display())]
    ProjectExists { path: PathBuf },

    #[error("unknown command `{name}`")]
    UnknownCommand { name: String },

    #[error("invalid define `{define}`: expected VAR=VALUE or VAR:TYPE=VALUE")]
    InvalidDefine { define: String },
}

impl CmxError {
    /// The process exit code this error maps to.
    pub fn exit_code(&self) -> i32 {
        match self {
            CmxError::ProcessFailed { code, .. } => *code,
            CmxError::Interrupted => exit_code::INTERRUPTED,
            CmxError::ProjectExists { .. }
            | CmxError::UnknownCommand { .. }
            | CmxError::InvalidDefine { .. } => exit_code::OPERATION_FAILED,
        }
    }
}

/// Pick the exit code for an error chain.
///
/// The first [`CmxError`] in the chain decides; anything else is an
/// operation failure.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<CmxError>())
        .map(CmxError::exit_code)
        .unwrap_or(exit_code::OPERATION_FAILED)
}

/// Whether the error chain records a Ctrl-C.
///
/// Probes that tolerate failure must still give up on an interrupt.
pub fn is_interrupted(err: &anyhow::Error) -> bool {
    err.chain()
        .any(|cause| matches!(cause.downcast_ref::<CmxError>(), Some(CmxError::Interrupted)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_process_failure_forwards_code() {
        let err = CmxError::ProcessFailed {
            program: "make".to_string(),
            code: 2,
        };
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_exit_code_found_through_context() {
        let result: anyhow::Result<()> = Err(CmxError::Interrupted.into());
        let err = result.context("while building").unwrap_err();
        assert_eq!(exit_code_for(&err), exit_code::INTERRUPTED);
    }

    #[test]
    fn test_is_interrupted_through_context() {
        let result: anyhow::Result<()> = Err(CmxError::Interrupted.into());
        let err = result.context("failed to run cmake --version").unwrap_err();
        assert!(is_interrupted(&err));

        let err = anyhow::Error::new(CmxError::ProcessFailed {
            program: "cmake".to_string(),
            code: 130,
        });
        assert!(!is_interrupted(&err));
    }

    #[test]
    fn test_foreign_errors_are_operation_failures() {
        let err = anyhow::anyhow!("disk on fire");
        assert_eq!(exit_code_for(&err), exit_code::OPERATION_FAILED);
    }

    #[test]
    fn test_codes_are_distinct() {
        let codes = [
            exit_code::OPERATION_FAILED,
            exit_code::USAGE,
            exit_code::INTERNAL,
            exit_code::INTERRUPTED,
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
