//! Subprocess execution utilities.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Output, Stdio};

use anyhow::{Context, Result};

use crate::util::errors::CmxError;
use crate::util::interrupt;

/// Builder for subprocess execution.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    cwd: Option<PathBuf>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    /// Get the arguments.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Get the working directory, if one was set.
    pub fn get_cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd
    }

    /// Execute the command capturing stdout and stderr.
    ///
    /// Ctrl-C before or during the run becomes [`CmxError::Interrupted`],
    /// whatever the child reported.
    pub fn exec(&self) -> Result<Output> {
        interrupt::check()?;

        let mut cmd = self.build_command();
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let output = cmd
            .output()
            .with_context(|| format!("failed to run `{}`", self.display_command()))?;

        interrupt::check()?;
        Ok(output)
    }

    /// Execute with inherited stdio and return the exit status only.
    pub fn status(&self) -> Result<ExitStatus> {
        interrupt::check()?;

        let mut cmd = self.build_command();
        cmd.status()
            .with_context(|| format!("failed to execute `{}`", self.program.display()))
    }

    /// Execute with inherited stdio and require success.
    ///
    /// A non-zero exit becomes [`CmxError::ProcessFailed`] carrying the
    /// child's code; Ctrl-C during the run becomes [`CmxError::Interrupted`].
    pub fn run(&self) -> Result<()> {
        tracing::debug!("running {}", self.display_command());
        let status = self.status()?;
        interrupt::check()?;

        if !status.success() {
            return Err(CmxError::ProcessFailed {
                program: self.program_name(),
                code: exit_code_of(status),
            }
            .into());
        }

        Ok(())
    }

    /// The program's file name, for messages.
    pub fn program_name(&self) -> String {
        self.program
            .file_name()
            .unwrap_or(self.program.as_os_str())
            .to_string_lossy()
            .into_owned()
    }

    /// Display the command for messages and dry runs.
    pub fn display_command(&self) -> String {
        let mut parts = vec![quote(&self.program.display().to_string())];
        parts.extend(self.args.iter().map(|a| quote(a)));
        parts.join(" ")
    }
}

/// Quote an argument for display if it contains whitespace.
fn quote(arg: &str) -> String {
    if arg.is_empty() || arg.chars().any(char::is_whitespace) {
        format!("\"{}\"", arg)
    } else {
        arg.to_string()
    }
}

/// Exit code to forward for a finished child.
#[cfg(unix)]
fn exit_code_of(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    status
        .code()
        .or_else(|| status.signal().map(|sig| 128 + sig))
        .unwrap_or(1)
}

#[cfg(not(unix))]
fn exit_code_of(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

/// Locate a tool, falling back to the bare name so that a spawn failure
/// names the missing program.
pub fn tool_path(name: &str) -> PathBuf {
    find_executable(name).unwrap_or_else(|| PathBuf::from(name))
}

/// Find CMake.
pub fn find_cmake() -> PathBuf {
    tool_path("cmake")
}

/// Find CTest.
pub fn find_ctest() -> PathBuf {
    tool_path("ctest")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_command() {
        let pb = ProcessBuilder::new("cmake").args(["--build", "build", "--", "-j4"]);

        assert_eq!(pb.display_command(), "cmake --build build -- -j4");
    }

    #[test]
    fn test_display_command_quotes_spaces() {
        let pb = ProcessBuilder::new("cmake").args(["-G", "Unix Makefiles"]);

        assert_eq!(pb.display_command(), "cmake -G \"Unix Makefiles\"");
    }

    #[test]
    fn test_program_name() {
        let pb = ProcessBuilder::new("/usr/local/bin/ninja");
        assert_eq!(pb.program_name(), "ninja");
    }

    #[cfg(unix)]
    #[test]
    fn test_exec_captures_output() {
        let output = ProcessBuilder::new("echo").arg("hello").exec().unwrap();

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("hello"));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_forwards_exit_code() {
        let err = ProcessBuilder::new("sh")
            .args(["-c", "exit 3"])
            .run()
            .unwrap_err();

        match err.downcast_ref::<CmxError>() {
            Some(CmxError::ProcessFailed { program, code }) => {
                assert_eq!(program, "sh");
                assert_eq!(*code, 3);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_tool_path_falls_back_to_name() {
        let path = tool_path("definitely-not-a-real-tool-xyz");
        assert_eq!(path, PathBuf::from("definitely-not-a-real-tool-xyz"));
    }
}
