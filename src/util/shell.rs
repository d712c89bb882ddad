//! Centralized shell output.
//!
//! All user-facing status lines go through [`Shell`]:
//! - Status messages with consistent formatting (`{status:>12} {message}`)
//! - A spinner for short probes of external tools
//! - Timed spans that report how long a step took
//!
//! Status output goes to stderr. Stdout is reserved for data the user asked
//! for (`show`, `status`, dry-run command lines).

use std::fmt::Display;
use std::io::{self, IsTerminal};
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// --quiet: errors only
    Quiet,
    #[default]
    Normal,
    /// --verbose: also echo every command before running it
    Verbose,
}

/// Color output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Detect TTY and use colors if available.
    #[default]
    Auto,
    Always,
    Never,
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            _ => Err(format!(
                "invalid color choice '{}'; expected 'auto', 'always', or 'never'",
                s
            )),
        }
    }
}

/// Status types for output messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    // Success statuses (green)
    Created,
    Finished,
    Removed,

    // In-progress statuses (cyan)
    Configuring,
    Building,
    Testing,
    Cleaning,
    Running,

    // Info statuses (blue)
    Info,

    // Warning statuses (yellow)
    Skipped,
    Warning,

    // Error status (red)
    Error,
}

impl Status {
    fn as_str(&self) -> &'static str {
        match self {
            Status::Created => "Created",
            Status::Finished => "Finished",
            Status::Removed => "Removed",
            Status::Configuring => "Configuring",
            Status::Building => "Building",
            Status::Testing => "Testing",
            Status::Cleaning => "Cleaning",
            Status::Running => "Running",
            Status::Info => "Info",
            Status::Skipped => "Skipped",
            Status::Warning => "Warning",
            Status::Error => "error",
        }
    }

    fn color_code(&self) -> &'static str {
        match self {
            Status::Created | Status::Finished | Status::Removed => "\x1b[1;32m",
            Status::Configuring
            | Status::Building
            | Status::Testing
            | Status::Cleaning
            | Status::Running => "\x1b[1;36m",
            Status::Info => "\x1b[1;34m",
            Status::Skipped | Status::Warning => "\x1b[1;33m",
            Status::Error => "\x1b[1;31m",
        }
    }
}

const STATUS_WIDTH: usize = 12;

/// Central shell for all CLI output.
#[derive(Debug)]
pub struct Shell {
    verbosity: Verbosity,
    use_color: bool,
    is_terminal: bool,
}

impl Shell {
    pub fn new(verbosity: Verbosity, color: ColorChoice) -> Self {
        let is_terminal = io::stderr().is_terminal();
        let use_color = match color {
            ColorChoice::Auto => is_terminal,
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        };

        Shell {
            verbosity,
            use_color,
            is_terminal,
        }
    }

    /// Create a shell from CLI flags. Quiet wins over verbose.
    pub fn from_flags(quiet: bool, verbose: bool, color: ColorChoice) -> Self {
        let verbosity = if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };
        Shell::new(verbosity, color)
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn is_quiet(&self) -> bool {
        self.verbosity == Verbosity::Quiet
    }

    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    /// Whether output may carry ANSI colors.
    pub fn use_color(&self) -> bool {
        self.use_color
    }

    /// Print a status message. In quiet mode only errors get through.
    pub fn status(&self, status: Status, msg: impl Display) {
        if self.is_quiet() && status != Status::Error {
            return;
        }

        eprintln!("{} {}", self.format_status(status), msg);
    }

    pub fn note(&self, msg: impl Display) {
        self.status(Status::Info, msg);
    }

    pub fn warn(&self, msg: impl Display) {
        self.status(Status::Warning, msg);
    }

    fn format_status(&self, status: Status) -> String {
        let text = status.as_str();

        if self.use_color {
            format!("{}{:>width$}\x1b[0m", status.color_code(), text, width = STATUS_WIDTH)
        } else {
            format!("{:>width$}", text, width = STATUS_WIDTH)
        }
    }

    /// Start a timed span. Dropping it without [`Span::finish`] prints nothing.
    pub fn span(&self, status: Status, msg: impl Display) -> Span<'_> {
        self.status(status, &msg);
        Span {
            shell: self,
            message: msg.to_string(),
            start: Instant::now(),
        }
    }

    /// A spinner shown while waiting on a captured subprocess.
    ///
    /// Only drawn on an interactive stderr in normal verbosity.
    pub fn spinner(&self, msg: impl Display) -> Spinner {
        let pb = if self.is_terminal && self.verbosity == Verbosity::Normal {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
                pb.set_style(style);
            }
            pb.set_message(msg.to_string());
            pb.enable_steady_tick(Duration::from_millis(80));
            Some(pb)
        } else {
            None
        };

        Spinner { pb }
    }
}

impl Default for Shell {
    fn default() -> Self {
        Shell::new(Verbosity::default(), ColorChoice::default())
    }
}

/// A step whose duration is reported when it finishes.
pub struct Span<'a> {
    shell: &'a Shell,
    message: String,
    start: Instant,
}

impl Span<'_> {
    pub fn finish(self) {
        let elapsed = format_duration(self.start.elapsed());
        self.shell
            .status(Status::Finished, format!("{} in {}", self.message, elapsed));
    }
}

/// Spinner handle; cleared on drop.
pub struct Spinner {
    pb: Option<ProgressBar>,
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if let Some(pb) = &self.pb {
            pb.finish_and_clear();
        }
    }
}

/// Format a duration in a human-readable way.
fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 60.0 {
        format!("{:.2}s", secs)
    } else {
        format!("{:.1}m", secs / 60.0)
    }
}
