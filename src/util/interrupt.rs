//! Ctrl-C handling.
//!
//! Child processes share our terminal, so they receive SIGINT directly and
//! stop on their own. The handler only records that the user interrupted;
//! the process runner checks the flag before spawning and after each child
//! exits, and turns it into [`CmxError::Interrupted`].

use std::sync::atomic::{AtomicBool, Ordering};

use crate::util::errors::CmxError;

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Install the Ctrl-C handler. Call once at startup.
pub fn install() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(|| {
        if !INTERRUPTED.swap(true, Ordering::SeqCst) {
            eprintln!("\nInterrupted, waiting for the running tool to stop...");
        }
    })
}

/// Whether Ctrl-C was pressed during this run.
pub fn is_interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

/// Fail with [`CmxError::Interrupted`] once Ctrl-C was pressed.
pub fn check() -> Result<(), CmxError> {
    if is_interrupted() {
        Err(CmxError::Interrupted)
    } else {
        Ok(())
    }
}
