// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Password entry with terminal echo disabled.
//!
//! A hidden read is held by a [`NoEchoGuard`]. If the read does not finish
//! normally (an I/O error, a panic) dropping the guard turns echo back on.
//! While any guard is alive, Ctrl-C does the same before the process exits
//! with [`INTERRUPTED_EXIT_CODE`].

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Once;
use std::sync::atomic::{AtomicUsize, Ordering};

use console::Term;
use duct::cmd;
use tracing::{debug, warn};

use crate::error::PromptError;

/// Exit status after Ctrl-C, following the shell's `128 + SIGINT`.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

static HIDDEN_READS: AtomicUsize = AtomicUsize::new(0);
static INTERRUPT_HANDLER: Once = Once::new();

/// The terminal operations a password prompt needs.
pub trait Terminal {
    /// Whether standard input is an interactive terminal.
    fn is_interactive(&self) -> bool;

    /// Writes text for the user without a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    fn write_prompt(&mut self, text: &str) -> Result<(), PromptError>;

    /// Reads one line with local echo off.
    ///
    /// On success echo is back to its previous state and the line the user
    /// ended with Enter has been terminated on screen.
    ///
    /// # Errors
    ///
    /// Returns an error if input ends or cannot be read.
    fn read_hidden_line(&mut self) -> Result<String, PromptError>;

    /// Turns local echo back on after a read that did not finish.
    ///
    /// # Errors
    ///
    /// Returns an error if the mode cannot be changed.
    fn restore_echo(&mut self) -> Result<(), PromptError>;
}

/// Holds a terminal for the length of one hidden read.
pub struct NoEchoGuard<'a, T: Terminal> {
    terminal: &'a mut T,
    finished: bool,
}

impl<'a, T: Terminal> NoEchoGuard<'a, T> {
    #[must_use]
    pub fn acquire(terminal: &'a mut T) -> Self {
        HIDDEN_READS.fetch_add(1, Ordering::SeqCst);
        Self {
            terminal,
            finished: false,
        }
    }

    /// Reads the hidden line.
    ///
    /// # Errors
    ///
    /// Returns the terminal's read error; echo is restored when the guard
    /// drops.
    pub fn read_line(&mut self) -> Result<String, PromptError> {
        let line = self.terminal.read_hidden_line()?;
        self.finished = true;
        Ok(line)
    }
}

/// Whether any hidden read is in progress in this process.
#[must_use]
pub fn hidden_read_in_progress() -> bool {
    HIDDEN_READS.load(Ordering::SeqCst) > 0
}

impl<T: Terminal> Drop for NoEchoGuard<'_, T> {
    fn drop(&mut self) {
        HIDDEN_READS.fetch_sub(1, Ordering::SeqCst);
        if !self.finished
            && let Err(e) = self.terminal.restore_echo()
        {
            warn!(error = %e, "failed to restore terminal echo");
        }
    }
}

/// Puts the terminal back after Ctrl-C and returns the exit code to use.
///
/// The terminal is only touched when a hidden read was in progress.
pub fn recover_from_interrupt<T: Terminal>(terminal: &mut T, reading: bool) -> i32 {
    if reading {
        if let Err(e) = terminal.restore_echo() {
            warn!(error = %e, "failed to restore terminal echo");
        }
        // Ctrl-C left the cursor on the prompt line.
        if let Err(e) = terminal.write_prompt("\n") {
            debug!(error = %e, "failed to end prompt line");
        }
    }
    INTERRUPTED_EXIT_CODE
}

/// Installs the process-wide Ctrl-C handler once.
///
/// The handler restores echo on the controlling terminal if a hidden read
/// is in progress, then exits with [`INTERRUPTED_EXIT_CODE`].
pub fn install_interrupt_handler() {
    INTERRUPT_HANDLER.call_once(|| {
        let installed = ctrlc::set_handler(|| {
            let code = recover_from_interrupt(&mut Tty::default(), hidden_read_in_progress());
            std::process::exit(code);
        });
        if let Err(e) = installed {
            warn!(error = %e, "failed to install interrupt handler");
        }
    });
}

/// Prompts for a password on the given terminal.
///
/// # Errors
///
/// Returns `PromptError::TerminalUnavailable` without touching the terminal
/// when standard input is not interactive, or any error raised while
/// writing the prompt or reading the line.
pub fn read_password_with<T: Terminal>(
    terminal: &mut T,
    prompt: &str,
) -> Result<String, PromptError> {
    if !terminal.is_interactive() {
        return Err(PromptError::TerminalUnavailable);
    }

    terminal.write_prompt(prompt)?;
    let mut guard = NoEchoGuard::acquire(terminal);
    let line = guard.read_line()?;
    drop(guard);

    Ok(line.trim_end_matches(['\n', '\r']).to_string())
}

/// Prompts for a password on the controlling terminal.
///
/// # Errors
///
/// See [`read_password_with`].
pub fn read_password(prompt: &str) -> Result<String, PromptError> {
    install_interrupt_handler();
    read_password_with(&mut Tty::default(), prompt)
}

/// The process's controlling terminal.
///
/// Prompts go to standard error. The hidden read is done by
/// [`Term::read_secure_line`], which clears and restores `ECHO` itself;
/// `stty` is only run to recover a read that was cut short.
#[derive(Debug, Clone)]
pub struct Tty {
    term: Term,
    device: PathBuf,
}

impl Default for Tty {
    fn default() -> Self {
        Self {
            term: Term::stderr(),
            device: PathBuf::from("/dev/tty"),
        }
    }
}

impl Terminal for Tty {
    fn is_interactive(&self) -> bool {
        // `read_secure_line` also needs its output to be a terminal.
        std::io::stdin().is_terminal() && self.term.is_term()
    }

    fn write_prompt(&mut self, text: &str) -> Result<(), PromptError> {
        self.term.write_str(text)?;
        self.term.flush()?;
        Ok(())
    }

    fn read_hidden_line(&mut self) -> Result<String, PromptError> {
        Ok(self.term.read_secure_line()?)
    }

    fn restore_echo(&mut self) -> Result<(), PromptError> {
        cmd!("stty", "echo").stdin_path(&self.device).run()?;
        Ok(())
    }
}
