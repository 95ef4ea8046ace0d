// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the host-side components.

use thiserror::Error;

/// Errors raised while prompting for a secret.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PromptError {
    /// Standard input is not attached to an interactive terminal.
    #[error("No interactive terminal is available to read a password")]
    TerminalUnavailable,

    /// Reading, writing, or changing the terminal mode failed.
    #[error("Terminal I/O failed: {0}")]
    Io(String),
}

impl From<std::io::Error> for PromptError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Errors raised by the `postconf` wrapper.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PostconfError {
    /// `postconf -h` reported an error for the key.
    #[error("Postfix parameter not found: {key}")]
    KeyNotFound {
        /// The parameter that was queried.
        key: String,
    },

    /// The external command could not be run or exited unsuccessfully.
    #[error("Command `{command}` failed: {reason}")]
    CommandFailed {
        /// The command line that was run.
        command: String,
        /// What went wrong.
        reason: String,
    },
}

/// Aggregate error for the host-side components.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    Postconf(#[from] PostconfError),

    /// A configuration file could not be written.
    #[error("Failed to write {path}: {reason}")]
    FileWrite {
        /// The file that was being written.
        path: String,
        /// The underlying I/O error.
        reason: String,
    },
}
