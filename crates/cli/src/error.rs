// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use postfix_forward::{CoreError, PostconfError, PromptError};
use postfix_forward_persistence::PersistenceError;
use thiserror::Error;

/// Process exit codes.
pub mod exit_code {
    pub const FAILURE: i32 = 1;
    /// Reserved for clap's own usage errors.
    pub const USAGE: i32 = 2;
    pub const AUTHENTICATION: i32 = 3;
    pub const ALREADY_EXISTS: i32 = 4;
    pub const NOT_FOUND: i32 = 5;
    pub const NO_TERMINAL: i32 = 6;
}

/// Everything a subcommand can fail with.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// A lookup matched nothing.
    #[error("No forwarding rule for {0}")]
    NoRule(String),
}

impl From<PromptError> for CliError {
    fn from(err: PromptError) -> Self {
        Self::Core(err.into())
    }
}

impl From<PostconfError> for CliError {
    fn from(err: PostconfError) -> Self {
        Self::Core(err.into())
    }
}

impl CliError {
    /// The process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Persistence(PersistenceError::AuthenticationFailed { .. }) => {
                exit_code::AUTHENTICATION
            }
            Self::Persistence(PersistenceError::AlreadyExists { .. }) => exit_code::ALREADY_EXISTS,
            Self::Persistence(PersistenceError::RuleNotFound(_))
            | Self::Core(CoreError::Postconf(PostconfError::KeyNotFound { .. }))
            | Self::NoRule(_) => exit_code::NOT_FOUND,
            Self::Core(CoreError::Prompt(PromptError::TerminalUnavailable)) => {
                exit_code::NO_TERMINAL
            }
            _ => exit_code::FAILURE,
        }
    }
}
