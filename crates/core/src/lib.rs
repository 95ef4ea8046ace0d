// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Host-side building blocks for managing a forwarding-only Postfix server.
//!
//! This crate owns everything that is not SQL:
//!
//! - `settings`: immutable startup configuration (paths, defaults)
//! - `credentials`: the `key = value` credential files and login resolution
//! - `prompt`: password entry with terminal echo disabled
//! - `postconf`: reading and writing Postfix settings via `postconf`
//! - `lookup`: rendering the Postfix `mysql:` lookup-table document
//!
//! The SQL side lives in `postfix-forward-persistence`.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod credentials;
mod error;
mod lookup;
mod postconf;
mod prompt;
mod settings;

#[cfg(test)]
mod tests;

pub use credentials::{
    CredentialSet, Credentials, Login, LoginOverrides, MalformedLine, Role, write_private_file,
};
pub use error::{CoreError, PostconfError, PromptError};
pub use lookup::{LookupConfig, render_lookup_config};
pub use postconf::Postconf;
pub use prompt::{
    INTERRUPTED_EXIT_CODE, NoEchoGuard, Terminal, Tty, hidden_read_in_progress,
    install_interrupt_handler, read_password, read_password_with, recover_from_interrupt,
};
pub use settings::{DEFAULT_CONF_DIR, Settings};
