// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for postfix-forward.
//!
//! This crate owns everything that talks to `MySQL`/`MariaDB`: SQL text
//! builders, a transactional connection with reentrant scopes, the
//! forwarding-rule table, and provisioning of the database and its two
//! service accounts. It is built on Diesel's synchronous `MysqlConnection`.
//!
//! ## Layers
//!
//! - [`query`] renders SQL text plus positional parameters
//! - [`TransactionalConnection`] runs statements in nested scopes and commits
//!   once, at the outermost scope, reloading privileges first when a grant
//!   was issued
//! - [`ForwardStore`] implements the forwarding-rule operations
//! - [`MysqlBackend`] is the only code that touches the driver
//!
//! ## Testing Philosophy
//!
//! - Standard tests (`cargo test`) run against a recording backend that
//!   captures every statement
//! - Backend validation tests are explicitly marked `#[ignore]`
//! - External database tests never run automatically
//! - All infrastructure is orchestrated by `xtask`, not embedded in tests
//!
//! To run `MySQL` validation tests:
//! ```bash
//! cargo xtask test-mariadb
//! ```

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

pub mod backend;
mod connection;
mod error;
mod forwards;
mod provision;
pub mod query;

#[cfg(test)]
mod tests;

pub use backend::mysql::{MysqlBackend, classify_connection_error, connection_url};
pub use connection::{StatementBackend, TransactionalConnection};
pub use error::{ObjectKind, PersistenceError};
pub use forwards::{
    ForwardStore, ForwardingRule, PRIMARY_KEY, RULE_FIELDS, ignore_existing, rule_columns,
};
pub use provision::{Account, EDITOR_PERMISSIONS, ProvisionPlan, VIEWER_PERMISSIONS};
pub use query::{Column, ColumnType, SqlValue, Statement};

/// A forwarding store on a live `MySQL` session.
pub type MysqlForwardStore = ForwardStore<MysqlBackend>;

impl MysqlForwardStore {
    /// Connects with `login` and opens the store on `table`.
    ///
    /// # Errors
    ///
    /// Returns the connection error, classified as in [`MysqlBackend::connect`].
    pub fn connect(
        login: &postfix_forward::Login,
        table: impl Into<String>,
    ) -> Result<Self, PersistenceError> {
        let backend = MysqlBackend::connect(login)?;
        Ok(Self::new(TransactionalConnection::new(backend), table))
    }
}
