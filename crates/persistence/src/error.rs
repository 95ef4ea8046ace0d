// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use thiserror::Error;

/// Kinds of schema object that `CREATE` statements target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Database,
    Table,
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Database => write!(f, "Database"),
            Self::Table => write!(f, "Table"),
        }
    }
}

/// Errors that can occur during persistence operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// The server rejected the supplied credentials.
    #[error("Authentication failed for {user}: {reason}")]
    AuthenticationFailed { user: String, reason: String },

    /// A `CREATE` statement targeted an object that already exists.
    #[error("{kind} '{name}' already exists")]
    AlreadyExists { kind: ObjectKind, name: String },

    /// Database connection failed.
    #[error("Database connection failed: {0}")]
    ConnectionFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// `exit_scope` was called with no scope open.
    #[error("No transaction scope is open")]
    ScopeNotOpen,

    /// No forwarding rule exists for the source address.
    #[error("Forwarding rule not found: {0}")]
    RuleNotFound(String),
}

impl PersistenceError {
    /// Reclassifies a server "already exists" failure for `name`.
    ///
    /// `MySQL` reports these as error 1007 (`...; database exists`) and 1050
    /// (`Table '...' already exists`); only the message text reaches us.
    #[must_use]
    pub fn into_already_exists(self, kind: ObjectKind, name: &str) -> Self {
        match self {
            Self::QueryFailed(message) if reports_existing_object(&message) => Self::AlreadyExists {
                kind,
                name: name.to_string(),
            },
            other => other,
        }
    }
}

fn reports_existing_object(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    message.contains("already exists") || message.contains("database exists")
}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        Self::QueryFailed(err.to_string())
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::ConnectionFailed(err.to_string())
    }
}
