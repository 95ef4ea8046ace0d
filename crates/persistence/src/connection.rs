// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Transactional connection with reentrant scopes.
//!
//! Every statement runs inside a scope. Scopes nest: entering one increments
//! a depth counter and only the exit that brings the depth back to zero
//! commits (or rolls back, when the scope failed). A grant sets a
//! dirty-privileges flag so the outermost commit is preceded by a privilege
//! reload. The flag is cleared on every commit or rollback.
//!
//! ```ignore
//! conn.scope(|conn| {
//!     conn.create_user("postfix", "pw", &["SELECT"], "postfix.forwards")?;
//!     conn.upsert("forwards", &[("source", "a@example.org".into())])?;
//!     Ok(())
//! })?; // FLUSH PRIVILEGES, then COMMIT, exactly once
//! ```

use diesel::QueryableByName;
use diesel::mysql::Mysql;
use tracing::{debug, info, trace, warn};

use crate::error::{ObjectKind, PersistenceError};
use crate::query::{self, Column, SqlValue, Statement};

/// The operations a physical connection must provide.
///
/// Implemented by [`crate::MysqlBackend`] for real servers.
pub trait StatementBackend {
    /// Executes a statement and returns the number of affected rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    fn execute_statement(
        &mut self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<usize, PersistenceError>;

    /// Executes a row-returning statement.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails or rows cannot be decoded.
    fn load_rows<R>(&mut self, sql: &str, params: &[SqlValue]) -> Result<Vec<R>, PersistenceError>
    where
        R: QueryableByName<Mysql> + 'static;

    /// # Errors
    ///
    /// Returns an error if the commit fails.
    fn commit(&mut self) -> Result<(), PersistenceError>;

    /// # Errors
    ///
    /// Returns an error if the rollback fails.
    fn rollback(&mut self) -> Result<(), PersistenceError>;

    /// Makes the server re-read its grant tables.
    ///
    /// # Errors
    ///
    /// Returns an error if the reload fails.
    fn reload_privileges(&mut self) -> Result<(), PersistenceError>;
}

/// A connection whose statements run in reentrant transactional scopes.
pub struct TransactionalConnection<B> {
    backend: B,
    depth: usize,
    privileges_dirty: bool,
}

impl<B: StatementBackend> TransactionalConnection<B> {
    #[must_use]
    pub const fn new(backend: B) -> Self {
        Self {
            backend,
            depth: 0,
            privileges_dirty: false,
        }
    }

    /// Number of scopes currently open.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Whether a grant is waiting for the next commit.
    #[must_use]
    pub const fn privileges_dirty(&self) -> bool {
        self.privileges_dirty
    }

    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Opens a scope.
    pub fn enter_scope(&mut self) {
        self.depth += 1;
        trace!(depth = self.depth, "entered scope");
    }

    /// Closes a scope, finishing the transaction if it was the outermost.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::ScopeNotOpen` if no scope is open, or the
    /// error from the commit, rollback, or privilege reload.
    pub fn exit_scope(&mut self, failed: bool) -> Result<(), PersistenceError> {
        if self.depth == 0 {
            return Err(PersistenceError::ScopeNotOpen);
        }
        self.depth -= 1;
        trace!(depth = self.depth, failed, "exited scope");
        if self.depth > 0 {
            return Ok(());
        }

        let reload = std::mem::take(&mut self.privileges_dirty);
        if failed {
            debug!("rolling back transaction");
            return self.backend.rollback();
        }

        if reload {
            debug!("reloading privileges before commit");
            if let Err(err) = self.backend.reload_privileges() {
                if let Err(rollback_err) = self.backend.rollback() {
                    warn!(error = %rollback_err, "rollback after failed privilege reload failed");
                }
                return Err(err);
            }
        }
        debug!("committing transaction");
        self.backend.commit()
    }

    /// Runs `body` inside one scope.
    ///
    /// The scope exits as failed when `body` returns an error. Scopes opened
    /// inside `body` only adjust the depth.
    ///
    /// # Errors
    ///
    /// Returns the error from `body`, or from committing when `body`
    /// succeeded. A rollback failure after a failed `body` is logged and the
    /// original error returned.
    pub fn scope<T, F>(&mut self, body: F) -> Result<T, PersistenceError>
    where
        F: FnOnce(&mut Self) -> Result<T, PersistenceError>,
    {
        self.enter_scope();
        match body(self) {
            Ok(value) => {
                self.exit_scope(false)?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = self.exit_scope(true) {
                    warn!(error = %rollback_err, "failed to roll back after error");
                }
                Err(err)
            }
        }
    }

    /// Executes a statement in its own scope.
    ///
    /// # Errors
    ///
    /// Returns the statement's error, or the error from finishing the scope.
    pub fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<usize, PersistenceError> {
        debug!(sql, params = params.len(), "executing statement");
        self.scope(|conn| conn.backend.execute_statement(sql, params))
    }

    /// Executes a row-returning statement in its own scope.
    ///
    /// # Errors
    ///
    /// Returns the statement's error, or the error from finishing the scope.
    pub fn load<R>(&mut self, sql: &str, params: &[SqlValue]) -> Result<Vec<R>, PersistenceError>
    where
        R: QueryableByName<Mysql> + 'static,
    {
        debug!(sql, params = params.len(), "loading rows");
        self.scope(|conn| conn.backend.load_rows(sql, params))
    }

    /// # Errors
    ///
    /// See [`Self::execute`].
    pub fn run(&mut self, statement: &Statement) -> Result<usize, PersistenceError> {
        self.execute(&statement.sql, &statement.params)
    }

    /// # Errors
    ///
    /// Returns `PersistenceError::AlreadyExists` if the database exists.
    pub fn create_database(&mut self, name: &str) -> Result<(), PersistenceError> {
        self.execute(&query::create_database(name), &[])
            .map(drop)
            .map_err(|e| e.into_already_exists(ObjectKind::Database, name))
    }

    /// # Errors
    ///
    /// Returns `PersistenceError::AlreadyExists` if the table exists.
    pub fn create_table(
        &mut self,
        name: &str,
        columns: &[Column],
        primary_keys: &[&str],
    ) -> Result<(), PersistenceError> {
        let definitions: Vec<String> = columns.iter().map(Column::definition).collect();
        self.execute(&query::create_table(name, &definitions, primary_keys), &[])
            .map(drop)
            .map_err(|e| e.into_already_exists(ObjectKind::Table, name))
    }

    /// Grants `permissions` on `target` to `user`, creating the account.
    ///
    /// Marks privileges dirty first, so the commit that ends the outermost
    /// scope reloads them. The statement is not logged; it carries the
    /// password.
    ///
    /// # Errors
    ///
    /// Returns an error if the grant fails.
    pub fn create_user(
        &mut self,
        user: &str,
        password: &str,
        permissions: &[&str],
        target: &str,
    ) -> Result<(), PersistenceError> {
        self.privileges_dirty = true;
        info!(user, target, permissions = ?permissions, "granting privileges");
        let sql = query::create_user(user, password, permissions, target);
        self.scope(|conn| conn.backend.execute_statement(&sql, &[]))
            .map(drop)
    }

    /// # Errors
    ///
    /// Returns an error if the statement fails.
    pub fn upsert(
        &mut self,
        table: &str,
        fields: &[(&str, SqlValue)],
    ) -> Result<usize, PersistenceError> {
        self.run(&query::upsert(table, fields))
    }

    /// # Errors
    ///
    /// Returns an error if the statement fails or rows cannot be decoded.
    pub fn select<R>(
        &mut self,
        table: &str,
        fields: &[&str],
        filter: &[(&str, SqlValue)],
    ) -> Result<Vec<R>, PersistenceError>
    where
        R: QueryableByName<Mysql> + 'static,
    {
        let statement = query::select(table, fields, filter);
        self.load(&statement.sql, &statement.params)
    }

    /// Returns the number of deleted rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    pub fn delete(
        &mut self,
        table: &str,
        filter: &[(&str, SqlValue)],
    ) -> Result<usize, PersistenceError> {
        self.run(&query::delete(table, filter))
    }
}
