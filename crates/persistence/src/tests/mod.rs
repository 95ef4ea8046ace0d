// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod query_tests;

use std::any::Any;

use diesel::QueryableByName;
use diesel::mysql::Mysql;

use crate::connection::{StatementBackend, TransactionalConnection};
use crate::error::PersistenceError;
use crate::forwards::{ForwardStore, ForwardingRule};
use crate::query::SqlValue;

/// Backend that records every statement instead of talking to a server.
///
/// Transaction control is recorded as `COMMIT`, `ROLLBACK` and
/// `FLUSH PRIVILEGES`. Any recorded statement containing a registered
/// pattern fails with the registered message.
#[derive(Default)]
pub struct RecordingBackend {
    pub statements: Vec<String>,
    pub params: Vec<Vec<SqlValue>>,
    pub rows: Vec<ForwardingRule>,
    pub affected: usize,
    failures: Vec<(String, String)>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self {
            affected: 1,
            ..Self::default()
        }
    }

    pub fn with_rows(rows: Vec<ForwardingRule>) -> Self {
        Self {
            rows,
            ..Self::new()
        }
    }

    pub fn fail_on(mut self, pattern: &str, message: &str) -> Self {
        self.failures
            .push((pattern.to_string(), message.to_string()));
        self
    }

    fn record(&mut self, sql: &str, params: &[SqlValue]) -> Result<(), PersistenceError> {
        self.statements.push(sql.to_string());
        self.params.push(params.to_vec());
        match self
            .failures
            .iter()
            .find(|(pattern, _)| sql.contains(pattern.as_str()))
        {
            Some((_, message)) => Err(PersistenceError::QueryFailed(message.clone())),
            None => Ok(()),
        }
    }
}

impl StatementBackend for RecordingBackend {
    fn execute_statement(
        &mut self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<usize, PersistenceError> {
        self.record(sql, params)?;
        Ok(self.affected)
    }

    fn load_rows<R>(&mut self, sql: &str, params: &[SqlValue]) -> Result<Vec<R>, PersistenceError>
    where
        R: QueryableByName<Mysql> + 'static,
    {
        self.record(sql, params)?;
        let rows: Box<dyn Any> = Box::new(self.rows.clone());
        Ok(rows.downcast::<Vec<R>>().map(|rows| *rows).unwrap_or_default())
    }

    fn commit(&mut self) -> Result<(), PersistenceError> {
        self.record("COMMIT", &[])
    }

    fn rollback(&mut self) -> Result<(), PersistenceError> {
        self.record("ROLLBACK", &[])
    }

    fn reload_privileges(&mut self) -> Result<(), PersistenceError> {
        self.record("FLUSH PRIVILEGES", &[])
    }
}

pub fn recording_connection() -> TransactionalConnection<RecordingBackend> {
    TransactionalConnection::new(RecordingBackend::new())
}

pub fn store_with(backend: RecordingBackend) -> ForwardStore<RecordingBackend> {
    ForwardStore::new(TransactionalConnection::new(backend), "forwards")
}

pub fn statements(conn: &TransactionalConnection<RecordingBackend>) -> Vec<&str> {
    conn.backend()
        .statements
        .iter()
        .map(String::as_str)
        .collect()
}

pub fn rule(source: &str, destination: &str, enabled: bool) -> ForwardingRule {
    ForwardingRule {
        source: source.to_string(),
        destination: destination.to_string(),
        enabled,
    }
}
