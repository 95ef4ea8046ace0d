// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The forwarding-rule table.
//!
//! One row per source address. `destination` holds the comma-separated list
//! Postfix expands the source into; `enabled` lets a rule be switched off
//! without losing it.

use diesel::QueryableByName;
use diesel::sql_types::{Bool, Text};
use tracing::{info, warn};

use crate::connection::{StatementBackend, TransactionalConnection};
use crate::error::PersistenceError;
use crate::query::{Column, SqlValue};

/// Columns selected for a [`ForwardingRule`], in table order.
pub const RULE_FIELDS: [&str; 3] = ["source", "destination", "enabled"];

/// Primary key of the forwarding table.
pub const PRIMARY_KEY: [&str; 1] = ["source"];

/// Column definitions of the forwarding table.
#[must_use]
pub fn rule_columns() -> Vec<Column> {
    vec![
        Column::varchar("source").not_null(),
        Column::varchar("destination").not_null(),
        Column::boolean("enabled").not_null().default_value(true),
    ]
}

/// A row of the forwarding table.
#[derive(Debug, Clone, PartialEq, Eq, QueryableByName)]
pub struct ForwardingRule {
    #[diesel(sql_type = Text)]
    pub source: String,
    #[diesel(sql_type = Text)]
    pub destination: String,
    #[diesel(sql_type = Bool)]
    pub enabled: bool,
}

impl ForwardingRule {
    /// The individual destination addresses.
    #[must_use]
    pub fn destinations(&self) -> Vec<&str> {
        self.destination
            .split(',')
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .collect()
    }
}

/// Treats `AlreadyExists` as success, logging it.
///
/// # Errors
///
/// Returns every other error unchanged.
pub fn ignore_existing(result: Result<(), PersistenceError>) -> Result<(), PersistenceError> {
    match result {
        Err(PersistenceError::AlreadyExists { kind, name }) => {
            warn!(%kind, %name, "already exists; leaving it in place");
            Ok(())
        }
        other => other,
    }
}

/// Forwarding-rule operations over one connection.
pub struct ForwardStore<B> {
    pub(crate) conn: TransactionalConnection<B>,
    pub(crate) table: String,
}

impl<B: StatementBackend> ForwardStore<B> {
    #[must_use]
    pub fn new(conn: TransactionalConnection<B>, table: impl Into<String>) -> Self {
        Self {
            conn,
            table: table.into(),
        }
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    #[must_use]
    pub const fn connection(&self) -> &TransactionalConnection<B> {
        &self.conn
    }

    pub const fn connection_mut(&mut self) -> &mut TransactionalConnection<B> {
        &mut self.conn
    }

    /// Creates `database` and `database.table`, keeping either if it exists.
    ///
    /// # Errors
    ///
    /// Returns any failure other than an existing object.
    pub fn install_schema(&mut self, database: &str) -> Result<(), PersistenceError> {
        let qualified = format!("{database}.{}", self.table);
        self.conn.scope(|conn| {
            ignore_existing(conn.create_database(database))?;
            ignore_existing(conn.create_table(&qualified, &rule_columns(), &PRIMARY_KEY))
        })
    }

    /// Inserts a rule or replaces the destinations and flag of an existing one.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    pub fn add_rule<S: AsRef<str>>(
        &mut self,
        source: &str,
        destinations: &[S],
        enabled: bool,
    ) -> Result<(), PersistenceError> {
        let destination = destinations
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(",");
        self.conn.upsert(
            &self.table,
            &[
                ("source", SqlValue::from(source)),
                ("destination", SqlValue::from(destination.as_str())),
                ("enabled", SqlValue::from(enabled)),
            ],
        )?;
        info!(source, destination = %destination, enabled, "stored forwarding rule");
        Ok(())
    }

    /// All rules.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    pub fn list_rules(&mut self) -> Result<Vec<ForwardingRule>, PersistenceError> {
        self.conn.select(&self.table, &RULE_FIELDS, &[])
    }

    /// The rule for `source`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    pub fn get_rule(&mut self, source: &str) -> Result<Option<ForwardingRule>, PersistenceError> {
        let rows: Vec<ForwardingRule> =
            self.conn
                .select(&self.table, &RULE_FIELDS, &[("source", source.into())])?;
        Ok(rows.into_iter().next())
    }

    /// Deletes the rule for `source`, returning the number of deleted rows.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::RuleNotFound` if no row was deleted.
    pub fn remove_rule(&mut self, source: &str) -> Result<usize, PersistenceError> {
        let deleted = self.conn.delete(&self.table, &[("source", source.into())])?;
        if deleted == 0 {
            return Err(PersistenceError::RuleNotFound(source.to_string()));
        }
        info!(source, "removed forwarding rule");
        Ok(deleted)
    }

    /// Switches an existing rule on or off.
    ///
    /// The existence check and the update share one scope, so they commit
    /// together.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::RuleNotFound` if there is no rule for
    /// `source`.
    pub fn set_enabled(&mut self, source: &str, enabled: bool) -> Result<(), PersistenceError> {
        let table = &self.table;
        self.conn.scope(|conn| {
            let existing: Vec<ForwardingRule> =
                conn.select(table, &RULE_FIELDS, &[("source", source.into())])?;
            let rule = existing
                .into_iter()
                .next()
                .ok_or_else(|| PersistenceError::RuleNotFound(source.to_string()))?;
            conn.upsert(
                table,
                &[
                    ("source", rule.source.into()),
                    ("destination", rule.destination.into()),
                    ("enabled", enabled.into()),
                ],
            )?;
            Ok(())
        })?;
        info!(source, enabled, "updated forwarding rule");
        Ok(())
    }
}
