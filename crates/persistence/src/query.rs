// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! SQL text builders.
//!
//! Table, column and account names are interpolated verbatim. Only values
//! travel as bound parameters (`?`). Never pass untrusted input as an
//! identifier, permission list, account name, or `GRANT` password.
//!
//! Field/value inputs are ordered slices, so the column list and the
//! parameter list are always produced from the same sequence.

use std::fmt::Write as _;

/// A value bound to a `?` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Text(String),
    Bool(bool),
    Int(i64),
    Null,
}

impl SqlValue {
    /// Renders the value as a SQL literal, for use in column defaults.
    #[must_use]
    pub fn literal(&self) -> String {
        match self {
            Self::Text(text) => format!("'{}'", text.replace('\'', "''")),
            Self::Bool(true) => String::from("1"),
            Self::Bool(false) => String::from("0"),
            Self::Int(value) => value.to_string(),
            Self::Null => String::from("NULL"),
        }
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// SQL text plus its positional parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

/// `CREATE DATABASE <name>;`
#[must_use]
pub fn create_database(name: &str) -> String {
    format!("CREATE DATABASE {name};")
}

/// `CREATE TABLE <name> (<defs>[, PRIMARY KEY (<keys>)]);`
///
/// An empty `primary_keys` omits the key clause.
#[must_use]
pub fn create_table<S: AsRef<str>>(
    name: &str,
    field_defs: &[S],
    primary_keys: &[&str],
) -> String {
    let mut sql = format!(
        "CREATE TABLE {name} ({}",
        field_defs
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(", ")
    );
    if !primary_keys.is_empty() {
        let _ = write!(sql, ", PRIMARY KEY ({})", primary_keys.join(","));
    }
    sql.push_str(");");
    sql
}

/// `GRANT <perms> ON <target> TO <user> IDENTIFIED BY '<password>';`
///
/// A `user` without an `@host` part is granted at `localhost`. Nothing is
/// escaped.
#[must_use]
pub fn create_user(user: &str, password: &str, permissions: &[&str], target: &str) -> String {
    let account = if user.contains('@') {
        user.to_string()
    } else {
        format!("{user}@localhost")
    };
    format!(
        "GRANT {} ON {target} TO {account} IDENTIFIED BY '{password}';",
        permissions.join(", ")
    )
}

/// `INSERT ... ON DUPLICATE KEY UPDATE ...` over the given fields.
///
/// Parameters are the field values twice over: once for `VALUES`, once for
/// the update assignments, both in field order.
#[must_use]
pub fn upsert(table: &str, fields: &[(&str, SqlValue)]) -> Statement {
    let names: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();
    let values: Vec<SqlValue> = fields.iter().map(|(_, value)| value.clone()).collect();

    let sql = format!(
        "INSERT INTO {table}({}) VALUES({}) ON DUPLICATE KEY UPDATE {};",
        names.join(","),
        vec!["?"; names.len()].join(","),
        names
            .iter()
            .map(|name| format!("{name}=?"))
            .collect::<Vec<_>>()
            .join(", ")
    );

    Statement {
        sql,
        params: [values.clone(), values].concat(),
    }
}

/// `SELECT <fields> FROM <table>[ WHERE <k>=? AND ...];`
#[must_use]
pub fn select(table: &str, fields: &[&str], filter: &[(&str, SqlValue)]) -> Statement {
    let (clause, params) = where_clause(filter);
    Statement {
        sql: format!("SELECT {} FROM {table}{clause};", fields.join(",")),
        params,
    }
}

/// `DELETE FROM <table>[ WHERE <k>=? AND ...];`
#[must_use]
pub fn delete(table: &str, filter: &[(&str, SqlValue)]) -> Statement {
    let (clause, params) = where_clause(filter);
    Statement {
        sql: format!("DELETE FROM {table}{clause};"),
        params,
    }
}

fn where_clause(filter: &[(&str, SqlValue)]) -> (String, Vec<SqlValue>) {
    if filter.is_empty() {
        return (String::new(), Vec::new());
    }
    let conditions: Vec<String> = filter.iter().map(|(key, _)| format!("{key}=?")).collect();
    (
        format!(" WHERE {}", conditions.join(" AND ")),
        filter.iter().map(|(_, value)| value.clone()).collect(),
    )
}

/// Column types understood by [`Column`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Varchar(u32),
    Boolean,
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Varchar(length) => write!(f, "VARCHAR({length})"),
            Self::Boolean => write!(f, "BOOLEAN"),
        }
    }
}

/// A column definition for [`create_table`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    name: String,
    column_type: ColumnType,
    not_null: bool,
    default: Option<SqlValue>,
}

impl Column {
    /// Default `VARCHAR` length.
    pub const DEFAULT_LENGTH: u32 = 512;

    /// A nullable `VARCHAR(512)` column.
    #[must_use]
    pub fn varchar(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Varchar(Self::DEFAULT_LENGTH))
    }

    /// A nullable `BOOLEAN` column.
    #[must_use]
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Boolean)
    }

    #[must_use]
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            not_null: false,
            default: None,
        }
    }

    /// Changes a `VARCHAR` length; no effect on other types.
    #[must_use]
    pub const fn length(mut self, length: u32) -> Self {
        if let ColumnType::Varchar(_) = self.column_type {
            self.column_type = ColumnType::Varchar(length);
        }
        self
    }

    #[must_use]
    pub const fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: impl Into<SqlValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `<name> <TYPE>[ NOT NULL][ DEFAULT <literal>]`
    #[must_use]
    pub fn definition(&self) -> String {
        let mut definition = format!("{} {}", self.name, self.column_type);
        if self.not_null {
            definition.push_str(" NOT NULL");
        }
        if let Some(default) = &self.default {
            definition.push_str(" DEFAULT ");
            definition.push_str(&default.literal());
        }
        definition
    }
}
