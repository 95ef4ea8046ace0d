// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The Postfix `mysql:` lookup-table document.
//!
//! ```text
//! hosts = 127.0.0.1
//! user = postfix
//! password = secret
//! dbname = postfix
//! query = SELECT destination FROM forwards WHERE source='%s'
//! ```

/// Connection details and table for a lookup document.
#[derive(Clone, PartialEq, Eq)]
pub struct LookupConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub dbname: String,
    pub table: String,
    /// Extra SQL appended to the `WHERE` clause with `AND`.
    pub condition: Option<String>,
}

impl std::fmt::Debug for LookupConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("dbname", &self.dbname)
            .field("table", &self.table)
            .field("condition", &self.condition)
            .finish()
    }
}

/// Renders the lookup document.
///
/// `key_field` is the column Postfix receives, `match_field` the column
/// compared against the looked-up address (`%s`). Field and table names are
/// written verbatim.
#[must_use]
pub fn render_lookup_config(params: &LookupConfig, key_field: &str, match_field: &str) -> String {
    let mut query = format!(
        "SELECT {key_field} FROM {table} WHERE {match_field}='%s'",
        table = params.table
    );
    if let Some(condition) = &params.condition {
        query.push_str(" AND ");
        query.push_str(condition);
    }

    format!(
        "hosts = {}\nuser = {}\npassword = {}\ndbname = {}\nquery = {query}\n",
        params.host, params.user, params.password, params.dbname
    )
}
