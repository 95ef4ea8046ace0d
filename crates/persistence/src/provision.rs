// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Database provisioning: schema plus the two service accounts.

use std::fmt;

use tracing::{info, warn};

use crate::connection::StatementBackend;
use crate::error::PersistenceError;
use crate::forwards::ForwardStore;

/// Privileges of the read-only account Postfix looks aliases up with.
pub const VIEWER_PERMISSIONS: [&str; 1] = ["SELECT"];

/// Privileges of the account the admin commands edit rules with.
pub const EDITOR_PERMISSIONS: [&str; 4] = ["SELECT", "INSERT", "UPDATE", "DELETE"];

/// A `MySQL` account to create or re-grant.
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    pub user: String,
    pub password: String,
}

impl Account {
    #[must_use]
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Everything `install` creates on the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionPlan {
    pub database: String,
    pub viewer: Account,
    pub editor: Account,
}

impl<B: StatementBackend> ForwardStore<B> {
    /// Creates the schema and grants both accounts access to the rule table.
    ///
    /// All statements share one scope, so privileges are reloaded once and
    /// the work is committed once.
    ///
    /// # Errors
    ///
    /// Returns the first failing statement's error; existing databases and
    /// tables are not errors.
    pub fn provision(&mut self, plan: &ProvisionPlan) -> Result<(), PersistenceError> {
        let target = format!("{}.{}", plan.database, self.table);
        self.conn.enter_scope();
        let result = self.provision_in_scope(plan, &target);
        let failed = result.is_err();
        let finished = self.conn.exit_scope(failed);
        if let Err(err) = result {
            if let Err(rollback_err) = finished {
                warn!(error = %rollback_err, "failed to roll back provisioning");
            }
            return Err(err);
        }
        finished?;
        info!(
            database = %plan.database,
            viewer = %plan.viewer.user,
            editor = %plan.editor.user,
            "provisioned forwarding database"
        );
        Ok(())
    }

    fn provision_in_scope(
        &mut self,
        plan: &ProvisionPlan,
        target: &str,
    ) -> Result<(), PersistenceError> {
        self.install_schema(&plan.database)?;
        self.conn.create_user(
            &plan.viewer.user,
            &plan.viewer.password,
            &VIEWER_PERMISSIONS,
            target,
        )?;
        self.conn.create_user(
            &plan.editor.user,
            &plan.editor.password,
            &EDITOR_PERMISSIONS,
            target,
        )
    }
}
