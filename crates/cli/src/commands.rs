// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Subcommand implementations.
//!
//! Read-only commands connect as the viewer, commands that change rules as
//! the editor, and `install` as an administrative account.

use std::fmt::Write as _;

use postfix_forward::{
    CredentialSet, Credentials, Login, LoginOverrides, LookupConfig, Postconf, Role, Settings,
    read_password, render_lookup_config, write_private_file,
};
use postfix_forward_persistence::{Account, ForwardingRule, MysqlForwardStore, ProvisionPlan};
use tracing::info;

use crate::args::Command;
use crate::error::CliError;

/// Administrative account `install` connects as unless `--user` is given.
pub const ADMIN_USER: &str = "root";

/// Lookup condition written at install so Postfix ignores disabled rules.
pub const ENABLED_CONDITION: &str = "enabled = 1";

/// Postfix parameter pointed at the lookup configuration.
pub const ALIAS_MAPS_KEY: &str = "virtual_alias_maps";

/// Startup state shared by all subcommands.
pub struct Context {
    pub settings: Settings,
    pub credentials: Credentials,
    pub overrides: LoginOverrides,
}

impl Context {
    /// Loads the credential files named by `settings`.
    #[must_use]
    pub fn load(settings: Settings, overrides: LoginOverrides) -> Self {
        let credentials = Credentials::load(&settings);
        Self {
            settings,
            credentials,
            overrides,
        }
    }

    fn login(&self, role: Role) -> Result<Login, CliError> {
        Ok(self
            .credentials
            .login(role, &self.settings, &self.overrides, read_password)?)
    }

    fn store(&self, role: Role) -> Result<MysqlForwardStore, CliError> {
        let login = self.login(role)?;
        Ok(MysqlForwardStore::connect(&login, self.settings.table.as_str())?)
    }

    fn postconf(&self) -> Postconf {
        Postconf::new(&self.settings.postconf)
    }

    /// The administrative login: `--user`/`--password`, else `root` and a
    /// prompt. No database is selected; it may not exist yet.
    fn admin_login(&self) -> Result<Login, CliError> {
        let user = self
            .overrides
            .user
            .clone()
            .unwrap_or_else(|| ADMIN_USER.to_string());
        let password = match &self.overrides.password {
            Some(password) => password.clone(),
            None => read_password(&format!("Enter mysql password for {user}:"))?,
        };
        Ok(Login {
            host: self.settings.db_host.clone(),
            user,
            password,
            database: None,
        })
    }
}

/// Runs one subcommand, returning what it prints on stdout.
///
/// # Errors
///
/// Returns the first failure of the subcommand.
pub fn run(command: &Command, ctx: &Context) -> Result<String, CliError> {
    match command {
        Command::Install => install(ctx).map(|()| String::new()),
        Command::Add {
            source,
            destinations,
            disabled,
        } => {
            ctx.store(Role::Editor)?
                .add_rule(source, destinations, !disabled)?;
            Ok(String::new())
        }
        Command::List { source: Some(source) } => {
            let rule = ctx
                .store(Role::Viewer)?
                .get_rule(source)?
                .ok_or_else(|| CliError::NoRule(source.clone()))?;
            Ok(format_rules(&[rule]))
        }
        Command::List { source: None } => {
            let rules = ctx.store(Role::Viewer)?.list_rules()?;
            Ok(format_rules(&rules))
        }
        Command::Remove { source } => {
            ctx.store(Role::Editor)?.remove_rule(source)?;
            Ok(String::new())
        }
        Command::Enable { source } => {
            ctx.store(Role::Editor)?.set_enabled(source, true)?;
            Ok(String::new())
        }
        Command::Disable { source } => {
            ctx.store(Role::Editor)?.set_enabled(source, false)?;
            Ok(String::new())
        }
        Command::GetConfig { key } => Ok(format!("{}\n", ctx.postconf().get(key)?)),
        Command::SetConfig { key, value } => {
            ctx.postconf().set(key, value)?;
            Ok(String::new())
        }
        Command::LookupConfig => {
            let login = ctx.login(Role::Viewer)?;
            Ok(render_lookup_config(
                &lookup_config(&ctx.settings, &login),
                "destination",
                "source",
            ))
        }
    }
}

/// One line per rule: `source -> dest1, dest2`, flagged when disabled.
#[must_use]
pub fn format_rules(rules: &[ForwardingRule]) -> String {
    rules.iter().fold(String::new(), |mut out, rule| {
        let _ = write!(out, "{} -> {}", rule.source, rule.destinations().join(", "));
        if !rule.enabled {
            out.push_str(" (disabled)");
        }
        out.push('\n');
        out
    })
}

fn lookup_config(settings: &Settings, login: &Login) -> LookupConfig {
    LookupConfig {
        host: login.host.clone(),
        user: login.user.clone(),
        password: login.password.clone(),
        dbname: login
            .database
            .clone()
            .unwrap_or_else(|| settings.default_database.clone()),
        table: settings.table.clone(),
        condition: Some(ENABLED_CONDITION.to_string()),
    }
}

/// Everything `install` creates, resolved before touching the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installation {
    pub plan: ProvisionPlan,
    /// Written to `aliases.cf`.
    pub lookup: LookupConfig,
    /// Written to `edit_credentials.cf`.
    pub editor_file: CredentialSet,
}

/// Resolves account names and passwords from the existing credential
/// files, calling `generate` for each missing password.
#[must_use]
pub fn plan_installation<F>(
    settings: &Settings,
    credentials: &Credentials,
    mut generate: F,
) -> Installation
where
    F: FnMut() -> String,
{
    let database = credentials
        .viewer
        .dbname()
        .unwrap_or(&settings.default_database)
        .to_string();
    let mut account = |file: &CredentialSet, default_user: &str| {
        Account::new(
            file.user().unwrap_or(default_user),
            file.password().map_or_else(&mut generate, str::to_string),
        )
    };
    let viewer = account(&credentials.viewer, &settings.default_viewer);
    let editor = account(&credentials.editor, &settings.default_editor);

    let lookup = LookupConfig {
        host: settings.db_host.clone(),
        user: viewer.user.clone(),
        password: viewer.password.clone(),
        dbname: database.clone(),
        table: settings.table.clone(),
        condition: Some(ENABLED_CONDITION.to_string()),
    };
    let editor_file = CredentialSet::from_pairs([
        ("user", editor.user.as_str()),
        ("password", editor.password.as_str()),
        ("dbname", database.as_str()),
        ("hosts", settings.db_host.as_str()),
    ]);

    Installation {
        plan: ProvisionPlan {
            database,
            viewer,
            editor,
        },
        lookup,
        editor_file,
    }
}

/// A random 32-character hex password.
#[must_use]
pub fn generate_password() -> String {
    format!("{:016x}{:016x}", rand::random::<u64>(), rand::random::<u64>())
}

fn install(ctx: &Context) -> Result<(), CliError> {
    let settings = &ctx.settings;
    let installation = plan_installation(settings, &ctx.credentials, generate_password);

    let admin = ctx.admin_login()?;
    let mut store = MysqlForwardStore::connect(&admin, settings.table.as_str())?;
    store.provision(&installation.plan)?;

    let alias_path = settings.alias_path();
    write_private_file(
        &alias_path,
        &render_lookup_config(&installation.lookup, "destination", "source"),
    )?;
    info!(path = %alias_path.display(), "wrote lookup configuration");

    let editor_path = settings.edit_credentials_path();
    write_private_file(&editor_path, &installation.editor_file.render())?;
    info!(path = %editor_path.display(), "wrote editor credentials");

    ctx.postconf()
        .set(ALIAS_MAPS_KEY, &format!("mysql:{}", alias_path.display()))?;
    Ok(())
}
