// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use postfix_forward::{DEFAULT_CONF_DIR, LoginOverrides, Settings};
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

/// pff - manage Postfix forwarding rules stored in MySQL
#[derive(Debug, Parser)]
#[command(name = "pff", author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,
}

impl Args {
    #[must_use]
    pub fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

/// Options shared by every subcommand.
#[derive(Debug, Clone, ClapArgs)]
pub struct GlobalOptions {
    /// Directory holding aliases.cf and edit_credentials.cf
    #[arg(long, global = true, env = "PFF_CONF_DIR", default_value = DEFAULT_CONF_DIR)]
    pub conf_dir: PathBuf,

    /// MySQL server host
    #[arg(long, global = true, env = "PFF_DB_HOST", default_value = "127.0.0.1")]
    pub db_host: String,

    /// The postconf executable
    #[arg(long, global = true, env = "PFF_POSTCONF", default_value = "postconf")]
    pub postconf: String,

    /// Table holding the forwarding rules
    #[arg(long, global = true, env = "PFF_TABLE", default_value = "forwards")]
    pub table: String,

    /// MySQL user, overriding the credential files (the admin user for install)
    #[arg(long, global = true, env = "PFF_USER")]
    pub user: Option<String>,

    /// MySQL password, overriding the credential files and the prompt
    #[arg(long, global = true, env = "PFF_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

impl GlobalOptions {
    #[must_use]
    pub fn settings(&self) -> Settings {
        Settings {
            conf_dir: self.conf_dir.clone(),
            db_host: self.db_host.clone(),
            postconf: self.postconf.clone(),
            table: self.table.clone(),
            ..Settings::default()
        }
    }

    #[must_use]
    pub fn overrides(&self) -> LoginOverrides {
        LoginOverrides {
            user: self.user.clone(),
            password: self.password.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Create the database, table and accounts, then point Postfix at them
    Install,

    /// Add a forwarding rule, or replace the destinations of an existing one
    #[command(visible_alias = "a")]
    Add {
        /// Address mail is sent to
        source: String,

        /// Addresses the mail is forwarded to
        #[arg(required = true)]
        destinations: Vec<String>,

        /// Store the rule switched off
        #[arg(long)]
        disabled: bool,
    },

    /// List forwarding rules
    #[command(visible_alias = "ls")]
    List {
        /// Show only the rule for this address
        source: Option<String>,
    },

    /// Delete a forwarding rule
    #[command(visible_alias = "rm")]
    Remove { source: String },

    /// Switch a forwarding rule on
    Enable { source: String },

    /// Switch a forwarding rule off
    Disable { source: String },

    /// Print a Postfix parameter
    GetConfig { key: String },

    /// Set a Postfix parameter
    SetConfig { key: String, value: String },

    /// Print the Postfix lookup-table configuration for the viewer account
    LookupConfig,
}
