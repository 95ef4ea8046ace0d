// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::path::{Path, PathBuf};

/// Default directory holding the credential and lookup files.
pub const DEFAULT_CONF_DIR: &str = "/etc/postfix/vhost";

/// Startup configuration.
///
/// Built once (normally from command-line arguments) and passed by
/// reference to everything that needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directory containing `aliases.cf` and `edit_credentials.cf`.
    pub conf_dir: PathBuf,
    /// Host of the MySQL server.
    pub db_host: String,
    /// The `postconf` executable, a bare name being looked up on `PATH`.
    pub postconf: String,
    /// Table holding the forwarding rules.
    pub table: String,
    /// Database used when the viewer file does not name one.
    pub default_database: String,
    /// Viewer account used when the viewer file does not name one.
    pub default_viewer: String,
    /// Editor account used when the editor file does not name one.
    pub default_editor: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            conf_dir: PathBuf::from(DEFAULT_CONF_DIR),
            db_host: String::from("127.0.0.1"),
            postconf: String::from("postconf"),
            table: String::from("forwards"),
            default_database: String::from("postfix"),
            default_viewer: String::from("postfix"),
            default_editor: String::from("postfix_editor"),
        }
    }
}

impl Settings {
    /// Creates settings rooted at the given configuration directory.
    #[must_use]
    pub fn with_conf_dir(conf_dir: impl AsRef<Path>) -> Self {
        Self {
            conf_dir: conf_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Viewer credentials, doubling as the Postfix lookup-table file.
    #[must_use]
    pub fn alias_path(&self) -> PathBuf {
        self.conf_dir.join("aliases.cf")
    }

    /// Editor credentials.
    #[must_use]
    pub fn edit_credentials_path(&self) -> PathBuf {
        self.conf_dir.join("edit_credentials.cf")
    }
}
