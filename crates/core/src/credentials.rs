// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Credential files and login resolution.
//!
//! Two flat files hold the database accounts:
//!
//! - `aliases.cf`: the viewer account. This is also the file Postfix reads
//!   as its `mysql:` lookup table, so it carries `hosts` and `query` lines too.
//! - `edit_credentials.cf`: the editor account used by administrators.
//!
//! Both are `key = value` lines. A file that is missing or unreadable is
//! treated as empty; the problem is logged, never raised.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::io::Write as _;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{CoreError, PromptError};
use crate::settings::Settings;

/// A parsed credential file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialSet {
    entries: BTreeMap<String, String>,
}

/// A non-blank line without `=`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedLine {
    pub line_number: usize,
}

impl CredentialSet {
    /// Reads a credential file, degrading to an empty set on any failure.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read credential file");
                return Self::default();
            }
        };

        match Self::parse(&text) {
            Ok(set) => {
                debug!(path = %path.display(), keys = set.len(), "loaded credential file");
                set
            }
            Err(MalformedLine { line_number }) => {
                warn!(
                    path = %path.display(),
                    line = line_number,
                    "credential file has a line without '='; ignoring the file"
                );
                Self::default()
            }
        }
    }

    /// Parses `key = value` lines.
    ///
    /// Blank lines are skipped, each line is split on its first `=`, both
    /// halves are trimmed and later keys overwrite earlier ones.
    ///
    /// # Errors
    ///
    /// Returns the first non-blank line that has no `=`.
    pub fn parse(text: &str) -> Result<Self, MalformedLine> {
        let mut entries = BTreeMap::new();
        for (index, line) in text.split('\n').enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let (key, value) = line.split_once('=').ok_or(MalformedLine {
                line_number: index + 1,
            })?;
            entries.insert(key.trim().to_string(), value.trim().to_string());
        }
        Ok(Self { entries })
    }

    /// Builds a set from key/value pairs, last value winning.
    #[must_use]
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn user(&self) -> Option<&str> {
        self.get("user")
    }

    #[must_use]
    pub fn password(&self) -> Option<&str> {
        self.get("password")
    }

    #[must_use]
    pub fn dbname(&self) -> Option<&str> {
        self.get("dbname")
    }

    /// The `host` key, falling back to the lookup-table spelling `hosts`.
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.get("host").or_else(|| self.get("hosts"))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders the set back to `key = value` lines, sorted by key.
    #[must_use]
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .fold(String::new(), |mut out, (key, value)| {
                let _ = writeln!(out, "{key} = {value}");
                out
            })
    }
}

/// The viewer and editor credential files, loaded once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub viewer: CredentialSet,
    pub editor: CredentialSet,
}

/// Which database account a connection is made as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Read-only account, shared with Postfix.
    Viewer,
    /// Read/write account for administration.
    Editor,
}

/// Values given explicitly (for example on the command line).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginOverrides {
    pub user: Option<String>,
    pub password: Option<String>,
}

/// A fully resolved database identity.
#[derive(Clone, PartialEq, Eq)]
pub struct Login {
    pub host: String,
    pub user: String,
    pub password: String,
    pub database: Option<String>,
}

impl std::fmt::Debug for Login {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Login")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .finish()
    }
}

impl Credentials {
    /// Loads both credential files named by the settings.
    #[must_use]
    pub fn load(settings: &Settings) -> Self {
        Self {
            viewer: CredentialSet::load(&settings.alias_path()),
            editor: CredentialSet::load(&settings.edit_credentials_path()),
        }
    }

    /// Resolves the login for a role.
    ///
    /// The user comes from the override, then the role's file, then the
    /// role's default. The password comes from the override, then the file,
    /// then `prompt`. Both roles use the database named in the viewer file.
    ///
    /// # Errors
    ///
    /// Returns any error raised by `prompt`.
    pub fn login<F>(
        &self,
        role: Role,
        settings: &Settings,
        overrides: &LoginOverrides,
        prompt: F,
    ) -> Result<Login, PromptError>
    where
        F: FnOnce(&str) -> Result<String, PromptError>,
    {
        let (file, default_user) = match role {
            Role::Viewer => (&self.viewer, settings.default_viewer.as_str()),
            Role::Editor => (&self.editor, settings.default_editor.as_str()),
        };

        let user = overrides
            .user
            .clone()
            .or_else(|| file.user().map(str::to_string))
            .unwrap_or_else(|| default_user.to_string());

        let password = match overrides
            .password
            .clone()
            .or_else(|| file.password().map(str::to_string))
        {
            Some(password) => password,
            None => prompt(&format!("Enter mysql password for {user}:"))?,
        };

        let database = self
            .viewer
            .dbname()
            .unwrap_or(&settings.default_database)
            .to_string();

        Ok(Login {
            host: settings.db_host.clone(),
            user,
            password,
            database: Some(database),
        })
    }
}

/// Permission bits of the credential files.
#[cfg(unix)]
const PRIVATE_FILE_MODE: u32 = 0o600;

/// Writes a configuration file readable only by its owner.
///
/// An existing file is truncated and its permissions are narrowed to `0600`
/// before anything is written.
///
/// # Errors
///
/// Returns `CoreError::FileWrite` if the file cannot be created, restricted,
/// or written.
pub fn write_private_file(path: &Path, contents: &str) -> Result<(), CoreError> {
    let to_error = |e: std::io::Error| CoreError::FileWrite {
        path: path.display().to_string(),
        reason: e.to_string(),
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(to_error)?;
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(PRIVATE_FILE_MODE);
    }

    let mut file = options.open(path).map_err(to_error)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(PRIVATE_FILE_MODE))
            .map_err(to_error)?;
    }
    file.write_all(contents.as_bytes()).map_err(to_error)?;
    debug!(path = %path.display(), "wrote configuration file");
    Ok(())
}
