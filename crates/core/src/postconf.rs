// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reading and writing Postfix parameters through `postconf`.

use std::ffi::{OsStr, OsString};
use std::process::Output;

use duct::cmd;
use tracing::{debug, error, info};

use crate::error::PostconfError;

/// A `postconf` executable.
///
/// A bare name is looked up on `PATH`; anything containing a separator is
/// run as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Postconf {
    program: OsString,
}

impl Default for Postconf {
    fn default() -> Self {
        Self::new("postconf")
    }
}

impl Postconf {
    #[must_use]
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    #[must_use]
    pub fn program(&self) -> &OsStr {
        &self.program
    }

    /// Reads a parameter with `postconf -h <key>`.
    ///
    /// # Errors
    ///
    /// Returns `PostconfError::KeyNotFound` when `postconf` writes anything to
    /// standard error, or `PostconfError::CommandFailed` when it cannot be run.
    pub fn get(&self, key: &str) -> Result<String, PostconfError> {
        let output = self.capture(&["-h", key])?;
        if !output.stderr.is_empty() {
            debug!(
                key,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "postconf rejected key"
            );
            return Err(PostconfError::KeyNotFound {
                key: key.to_string(),
            });
        }
        if !output.status.success() {
            return Err(self.failure(&["-h", key], &output));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Writes a parameter with `postconf -e "<key> = <value>"`.
    ///
    /// # Errors
    ///
    /// Returns `PostconfError::CommandFailed` when `postconf` cannot be run or
    /// exits unsuccessfully.
    pub fn set(&self, key: &str, value: &str) -> Result<(), PostconfError> {
        let assignment = format!("{key} = {value}");
        let args = ["-e", assignment.as_str()];
        let output = self.capture(&args)?;
        if !output.status.success() {
            return Err(self.failure(&args, &output));
        }
        info!(key, value, "updated postfix parameter");
        Ok(())
    }

    fn capture(&self, args: &[&str]) -> Result<Output, PostconfError> {
        let expression = cmd(self.program.as_os_str(), args)
            .stdout_capture()
            .stderr_capture()
            .unchecked();
        debug!("running command: {:?}", expression);
        expression.run().map_err(|e| {
            error!("failed to run command: {:?}", expression);
            PostconfError::CommandFailed {
                command: self.command_line(args),
                reason: e.to_string(),
            }
        })
    }

    fn failure(&self, args: &[&str], output: &Output) -> PostconfError {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        PostconfError::CommandFailed {
            command: self.command_line(args),
            reason: if stderr.is_empty() {
                output.status.to_string()
            } else {
                stderr
            },
        }
    }

    fn command_line(&self, args: &[&str]) -> String {
        std::iter::once(self.program.to_string_lossy().into_owned())
            .chain(args.iter().map(|a| (*a).to_string()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
