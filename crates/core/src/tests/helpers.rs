// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared test fixtures.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use crate::{PromptError, Terminal};

/// Terminal events recorded by [`FakeTerminal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalEvent {
    Wrote(String),
    HiddenRead,
    EchoRestored,
}

/// An in-memory terminal.
///
/// `echo` tracks the current state; `events` records every call in order.
/// A failed read leaves echo off, the way a read cut short on a real
/// terminal does.
pub struct FakeTerminal {
    pub interactive: bool,
    pub echo: bool,
    pub events: Vec<TerminalEvent>,
    pub input: VecDeque<Result<String, PromptError>>,
    pub fail_restore: bool,
}

impl FakeTerminal {
    pub fn with_input(line: &str) -> Self {
        Self {
            interactive: true,
            echo: true,
            events: Vec::new(),
            input: VecDeque::from([Ok(line.to_string())]),
            fail_restore: false,
        }
    }

    pub fn failing_read(error: PromptError) -> Self {
        Self {
            input: VecDeque::from([Err(error)]),
            ..Self::with_input("")
        }
    }
}

impl Terminal for FakeTerminal {
    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn write_prompt(&mut self, text: &str) -> Result<(), PromptError> {
        self.events.push(TerminalEvent::Wrote(text.to_string()));
        Ok(())
    }

    fn read_hidden_line(&mut self) -> Result<String, PromptError> {
        self.events.push(TerminalEvent::HiddenRead);
        let previous = self.echo;
        self.echo = false;
        let line = self
            .input
            .pop_front()
            .unwrap_or_else(|| Err(PromptError::Io(String::from("end of input"))))?;
        self.echo = previous;
        self.events.push(TerminalEvent::Wrote(String::from("\n")));
        Ok(line)
    }

    fn restore_echo(&mut self) -> Result<(), PromptError> {
        if self.fail_restore {
            return Err(PromptError::Io(String::from("stty failed")));
        }
        self.events.push(TerminalEvent::EchoRestored);
        self.echo = true;
        Ok(())
    }
}

/// Writes `contents` to `name` inside `dir` and returns the path.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path: PathBuf = dir.join(name);
    std::fs::write(&path, contents).expect("failed to write fixture");
    path
}

