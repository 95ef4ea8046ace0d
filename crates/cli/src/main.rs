// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `pff` - administer Postfix forwarding rules stored in MySQL.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod args;
mod commands;
mod error;

#[cfg(test)]
mod tests;

use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use crate::args::Args;
use crate::commands::Context;
use crate::error::exit_code;

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let code = if err.use_stderr() { exit_code::USAGE } else { 0 };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(args.log_level().into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let settings = args.global.settings();
    debug!(?settings, "starting");
    let ctx = Context::load(settings, args.global.overrides());

    match commands::run(&args.command, &ctx) {
        Ok(output) => print!("{output}"),
        Err(err) => {
            error!("{err}");
            std::process::exit(err.exit_code());
        }
    }
}
