// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::path::PathBuf;

use clap::Parser;
use clap::error::ErrorKind;
use tracing::level_filters::LevelFilter;

use crate::args::{Args, Command};

fn parse(argv: &[&str]) -> Args {
    Args::try_parse_from(argv).expect("arguments should parse")
}

#[test]
fn test_add_collects_destinations() {
    let args = parse(&["pff", "add", "info@example.org", "a@example.net", "b@example.net"]);
    assert_eq!(
        args.command,
        Command::Add {
            source: String::from("info@example.org"),
            destinations: vec![String::from("a@example.net"), String::from("b@example.net")],
            disabled: false,
        }
    );
}

#[test]
fn test_add_can_store_a_disabled_rule() {
    let args = parse(&["pff", "add", "--disabled", "info@example.org", "a@example.net"]);
    assert!(matches!(args.command, Command::Add { disabled: true, .. }));
}

#[test]
fn test_add_requires_a_destination() {
    let err = Args::try_parse_from(["pff", "add", "info@example.org"])
        .expect_err("a destination is required");
    assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
}

#[test]
fn test_list_source_is_optional() {
    assert_eq!(parse(&["pff", "list"]).command, Command::List { source: None });
    assert_eq!(
        parse(&["pff", "ls", "info@example.org"]).command,
        Command::List {
            source: Some(String::from("info@example.org"))
        }
    );
}

#[test]
fn test_config_subcommands() {
    assert_eq!(
        parse(&["pff", "set-config", "relayhost", "[mail.example.org]"]).command,
        Command::SetConfig {
            key: String::from("relayhost"),
            value: String::from("[mail.example.org]"),
        }
    );
    assert_eq!(
        parse(&["pff", "get-config", "relayhost"]).command,
        Command::GetConfig {
            key: String::from("relayhost")
        }
    );
    assert_eq!(parse(&["pff", "lookup-config"]).command, Command::LookupConfig);
}

#[test]
fn test_defaults_match_settings_defaults() {
    let args = parse(&["pff", "install"]);
    let settings = args.global.settings();

    assert_eq!(settings, postfix_forward::Settings::default());
    assert_eq!(args.global.overrides(), postfix_forward::LoginOverrides::default());
}

#[test]
fn test_global_options_are_accepted_after_the_subcommand() {
    let args = parse(&[
        "pff",
        "enable",
        "info@example.org",
        "--conf-dir",
        "/tmp/pff",
        "--db-host",
        "db.example.org",
        "--table",
        "aliases",
        "--user",
        "admin",
        "--password",
        "secret",
    ]);

    let settings = args.global.settings();
    assert_eq!(settings.conf_dir, PathBuf::from("/tmp/pff"));
    assert_eq!(settings.db_host, "db.example.org");
    assert_eq!(settings.table, "aliases");
    assert_eq!(settings.default_database, "postfix");

    let overrides = args.global.overrides();
    assert_eq!(overrides.user.as_deref(), Some("admin"));
    assert_eq!(overrides.password.as_deref(), Some("secret"));
}

#[test]
fn test_verbosity_flags_adjust_log_level() {
    assert_eq!(parse(&["pff", "list"]).log_level(), LevelFilter::INFO);
    assert_eq!(parse(&["pff", "-v", "list"]).log_level(), LevelFilter::DEBUG);
    assert_eq!(parse(&["pff", "-q", "list"]).log_level(), LevelFilter::WARN);
}

#[test]
fn test_unknown_subcommand_is_a_usage_error() {
    let err = Args::try_parse_from(["pff", "frobnicate"]).expect_err("unknown subcommand");
    assert!(err.use_stderr());
}
