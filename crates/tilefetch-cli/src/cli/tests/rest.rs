//! Tests for extract, reset-dir, completions and man.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use clap_complete::Shell;
use std::path::Path;
use tilefetch_core::extract::Pattern;

#[test]
fn cli_parse_extract_inline_patterns() {
    match parse(&[
        "tilefetch",
        "extract",
        "status.txt",
        "-p",
        "uuid=Director UUID",
        "--pattern",
        "name=  Name",
    ]) {
        CliCommand::Extract {
            input,
            patterns,
            inline,
        } => {
            assert_eq!(input.as_deref(), Some(Path::new("status.txt")));
            assert!(patterns.is_none());
            assert_eq!(
                inline,
                vec![
                    Pattern::new("Director UUID", "uuid"),
                    Pattern::new("  Name", "name"),
                ]
            );
        }
        _ => panic!("expected Extract"),
    }
}

#[test]
fn cli_parse_extract_pattern_file_stdin() {
    match parse(&["tilefetch", "extract", "--patterns", "p.toml"]) {
        CliCommand::Extract {
            input,
            patterns,
            inline,
        } => {
            assert!(input.is_none());
            assert_eq!(patterns.as_deref(), Some(Path::new("p.toml")));
            assert!(inline.is_empty());
        }
        _ => panic!("expected Extract"),
    }
}

#[test]
fn cli_parse_extract_bad_inline_pattern() {
    assert!(Cli::try_parse_from(["tilefetch", "extract", "-p", "nolabel"]).is_err());
}

#[test]
fn cli_parse_reset_dir() {
    match parse(&["tilefetch", "reset-dir", "release"]) {
        CliCommand::ResetDir { path } => assert_eq!(path, Path::new("release")),
        _ => panic!("expected ResetDir"),
    }
}

#[test]
fn cli_parse_completions() {
    match parse(&["tilefetch", "completions", "bash"]) {
        CliCommand::Completions { shell } => assert_eq!(shell, Shell::Bash),
        _ => panic!("expected Completions"),
    }
}

#[test]
fn cli_parse_man() {
    match parse(&["tilefetch", "man"]) {
        CliCommand::Man => {}
        _ => panic!("expected Man"),
    }
}

#[test]
fn cli_parse_verbose_is_global() {
    let cli = Cli::try_parse_from(["tilefetch", "reset-dir", "release", "-v"]).unwrap();
    assert!(cli.verbose);
    let cli = Cli::try_parse_from(["tilefetch", "--verbose", "man"]).unwrap();
    assert!(cli.verbose);
    let cli = Cli::try_parse_from(["tilefetch", "man"]).unwrap();
    assert!(!cli.verbose);
}
