//! CLI for the tilefetch helpers.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use tilefetch_core::config;
use tilefetch_core::extract::Pattern;

use commands::{run_completions, run_extract, run_fetch, run_fetch_image, run_man, run_reset_dir};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "tilefetch")]
#[command(about = "Fetch release files and Docker images for tile packaging", long_about = None)]
pub struct Cli {
    /// Trace-level logging for tilefetch, mirrored on stderr. `RUST_LOG` takes precedence.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch a URL or local file into TARGET, preferring a cached copy.
    Fetch {
        /// HTTP(S) URL, local path, or docker://image[:tag].
        resource: String,
        /// Destination file (overwritten).
        target: PathBuf,
        /// Directory holding previously downloaded files, looked up by basename.
        #[arg(long, value_name = "DIR")]
        cache: Option<PathBuf>,
    },

    /// Export a Docker image from the local daemon into TARGET.
    FetchImage {
        /// Image reference, repository[:tag].
        image: String,
        /// Destination archive (overwritten).
        target: PathBuf,
        /// Directory holding saved images, used when the daemon cannot provide the image.
        #[arg(long, value_name = "DIR")]
        docker_cache: Option<PathBuf>,
    },

    /// Extract labelled values from command output (file or stdin) as JSON.
    Extract {
        /// Input file; stdin when omitted or "-".
        input: Option<PathBuf>,
        /// TOML file with [[pattern]] entries (pattern, label).
        #[arg(long, value_name = "FILE")]
        patterns: Option<PathBuf>,
        /// Inline pattern as LABEL=PATTERN. Repeatable.
        #[arg(short = 'p', long = "pattern", value_name = "LABEL=PATTERN")]
        inline: Vec<Pattern>,
    },

    /// Delete and recreate a directory.
    ResetDir {
        path: PathBuf,
    },

    /// Print shell completions.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Print the man page (roff).
    Man,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match self.command {
            CliCommand::Fetch {
                resource,
                target,
                cache,
            } => run_fetch(&cfg, &resource, &target, cache)?,
            CliCommand::FetchImage {
                image,
                target,
                docker_cache,
            } => run_fetch_image(&cfg, &image, &target, docker_cache)?,
            CliCommand::Extract {
                input,
                patterns,
                inline,
            } => run_extract(input.as_deref(), patterns.as_deref(), inline)?,
            CliCommand::ResetDir { path } => run_reset_dir(&path)?,
            CliCommand::Completions { shell } => run_completions(shell),
            CliCommand::Man => run_man()?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
