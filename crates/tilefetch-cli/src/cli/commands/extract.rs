//! `tilefetch extract` – labelled values from command output, printed as JSON.

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;
use tilefetch_core::extract::{self, Pattern};

pub fn run_extract(input: Option<&Path>, patterns_file: Option<&Path>, inline: Vec<Pattern>) -> Result<()> {
    let mut patterns = match patterns_file {
        Some(path) => extract::load_patterns(path)?,
        None => Vec::new(),
    };
    patterns.extend(inline);
    if patterns.is_empty() {
        anyhow::bail!("no patterns given (use --patterns FILE or -p LABEL=PATTERN)");
    }

    let text = match input {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("read {}", path.display()))?,
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("read stdin")?;
            buf
        }
    };

    let values = extract::extract(&text, &patterns);
    tracing::debug!("extracted {} of {} labels", values.len(), patterns.len());
    println!("{}", serde_json::to_string_pretty(&values)?);
    Ok(())
}
