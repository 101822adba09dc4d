// SPDX-License-Identifier: Apache-2.0
//! Offline allocator for the fizz emoji code book.
//!
//! Reads newline-delimited emoji names from stdin, loads the existing code
//! book at `--output` (if any), assigns the lowest free 16-bit ID to every
//! unseen name, and rewrites the file. Names already present keep their IDs
//! unchanged — older wire clients decode against older copies of the file.
//!
//! Single-shot batch tool: exclusive access to the output file is assumed,
//! and every error is terminal for the run. Either the whole updated code
//! book is written or nothing is.

use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use emoji_map::{allocate, EmojiMap};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Assign stable wire IDs to emoji names")]
struct Args {
    /// Output JSON file. Loaded first (if present) so existing IDs survive.
    #[arg(short = 'o', long, default_value = "emojis.json")]
    output: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Diagnostics go to stderr; stdout stays clean for pipeline use.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(io::stderr)
        .init();

    let mut candidates = Vec::new();
    for line in io::stdin().lock().lines() {
        candidates.push(line.context("reading emoji names from stdin")?);
    }

    let previous = load_previous(&args.output)?;
    let outcome = allocate(previous, candidates)?;

    let mut body =
        serde_json::to_string_pretty(&outcome.map).context("encoding code book as JSON")?;
    body.push('\n');
    fs::write(&args.output, body)
        .with_context(|| format!("writing {}", args.output.display()))?;

    info!(
        total = outcome.map.len(),
        added = outcome.added,
        path = %args.output.display(),
        "code book updated"
    );
    Ok(())
}

/// Load the existing code book, or an empty mapping on the first run.
///
/// A present-but-unparsable file aborts the run; silently restarting ID
/// assignment from scratch would break every published ID.
fn load_previous(path: &Path) -> Result<EmojiMap> {
    match fs::read_to_string(path) {
        Ok(text) => serde_json::from_str(&text)
            .with_context(|| format!("parsing existing {}", path.display())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(EmojiMap::new()),
        Err(err) => Err(err).with_context(|| format!("reading {}", path.display())),
    }
}
