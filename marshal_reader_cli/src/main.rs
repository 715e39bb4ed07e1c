// Copyright 2026 the Marshal Reader Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `marshal-dump`: print the header and code-object listing of a compiled-unit file.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use marshal_reader::{Limits, decode_stream_with_limits};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

mod listing;

/// Inspect a compiled-unit file without executing it.
#[derive(Debug, Parser)]
#[command(name = "marshal-dump", version, about)]
struct Cli {
    /// Compiled-unit file to read.
    path: PathBuf,

    /// Maximum nesting depth of composite values.
    #[arg(long, default_value_t = Limits::default().max_depth)]
    max_depth: usize,

    /// Print the root value as-is instead of the code-object listing.
    #[arg(long)]
    raw: bool,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let bytes =
        fs::read(&cli.path).with_context(|| format!("failed to read {}", cli.path.display()))?;
    debug!(path = %cli.path.display(), len = bytes.len(), "read input");

    let limits = Limits {
        max_depth: cli.max_depth,
    };
    let file = decode_stream_with_limits(&bytes, limits)
        .with_context(|| format!("failed to decode {}", cli.path.display()))?;
    debug!(
        magic = format_args!("{:#010x}", file.header.magic),
        mtime = file.header.mtime,
        root = file.root.kind_name(),
        "decoded"
    );

    let mut out = io::stdout().lock();
    writeln!(out, "magic: {:#010x}", file.header.magic)?;
    writeln!(out, "mtime: {}", file.header.mtime)?;
    match file.code() {
        Some(code) if !cli.raw => {
            writeln!(out, "code obj:")?;
            listing::write_code(&mut out, code, 0)?;
        }
        _ => writeln!(out, "root: {}", listing::Repr(&file.root))?,
    }
    out.flush()?;
    Ok(())
}
