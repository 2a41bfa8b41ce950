// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! luajs - translates LuaJS source files into Lua
//!
//! Reads LuaJS from a file or stdin and writes line-preserving Lua to a
//! file or stdout.
//!
//! ## Exit Status
//!
//! - `0` on success
//! - `65` when the input has a syntax or semantic error
//! - `74` when reading input or writing output fails

use anyhow::{Context, Result};
use clap::Parser;
use luajs_compiler::{IoSink, Sink, convert, convert_to};
use owo_colors::OwoColorize;
use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Input data was incorrect (`EX_DATAERR`).
const EXIT_DATA_ERROR: u8 = 65;
/// An I/O operation failed (`EX_IOERR`).
const EXIT_IO_ERROR: u8 = 74;

/// luajs - translate LuaJS into line-preserving Lua
#[derive(Parser, Debug)]
#[command(name = "luajs")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// LuaJS source file (reads stdin when omitted)
    input: Option<PathBuf>,

    /// Lua output file (writes stdout when omitted)
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

/// Prints a failure and picks the exit status for it.
fn report(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<luajs_compiler::Error>() {
        Some(input) if input.is_input_error() => {
            match input.location() {
                Some(at) => eprintln!("{}:{} {}", at.line, at.column, input.message()),
                None => eprintln!("{}", input.message()),
            }
            ExitCode::from(EXIT_DATA_ERROR)
        }
        _ => {
            eprintln!("{}: {:#}", "error".red().bold(), err);
            ExitCode::from(EXIT_IO_ERROR)
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let source = read_source(cli.input.as_deref())?;
    debug!(bytes = source.len(), "read source");

    match &cli.output {
        Some(path) => write_file(&source, path),
        None => write_stdout(&source),
    }
}

fn read_source(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .context("failed to read stdin")?;
            Ok(source)
        }
    }
}

/// Converts fully before writing so an error leaves stdout empty.
fn write_stdout(source: &str) -> Result<()> {
    let mut lua = convert(source)?;
    lua.push('\n');

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(lua.as_bytes())
        .and_then(|()| stdout.flush())
        .context("failed to write stdout")
}

/// Streams into a temporary file next to `path` and only replaces `path`
/// once the whole conversion succeeded.
fn write_file(source: &str, path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let temp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create a temporary file in {}", dir.display()))?;

    let mut sink = IoSink::new(BufWriter::new(temp));
    convert_to(source, &mut sink)?;
    sink.append("\n")
        .with_context(|| format!("failed to write {}", path.display()))?;

    let temp = sink
        .into_inner()
        .into_inner()
        .map_err(|e| e.into_error())
        .with_context(|| format!("failed to write {}", path.display()))?;
    temp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("failed to write {}", path.display()))?;

    info!(output = %path.display(), "wrote lua");
    Ok(())
}
