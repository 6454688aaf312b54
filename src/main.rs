use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use protoc_gen_jspb::error::{Error, Result};
use tracing_subscriber::EnvFilter;

/// Generate Closure-style JavaScript from protocol buffer schemas.
///
/// Runs as a protoc plugin: reads a CodeGeneratorRequest on stdin and writes
/// a CodeGeneratorResponse on stdout. Invoke through protoc with
/// `--jspb_out=[pkg_prefix=<prefix>:]<dir>`.
#[derive(Parser)]
#[command(name = "protoc-gen-jspb", version, about)]
struct Cli {
    /// Read the serialized request from a file instead of stdin.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Write the serialized response to a file instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    // stdout carries the response, so diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();

    if let Err(e) = run(cli) {
        // One line: the error followed by its cause chain.
        let mut message = e.to_string();
        if e.has_cause() {
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                let cause_text = cause.to_string();
                if !message.ends_with(&cause_text) {
                    message.push_str(": ");
                    message.push_str(&cause_text);
                }
                source = std::error::Error::source(cause);
            }
        }
        eprintln!("protoc-gen-jspb: error: {message}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let input = match &cli.input {
        Some(path) => fs::read(path).map_err(|source| Error::Read { source })?,
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .map_err(|source| Error::Read { source })?;
            buf
        }
    };
    tracing::debug!(bytes = input.len(), "read request");

    let output = protoc_gen_jspb::run(&input)?;

    match &cli.output {
        Some(path) => fs::write(path, &output).map_err(|source| Error::Write { source })?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(&output)
                .and_then(|()| stdout.flush())
                .map_err(|source| Error::Write { source })?;
        }
    }
    Ok(())
}
