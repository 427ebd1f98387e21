//! Main entry point for the datazip CLI.
//!
//! Reads a base64 data URI from a file or stdin, extracts the embedded ZIP
//! archive in memory, and prints the entries.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tokio::io::AsyncReadExt;

use datazip::{Cli, EncodingRsConverter, Unzipper, base64};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let data_uri = read_input(&cli).await?;
    let data_uri = data_uri.trim();

    let payload = base64::data_uri_payload(data_uri);
    let expected_len = cli.size.unwrap_or_else(|| estimated_decoded_len(payload));

    let mut unzipper = Unzipper::new();
    if let Some(label) = &cli.convert {
        let converter = EncodingRsConverter::for_label(label);
        match converter {
            Some(converter) => unzipper = unzipper.with_encoding_converter(Arc::new(converter)),
            None => bail!("unknown character set label: {label}"),
        }
    }

    let quiet = cli.is_quiet();
    let entries = unzipper
        .unzip_with_callbacks(
            data_uri,
            expected_len,
            |entry| {
                if !quiet {
                    eprintln!("  extracting: {}", entry.name);
                }
            },
            |err| {
                eprintln!("error: {err}");
            },
        )
        .await?;

    for entry in &entries {
        if cli.list {
            println!("{}", entry.name);
        } else if cli.pipe {
            print!("{}", entry.data);
        } else {
            println!(
                "{}  {:>8} bytes  {}",
                entry.time.format("%Y-%m-%d %H:%M:%S"),
                entry.data.len(),
                entry.name
            );
        }
    }

    Ok(())
}

/// Read the data URI from the file named on the command line, or stdin.
async fn read_input(cli: &Cli) -> Result<String> {
    if cli.reads_stdin() {
        let mut input = String::new();
        tokio::io::stdin()
            .read_to_string(&mut input)
            .await
            .context("reading data URI from stdin")?;
        Ok(input)
    } else {
        tokio::fs::read_to_string(&cli.file)
            .await
            .with_context(|| format!("reading {}", cli.file))
    }
}

/// Decoded size of a base64 payload: three bytes per four alphabet
/// characters, padding excluded. Used when `--size` is not given.
fn estimated_decoded_len(payload: &str) -> usize {
    let significant = payload
        .bytes()
        .filter(|b| b.is_ascii_alphanumeric() || *b == b'+' || *b == b'/')
        .count();
    significant * 3 / 4
}
